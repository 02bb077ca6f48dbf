//! 요약 통계 레코드.
//!
//! 시계열 마지막 두 행과 펀더멘털 데이터를 평탄화한 스냅샷입니다.
//! 정의되지 않은 지표는 `None`(JSON `null`)으로 남습니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FundamentalData;

/// 추세 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// 상승
    Bullish,
    /// 하락 (판정 불가 포함)
    Bearish,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
        }
    }
}

/// 기술적 지표 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalStats {
    pub current_price: f64,
    pub daily_change: f64,
    pub daily_return: Option<f64>,
    pub yearly_return: Option<f64>,
    pub daily_volume: i64,
    pub obv: Option<i64>,
    pub ad_line: Option<i64>,
    pub atr: Option<f64>,
    pub natr: Option<f64>,
    pub momentum: Option<f64>,
    pub roc: Option<f64>,
    pub rsi: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub yearly_high: f64,
    pub yearly_low: f64,
    pub ticker: String,
    pub trend: Trend,
    pub trend_strength: f64,
}

/// 기술적 + 펀더멘털 통계 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub technical: TechnicalStats,
    pub fundamental: FundamentalData,
}

impl StatsRecord {
    /// 종목 티커.
    pub fn ticker(&self) -> &str {
        &self.technical.ticker
    }

    /// 언어 모델 프롬프트용 `key: value` 줄 목록.
    pub fn to_context_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (section, value) in [
            ("technical", serde_json::to_value(&self.technical)),
            ("fundamental", serde_json::to_value(&self.fundamental)),
        ] {
            if let Ok(serde_json::Value::Object(map)) = value {
                for (key, v) in map {
                    lines.push(format!("{}.{}: {}", section, key, v));
                }
            }
        }
        lines
    }
}
