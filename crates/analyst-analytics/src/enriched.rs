//! 지표가 붙은 캔들 행.

use analyst_core::OhlcvBar;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// OHLCV 캔들과 파생 지표.
///
/// 파생 필드가 `None`이면 해당 시점에서 지표 윈도우가 채워지지 않은 것입니다.
/// 기본값 대체는 `SeriesFormatter`에서만 일어납니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRow {
    pub bar: OhlcvBar,
    /// 1기간 수익률 (%)
    pub returns: Option<Decimal>,
    pub ma20: Option<Decimal>,
    pub ma50: Option<Decimal>,
    pub ma200: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub macd_hist: Option<Decimal>,
    pub bb_upper: Option<Decimal>,
    pub bb_middle: Option<Decimal>,
    pub bb_lower: Option<Decimal>,
    pub atr: Option<Decimal>,
    pub natr: Option<Decimal>,
    pub obv: Option<Decimal>,
    pub ad: Option<Decimal>,
    /// 10기간 모멘텀 (가격 차이)
    pub momentum: Option<Decimal>,
    /// 10기간 ROC (%)
    pub roc: Option<Decimal>,
}

impl EnrichedRow {
    /// 지표가 하나도 없는 행.
    pub fn bare(bar: OhlcvBar) -> Self {
        Self {
            bar,
            returns: None,
            ma20: None,
            ma50: None,
            ma200: None,
            rsi: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            atr: None,
            natr: None,
            obv: None,
            ad: None,
            momentum: None,
            roc: None,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.bar.date
    }

    pub fn close(&self) -> Decimal {
        self.bar.close
    }
}
