//! 시세 캔들 간격 정의.
//!
//! Yahoo Finance가 지원하는 간격 문자열과 1:1로 대응합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    /// 1분봉
    #[serde(rename = "1m")]
    M1,
    /// 2분봉
    #[serde(rename = "2m")]
    M2,
    /// 5분봉
    #[serde(rename = "5m")]
    M5,
    /// 15분봉
    #[serde(rename = "15m")]
    M15,
    /// 30분봉
    #[serde(rename = "30m")]
    M30,
    /// 60분봉
    #[serde(rename = "60m")]
    M60,
    /// 90분봉
    #[serde(rename = "90m")]
    M90,
    /// 1시간봉
    #[serde(rename = "1h")]
    H1,
    /// 일봉
    #[default]
    #[serde(rename = "1d")]
    D1,
    /// 5일봉
    #[serde(rename = "5d")]
    D5,
    /// 주봉
    #[serde(rename = "1wk")]
    W1,
    /// 월봉
    #[serde(rename = "1mo")]
    Mo1,
    /// 분기봉
    #[serde(rename = "3mo")]
    Mo3,
}

impl Interval {
    /// Yahoo Finance 간격 문자열로 변환합니다.
    pub fn as_yahoo_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M2 => "2m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::M60 => "60m",
            Interval::M90 => "90m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
            Interval::D5 => "5d",
            Interval::W1 => "1wk",
            Interval::Mo1 => "1mo",
            Interval::Mo3 => "3mo",
        }
    }

    /// Yahoo Finance 간격 문자열에서 파싱합니다.
    pub fn from_yahoo_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Some(Interval::M1),
            "2m" => Some(Interval::M2),
            "5m" => Some(Interval::M5),
            "15m" => Some(Interval::M15),
            "30m" => Some(Interval::M30),
            "60m" => Some(Interval::M60),
            "90m" => Some(Interval::M90),
            "1h" => Some(Interval::H1),
            "1d" => Some(Interval::D1),
            "5d" => Some(Interval::D5),
            "1wk" => Some(Interval::W1),
            "1mo" => Some(Interval::Mo1),
            "3mo" => Some(Interval::Mo3),
            _ => None,
        }
    }

    /// 장중(일봉 미만) 간격 여부.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::M1
                | Interval::M2
                | Interval::M5
                | Interval::M15
                | Interval::M30
                | Interval::M60
                | Interval::M90
                | Interval::H1
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_yahoo_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yahoo_str(s).ok_or_else(|| format!("Invalid interval: {}", s))
    }
}
