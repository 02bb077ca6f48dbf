//! 외부 응답 → 도메인 타입 변환.

use analyst_core::{normalize_series, FundamentalData, OhlcvBar, NOT_AVAILABLE};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::debug;

/// Yahoo 응답 한 행의 원시 값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawQuote {
    /// Unix 타임스탬프 (초)
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl RawQuote {
    /// 도메인 캔들로 변환합니다. 가격이 유한하지 않거나 타임스탬프가 잘못되면 `None`.
    pub fn to_bar(&self) -> Option<OhlcvBar> {
        let date = Utc.timestamp_opt(self.timestamp, 0).single()?;
        Some(OhlcvBar::new(
            date,
            finite_decimal(self.open)?,
            finite_decimal(self.high)?,
            finite_decimal(self.low)?,
            finite_decimal(self.close)?,
            Decimal::from(self.volume),
        ))
    }
}

fn finite_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64_retain(value)
    } else {
        None
    }
}

/// 원시 행을 날짜 오름차순, 중복 없는 캔들 시계열로 변환합니다.
///
/// 변환할 수 없는 행(휴장일의 빈 값 등)은 건너뜁니다.
pub fn bars_from_quotes(symbol: &str, quotes: &[RawQuote]) -> Vec<OhlcvBar> {
    let bars: Vec<OhlcvBar> = quotes.iter().filter_map(RawQuote::to_bar).collect();

    let skipped = quotes.len() - bars.len();
    if skipped > 0 {
        debug!(symbol = symbol, skipped = skipped, "변환할 수 없는 시세 행 제외");
    }

    normalize_series(bars)
}

/// quote summary에서 추출한 원시 펀더멘털 값.
///
/// 배당수익률과 이익률은 Yahoo 원본과 같이 비율(0.0123)로 담습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFundamentals {
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
}

impl RawFundamentals {
    /// 도메인 펀더멘털로 변환합니다.
    ///
    /// 비율 값은 퍼센트로 바꾸며, 0이거나 없는 비율은 `None`입니다.
    pub fn into_fundamentals(self) -> FundamentalData {
        FundamentalData {
            market_cap: finite(self.market_cap),
            sector: non_empty_or_na(self.sector),
            industry: non_empty_or_na(self.industry),
            trailing_pe: finite(self.trailing_pe),
            forward_pe: finite(self.forward_pe),
            price_to_book: finite(self.price_to_book),
            beta: finite(self.beta),
            dividend_yield: as_percent(self.dividend_yield),
            trailing_eps: finite(self.trailing_eps),
            forward_eps: finite(self.forward_eps),
            profit_margins: as_percent(self.profit_margins),
            operating_margins: as_percent(self.operating_margins),
        }
    }
}

/// 유한한 값만 통과시킵니다.
///
/// Yahoo의 `"Infinity"`는 크레이트에서 `f64::MAX`로 들어오므로 함께 제외합니다.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && v.abs() < f64::MAX)
}

fn as_percent(ratio: Option<f64>) -> Option<f64> {
    finite(ratio).filter(|v| *v != 0.0).map(|v| v * 100.0)
}

fn non_empty_or_na(value: Option<String>) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
