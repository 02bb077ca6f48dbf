//! 차트용 시계열 포매터.
//!
//! 보강된 행을 날짜별 표시 행으로 바꿉니다. 정의되지 않은 지표에 대한
//! 기본값 대체는 이 경계에서만 일어나며, 계산 단계로 되돌아가지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::enriched::EnrichedRow;
use crate::numeric::{round2, truncate_int};

/// RSI가 정의되지 않았을 때의 중립값.
const NEUTRAL_RSI: Decimal = dec!(50);

/// 차트 표시용 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    /// 날짜 (YYYY-MM-DD)
    pub date: String,
    /// 종가
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub returns: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub atr: f64,
    pub obv: i64,
    pub ad: i64,
    pub momentum: f64,
    pub roc: f64,
    pub natr: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
}

/// 시계열 포매터.
///
/// 대체 규칙:
/// - returns, atr, natr, obv, ad, momentum, roc, macd 계열 → 0
/// - 이동평균과 볼린저 밴드 → 해당 행의 종가
/// - rsi → 50
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesFormatter;

impl SeriesFormatter {
    pub fn new() -> Self {
        Self
    }

    /// 행 순서를 유지하며 표시 행으로 변환합니다.
    pub fn format(&self, rows: &[EnrichedRow]) -> Vec<DisplayRow> {
        rows.iter().map(|row| self.format_row(row)).collect()
    }

    /// 한 행을 변환합니다.
    pub fn format_row(&self, row: &EnrichedRow) -> DisplayRow {
        let close = row.close();
        let or_zero = |v: Option<Decimal>| round2(v.unwrap_or_default());
        let or_close = |v: Option<Decimal>| round2(v.unwrap_or(close));

        DisplayRow {
            date: row.date().format("%Y-%m-%d").to_string(),
            price: round2(close),
            open: round2(row.bar.open),
            high: round2(row.bar.high),
            low: round2(row.bar.low),
            volume: truncate_int(row.bar.volume),
            returns: or_zero(row.returns),
            ma20: or_close(row.ma20),
            ma50: or_close(row.ma50),
            ma200: or_close(row.ma200),
            atr: or_zero(row.atr),
            obv: truncate_int(row.obv.unwrap_or_default()),
            ad: truncate_int(row.ad.unwrap_or_default()),
            momentum: or_zero(row.momentum),
            roc: or_zero(row.roc),
            natr: or_zero(row.natr),
            rsi: round2(row.rsi.unwrap_or(NEUTRAL_RSI)),
            macd: or_zero(row.macd),
            macd_signal: or_zero(row.macd_signal),
            macd_hist: or_zero(row.macd_hist),
            bb_upper: or_close(row.bb_upper),
            bb_middle: or_close(row.bb_middle),
            bb_lower: or_close(row.bb_lower),
        }
    }
}
