//! 요약 통계 빌더.
//!
//! 보강된 시계열의 마지막 두 행과 펀더멘털 데이터를 평탄한 통계 레코드로 축약합니다.
//! 정의되지 않은 지표는 `None`으로 남기며, 0으로 취급하지 않습니다.

use analyst_core::{AnalysisError, AnalysisResult, FundamentalData, StatsRecord, TechnicalStats, Trend};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::enriched::EnrichedRow;
use crate::numeric::{round2, truncate_int};

/// 요약 통계 빌더.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 통계 레코드를 생성합니다.
    ///
    /// 행이 하나뿐이면 전일 행도 같은 행으로 간주합니다 (일간 변화 0).
    ///
    /// # Errors
    ///
    /// 빈 시계열이면 `AnalysisError::EmptySeries`.
    pub fn build(
        &self,
        rows: &[EnrichedRow],
        fundamentals: FundamentalData,
        ticker: &str,
    ) -> AnalysisResult<StatsRecord> {
        let last = rows.last().ok_or(AnalysisError::EmptySeries)?;
        let prev = if rows.len() > 1 {
            &rows[rows.len() - 2]
        } else {
            last
        };

        let yearly_high = rows.iter().map(|r| r.bar.high).max().unwrap_or(last.bar.high);
        let yearly_low = rows.iter().map(|r| r.bar.low).min().unwrap_or(last.bar.low);

        let trend = classify_trend(last);
        let trend_strength = trend_strength(last);

        debug!(
            ticker = ticker,
            trend = %trend,
            trend_strength = %trend_strength.round_dp(2),
            "요약 통계 생성"
        );

        Ok(StatsRecord {
            technical: TechnicalStats {
                current_price: round2(last.close()),
                daily_change: round2(last.close() - prev.close()),
                daily_return: last.returns.map(round2),
                yearly_return: last.roc.map(round2),
                daily_volume: truncate_int(last.bar.volume),
                obv: last.obv.map(truncate_int),
                ad_line: last.ad.map(truncate_int),
                atr: last.atr.map(round2),
                natr: last.natr.map(round2),
                momentum: last.momentum.map(round2),
                roc: last.roc.map(round2),
                rsi: last.rsi.map(round2),
                ma20: last.ma20.map(round2),
                ma50: last.ma50.map(round2),
                ma200: last.ma200.map(round2),
                macd: last.macd.map(round2),
                macd_signal: last.macd_signal.map(round2),
                macd_hist: last.macd_hist.map(round2),
                bb_upper: last.bb_upper.map(round2),
                bb_middle: last.bb_middle.map(round2),
                bb_lower: last.bb_lower.map(round2),
                yearly_high: round2(yearly_high),
                yearly_low: round2(yearly_low),
                ticker: ticker.to_string(),
                trend,
                trend_strength: round2(trend_strength),
            },
            fundamental: fundamentals,
        })
    }
}

/// 두 값이 모두 정의되어 있고 `a > b`일 때만 참.
fn above(a: Option<Decimal>, b: Option<Decimal>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// 추세 분류.
///
/// ma50 > ma200, macd > signal, rsi > 50, close > bb_middle 네 조건을 모두 만족하면 상승.
/// 비교 대상이 정의되지 않은 조건은 불충족으로 봅니다.
pub fn classify_trend(row: &EnrichedRow) -> Trend {
    let bullish = above(row.ma50, row.ma200)
        && above(row.macd, row.macd_signal)
        && above(row.rsi, Some(dec!(50)))
        && above(Some(row.close()), row.bb_middle);

    if bullish {
        Trend::Bullish
    } else {
        Trend::Bearish
    }
}

/// 추세 강도: 세 항의 평균.
///
/// - |ma50 - ma200| / ma200 × 100
/// - |rsi - 50|
/// - |macd_hist| / close × 100
///
/// 입력이 정의되지 않았거나 분모가 0인 항은 0입니다.
pub fn trend_strength(row: &EnrichedRow) -> Decimal {
    let hundred = dec!(100);

    let ma_term = match (row.ma50, row.ma200) {
        (Some(ma50), Some(ma200)) if !ma200.is_zero() => (ma50 - ma200).abs() / ma200 * hundred,
        _ => Decimal::ZERO,
    };
    let rsi_term = row.rsi.map(|rsi| (rsi - dec!(50)).abs()).unwrap_or_default();
    let macd_term = match row.macd_hist {
        Some(hist) if !row.close().is_zero() => hist.abs() / row.close() * hundred,
        _ => Decimal::ZERO,
    };

    (ma_term + rsi_term + macd_term) / dec!(3)
}
