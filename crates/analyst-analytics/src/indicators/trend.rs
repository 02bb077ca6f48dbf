//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//!
//! 모든 결과는 입력과 같은 길이이며, 윈도우가 채워지지 않은 구간은 `None`입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_period, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// 누적 합을 이동시키며 계산하므로 입력 길이에 선형입니다.
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("SMA", params.period)?;
        let period_decimal = Decimal::from(period);

        let mut result = Vec::with_capacity(prices.len());
        let mut sum = Decimal::ZERO;

        for (i, price) in prices.iter().enumerate() {
            sum += *price;
            if i >= period {
                sum -= prices[i - period];
            }

            if i + 1 >= period {
                result.push(Some(sum / period_decimal));
            } else {
                result.push(None);
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = 이전 EMA + k × (현재가 - 이전 EMA), k = 2 / (period + 1)
    ///
    /// 첫 EMA는 처음 period개 값의 SMA로 시작합니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("EMA", params.period)?;
        let values: Vec<Option<Decimal>> = prices.iter().copied().map(Some).collect();
        Ok(ema_series(&values, period))
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = 정의된 MACD 값들의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// 기본 파라미터에서 MACD는 인덱스 25부터, 시그널은 인덱스 33부터 정의됩니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_period("MACD fast", params.fast_period)?;
        ensure_period("MACD slow", params.slow_period)?;
        let signal_period = ensure_period("MACD signal", params.signal_period)?;

        let fast = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow = self.ema(prices, EmaParams { period: params.slow_period })?;

        let macd_line: Vec<Option<Decimal>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(*f - *s),
                _ => None,
            })
            .collect();

        let signal_line = ema_series(&macd_line, signal_period);

        Ok(macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| MacdResult {
                macd,
                signal,
                histogram: match (macd, signal) {
                    (Some(m), Some(s)) => Some(m - s),
                    _ => None,
                },
            })
            .collect())
    }
}

/// 앞쪽 `None` 구간을 건너뛰고 정의된 값들에 대해 EMA를 계산합니다.
///
/// 시드는 처음 `period`개 정의된 값의 SMA입니다.
/// 시드 이후에 나타나는 `None`은 해당 시점을 `None`으로 두고 이전 EMA를 유지합니다.
pub(crate) fn ema_series(values: &[Option<Decimal>], period: usize) -> Vec<Option<Decimal>> {
    let multiplier = dec!(2) / Decimal::from(period + 1);
    let mut result = Vec::with_capacity(values.len());

    let mut seed_sum = Decimal::ZERO;
    let mut seed_count = 0usize;
    let mut prev: Option<Decimal> = None;

    for value in values {
        let Some(x) = *value else {
            result.push(None);
            continue;
        };

        match prev {
            Some(p) => {
                let ema = p + multiplier * (x - p);
                prev = Some(ema);
                result.push(Some(ema));
            }
            None => {
                seed_sum += x;
                seed_count += 1;
                if seed_count == period {
                    let seed = seed_sum / Decimal::from(period);
                    prev = Some(seed);
                    result.push(Some(seed));
                } else {
                    result.push(None);
                }
            }
        }
    }

    result
}
