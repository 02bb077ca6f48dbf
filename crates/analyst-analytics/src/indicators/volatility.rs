//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (모집단 표준편차)
//! - ATR / NATR (Wilder 평활)

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_period, ensure_same_len, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드.
    pub upper: Option<Decimal>,
    /// 중간 밴드 (SMA).
    pub middle: Option<Decimal>,
    /// 하단 밴드.
    pub lower: Option<Decimal>,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 중간 밴드 = SMA(period)
    /// 상단/하단 = 중간 ± 배수 × 최근 period개 종가의 모집단 표준편차
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = ensure_period("Bollinger", params.period)?;
        let n = Decimal::from(period);

        let mut result = Vec::with_capacity(prices.len());
        let mut sum = Decimal::ZERO;
        let mut sum_sq = Decimal::ZERO;

        for (i, price) in prices.iter().enumerate() {
            sum += *price;
            sum_sq += *price * *price;
            if i >= period {
                let old = prices[i - period];
                sum -= old;
                sum_sq -= old * old;
            }

            if i + 1 < period {
                result.push(BollingerBandsResult::default());
                continue;
            }

            let mean = sum / n;
            // 반올림 오차로 아주 작은 음수가 나올 수 있음
            let variance = (sum_sq / n - mean * mean).max(Decimal::ZERO);
            let deviation = params.std_dev_multiplier * sqrt_decimal(variance);

            result.push(BollingerBandsResult {
                upper: Some(mean + deviation),
                middle: Some(mean),
                lower: Some(mean - deviation),
            });
        }

        Ok(result)
    }

    /// True Range 계산.
    ///
    /// TR = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
    ///
    /// 전일 종가가 없는 첫 행은 None입니다.
    pub fn true_range(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        ensure_same_len(high.len(), &[low.len(), close.len()])?;

        Ok((0..close.len())
            .map(|i| {
                (i > 0).then(|| {
                    let prev_close = close[i - 1];
                    (high[i] - low[i])
                        .max((high[i] - prev_close).abs())
                        .max((low[i] - prev_close).abs())
                })
            })
            .collect())
    }

    /// ATR (Average True Range) 계산.
    ///
    /// 첫 ATR(인덱스 period) = TR\[1..=period\]의 평균
    /// 이후 ATR = (이전 ATR × (period - 1) + TR) / period
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("ATR", params.period)?;
        let tr = self.true_range(high, low, close)?;
        let n = Decimal::from(period);

        let mut result = Vec::with_capacity(tr.len());
        let mut seed_sum = Decimal::ZERO;
        let mut prev: Option<Decimal> = None;

        for (i, value) in tr.iter().enumerate() {
            let Some(tr_i) = *value else {
                result.push(None);
                continue;
            };

            let atr = match prev {
                Some(p) => Some((p * (n - Decimal::ONE) + tr_i) / n),
                None => {
                    seed_sum += tr_i;
                    (i == period).then(|| seed_sum / n)
                }
            };

            if atr.is_some() {
                prev = atr;
            }
            result.push(atr);
        }

        Ok(result)
    }

    /// NATR (Normalized ATR) 계산: 100 × ATR / 종가.
    ///
    /// 종가가 0이면 0으로 대체합니다.
    pub fn natr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let atr = self.atr(high, low, close, params)?;
        Ok(normalize_atr(&atr, close))
    }
}

/// ATR 시계열을 종가 대비 퍼센트로 변환합니다.
pub(crate) fn normalize_atr(atr: &[Option<Decimal>], close: &[Decimal]) -> Vec<Option<Decimal>> {
    atr.iter()
        .zip(close.iter())
        .map(|(atr, close)| {
            atr.map(|a| {
                if close.is_zero() {
                    Decimal::ZERO
                } else {
                    dec!(100) * a / *close
                }
            })
        })
        .collect()
}

/// Decimal 제곱근.
///
/// f64 근사값에서 시작해 Newton-Raphson으로 정밀도를 보정합니다.
pub(crate) fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|seed| !seed.is_zero())
        .unwrap_or(value);

    let two = dec!(2);
    for _ in 0..4 {
        x = (x + value / x) / two;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(dec!(4)).round_dp(12), dec!(2));
        assert_eq!(sqrt_decimal(dec!(2.25)).round_dp(12), dec!(1.5));
        assert!((sqrt_decimal(dec!(2)) - dec!(1.41421356237)).abs() < dec!(0.00000000001));
        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let vol = VolatilityIndicators::new();
        let bands = vol
            .bollinger_bands(&vec![dec!(42.5); 25], BollingerBandsParams::default())
            .unwrap();

        assert!(bands[18].middle.is_none());
        let last = bands[24];
        assert_eq!(last.middle, Some(dec!(42.5)));
        assert_eq!(last.upper, last.middle);
        assert_eq!(last.lower, last.middle);
    }

    #[test]
    fn test_bollinger_population_std() {
        let vol = VolatilityIndicators::new();
        // 2, 4, 4, 4, 5, 5, 7, 9 → 평균 5, 모집단 표준편차 2
        let data: Vec<Decimal> = [2, 4, 4, 4, 5, 5, 7, 9].iter().map(|v| Decimal::from(*v)).collect();
        let bands = vol
            .bollinger_bands(
                &data,
                BollingerBandsParams {
                    period: 8,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        let last = bands[7];
        assert_eq!(last.middle, Some(dec!(5)));
        assert_eq!(last.upper.map(|v| v.round_dp(10)), Some(dec!(9)));
        assert_eq!(last.lower.map(|v| v.round_dp(10)), Some(dec!(1)));
    }

    #[test]
    fn test_atr_wilder() {
        let vol = VolatilityIndicators::new();
        let high = vec![dec!(10), dec!(12), dec!(13), dec!(14)];
        let low = vec![dec!(8), dec!(10), dec!(11), dec!(12)];
        let close = vec![dec!(9), dec!(11), dec!(12), dec!(13)];

        // TR = [None, 3, 2, 2]
        let atr = vol.atr(&high, &low, &close, AtrParams { period: 2 }).unwrap();
        assert_eq!(atr[0], None);
        assert_eq!(atr[1], None);
        assert_eq!(atr[2], Some(dec!(2.5)));
        // (2.5 × 1 + 2) / 2 = 2.25
        assert_eq!(atr[3], Some(dec!(2.25)));

        let natr = vol.natr(&high, &low, &close, AtrParams { period: 2 }).unwrap();
        assert_eq!(natr[3], Some(dec!(100) * dec!(2.25) / dec!(13)));
    }

    #[test]
    fn test_natr_zero_close() {
        let natr = normalize_atr(&[Some(dec!(1.5)), None], &[Decimal::ZERO, dec!(10)]);
        assert_eq!(natr, vec![Some(Decimal::ZERO), None]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let vol = VolatilityIndicators::new();
        let result = vol.true_range(&[dec!(1), dec!(2)], &[dec!(1)], &[dec!(1), dec!(2)]);
        assert!(result.is_err());
    }
}
