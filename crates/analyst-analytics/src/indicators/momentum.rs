//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index)
//! - Momentum (종가 차이)
//! - ROC (Rate of Change, 퍼센트)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_period, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// Momentum / ROC 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackParams {
    /// 비교 시점까지의 거리 (기본: 10).
    pub period: usize,
}

impl Default for LookbackParams {
    fn default() -> Self {
        Self { period: 10 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// 최근 period개 종가 변화량의 상승분 평균과 하락분 평균(절대값)으로 계산합니다.
    ///
    /// RSI = 100 - 100 / (1 + 평균상승/평균하락) = 100 × 상승합 / (상승합 + 하락합)
    ///
    /// 평균 하락이 0이면 RSI는 100입니다 (변화가 전혀 없는 경우 포함).
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값 (처음 period개는 None)
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("RSI", params.period)?;

        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());
        gains.push(Decimal::ZERO);
        losses.push(Decimal::ZERO);
        for pair in prices.windows(2) {
            let change = pair[1] - pair[0];
            gains.push(change.max(Decimal::ZERO));
            losses.push((-change).max(Decimal::ZERO));
        }

        let mut result = Vec::with_capacity(prices.len());
        let mut gain_sum = Decimal::ZERO;
        let mut loss_sum = Decimal::ZERO;

        for i in 0..prices.len() {
            if i >= 1 {
                gain_sum += gains[i];
                loss_sum += losses[i];
            }
            if i > period {
                gain_sum -= gains[i - period];
                loss_sum -= losses[i - period];
            }

            if i < period {
                result.push(None);
            } else if loss_sum.is_zero() {
                result.push(Some(dec!(100)));
            } else {
                result.push(Some(dec!(100) * gain_sum / (gain_sum + loss_sum)));
            }
        }

        Ok(result)
    }

    /// Momentum 계산: close\[i\] - close\[i - n\].
    pub fn momentum(
        &self,
        prices: &[Decimal],
        params: LookbackParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("Momentum", params.period)?;

        Ok((0..prices.len())
            .map(|i| (i >= period).then(|| prices[i] - prices[i - period]))
            .collect())
    }

    /// ROC 계산: (close\[i\] / close\[i - n\] - 1) × 100.
    ///
    /// 기준 종가가 0이면 0으로 대체합니다.
    pub fn roc(
        &self,
        prices: &[Decimal],
        params: LookbackParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = ensure_period("ROC", params.period)?;

        Ok((0..prices.len())
            .map(|i| {
                (i >= period).then(|| {
                    let base = prices[i - period];
                    if base.is_zero() {
                        Decimal::ZERO
                    } else {
                        (prices[i] / base - Decimal::ONE) * dec!(100)
                    }
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_rsi_undefined_until_window_fills() {
        let calc = MomentumCalculator::new();
        let data: Vec<Decimal> = (1..=20).map(Decimal::from).collect();
        let rsi = calc.rsi(&data, RsiParams::default()).unwrap();

        assert_eq!(rsi.len(), 20);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert_eq!(rsi[14], Some(dec!(100)));
    }

    #[test]
    fn test_rsi_flat_series_is_100() {
        let calc = MomentumCalculator::new();
        let rsi = calc.rsi(&vec![dec!(50); 30], RsiParams::default()).unwrap();

        assert_eq!(rsi[29], Some(dec!(100)));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        let calc = MomentumCalculator::new();
        // 상승 +1, 하락 -1 반복 → 평균상승 = 평균하락 → 50
        let rsi = calc
            .rsi(&prices(&[10, 11, 10, 11, 10]), RsiParams { period: 4 })
            .unwrap();

        assert_eq!(rsi[4], Some(dec!(50)));
    }

    #[test]
    fn test_rsi_falling_series_is_zero() {
        let calc = MomentumCalculator::new();
        let data: Vec<Decimal> = (1..=20).rev().map(Decimal::from).collect();
        let rsi = calc.rsi(&data, RsiParams::default()).unwrap();

        assert_eq!(rsi[19], Some(Decimal::ZERO));
    }

    #[test]
    fn test_rsi_window_slides() {
        let calc = MomentumCalculator::new();
        // 기간 2: 인덱스 3에서 변화량은 (-2, +1) → 100 × 1 / 3
        let rsi = calc
            .rsi(&prices(&[10, 15, 13, 14]), RsiParams { period: 2 })
            .unwrap();

        assert_eq!(rsi[2], Some(dec!(100) * dec!(5) / dec!(7)));
        assert_eq!(rsi[3], Some(dec!(100) / dec!(3)));
    }

    #[test]
    fn test_momentum_and_roc() {
        let calc = MomentumCalculator::new();
        let data = prices(&[100, 110, 121]);

        let mom = calc.momentum(&data, LookbackParams { period: 1 }).unwrap();
        assert_eq!(mom, vec![None, Some(dec!(10)), Some(dec!(11))]);

        let roc = calc.roc(&data, LookbackParams { period: 2 }).unwrap();
        assert_eq!(roc, vec![None, None, Some(dec!(21))]);
    }

    #[test]
    fn test_roc_zero_base() {
        let calc = MomentumCalculator::new();
        let roc = calc
            .roc(&prices(&[0, 5]), LookbackParams { period: 1 })
            .unwrap();

        assert_eq!(roc[1], Some(Decimal::ZERO));
    }
}
