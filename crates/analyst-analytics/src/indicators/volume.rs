//! 거래량 지표.
//!
//! - OBV (On-Balance Volume): 첫 행의 거래량으로 시작하는 누적합
//! - AD (Accumulation/Distribution Line): 첫 행부터의 자금흐름 누적합
//!
//! 두 지표 모두 모든 행에서 정의됩니다.

use rust_decimal::Decimal;

use super::{ensure_same_len, IndicatorResult};

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators;

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV 계산.
    ///
    /// 종가가 오르면 거래량을 더하고, 내리면 빼고, 같으면 유지합니다.
    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<Option<Decimal>>> {
        ensure_same_len(close.len(), &[volume.len()])?;

        let mut result = Vec::with_capacity(close.len());
        let mut obv = Decimal::ZERO;

        for i in 0..close.len() {
            if i == 0 {
                obv = volume[0];
            } else if close[i] > close[i - 1] {
                obv += volume[i];
            } else if close[i] < close[i - 1] {
                obv -= volume[i];
            }
            result.push(Some(obv));
        }

        Ok(result)
    }

    /// AD 계산.
    ///
    /// MFM = ((종가 - 저가) - (고가 - 종가)) / (고가 - 저가), 고가 == 저가이면 0
    /// AD = Σ MFM × 거래량
    pub fn ad(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        volume: &[Decimal],
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        ensure_same_len(close.len(), &[high.len(), low.len(), volume.len()])?;

        let mut result = Vec::with_capacity(close.len());
        let mut ad = Decimal::ZERO;

        for i in 0..close.len() {
            let range = high[i] - low[i];
            if !range.is_zero() {
                let multiplier = ((close[i] - low[i]) - (high[i] - close[i])) / range;
                ad += multiplier * volume[i];
            }
            result.push(Some(ad));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_obv_seeded_with_first_volume() {
        let vol = VolumeIndicators::new();
        let close = vec![dec!(10), dec!(11), dec!(11), dec!(9)];
        let volume = vec![dec!(100), dec!(200), dec!(300), dec!(50)];

        let obv = vol.obv(&close, &volume).unwrap();
        assert_eq!(
            obv,
            vec![Some(dec!(100)), Some(dec!(300)), Some(dec!(300)), Some(dec!(250))]
        );
    }

    #[test]
    fn test_ad_line() {
        let vol = VolumeIndicators::new();
        let high = vec![dec!(12), dec!(10)];
        let low = vec![dec!(8), dec!(10)];
        let close = vec![dec!(11), dec!(10)];
        let volume = vec![dec!(1000), dec!(500)];

        // MFM = ((11-8) - (12-11)) / 4 = 0.5 → 500, 두 번째 행은 고가 == 저가 → 0
        let ad = vol.ad(&high, &low, &close, &volume).unwrap();
        assert_eq!(ad, vec![Some(dec!(500)), Some(dec!(500))]);
    }

    #[test]
    fn test_empty_input() {
        let vol = VolumeIndicators::new();
        assert!(vol.obv(&[], &[]).unwrap().is_empty());
        assert!(vol.ad(&[], &[], &[], &[]).unwrap().is_empty());
    }
}
