//! 기술적 지표 모듈.
//!
//! OHLCV 시계열에서 고정된 지표 묶음을 계산해 입력과 같은 길이의 열로 돌려줍니다.
//! 모든 지표는 인과적(causal)이며 윈도우가 채워지지 않은 구간은 `None`입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (20 / 50 / 200)
//! - **EMA**: 지수 이동평균 (MACD 내부용)
//! - **MACD**: 이동평균 수렴/확산 (12, 26, 9)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (14)
//! - **Momentum / ROC**: 10기간 가격 변화 (절대/퍼센트), 1기간 ROC는 수익률
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드 (20, 2σ)
//! - **ATR / NATR**: 평균 실제 범위 (14, Wilder)
//!
//! ## 거래량 지표 (Volume Indicators)
//! - **OBV**, **AD**
//!
//! # 사용 예시
//!
//! ```ignore
//! use analyst_analytics::indicators::IndicatorEngine;
//!
//! let engine = IndicatorEngine::new();
//! let enriched = engine.enrich(&bars)?;
//! ```

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use analyst_core::OhlcvBar;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::enriched::EnrichedRow;

pub use momentum::{LookbackParams, MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{AtrParams, BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};
pub use volume::VolumeIndicators;

/// 지표 계산 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 입력 열 길이 불일치
    #[error("입력 길이 불일치: 기대 {expected}개, 실제 {actual}개")]
    LengthMismatch { expected: usize, actual: usize },
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl From<IndicatorError> for analyst_core::AnalysisError {
    fn from(err: IndicatorError) -> Self {
        analyst_core::AnalysisError::Indicator(err.to_string())
    }
}

/// 기간이 0이 아닌지 확인합니다.
pub(crate) fn ensure_period(name: &str, period: usize) -> IndicatorResult<usize> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} 기간은 0보다 커야 합니다",
            name
        )));
    }
    Ok(period)
}

/// 모든 입력 열의 길이가 같은지 확인합니다.
pub(crate) fn ensure_same_len(expected: usize, others: &[usize]) -> IndicatorResult<()> {
    match others.iter().find(|len| **len != expected) {
        Some(actual) => Err(IndicatorError::LengthMismatch {
            expected,
            actual: *actual,
        }),
        None => Ok(()),
    }
}

/// 지표 묶음 파라미터.
///
/// 기본값은 고정 지표 묶음(수익률=ROC(1), SMA 20/50/200, RSI 14, MACD 12/26/9,
/// 볼린저 20/2σ, ATR 14, Momentum 10, ROC 10)입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub returns: LookbackParams,
    pub ma_short: SmaParams,
    pub ma_medium: SmaParams,
    pub ma_long: SmaParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub bollinger: BollingerBandsParams,
    pub atr: AtrParams,
    pub momentum: LookbackParams,
    pub roc: LookbackParams,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            returns: LookbackParams { period: 1 },
            ma_short: SmaParams { period: 20 },
            ma_medium: SmaParams { period: 50 },
            ma_long: SmaParams { period: 200 },
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            bollinger: BollingerBandsParams::default(),
            atr: AtrParams::default(),
            momentum: LookbackParams::default(),
            roc: LookbackParams::default(),
        }
    }
}

impl IndicatorSettings {
    /// 모든 기간이 0보다 큰지 검증합니다.
    pub fn validate(&self) -> IndicatorResult<()> {
        ensure_period("returns", self.returns.period)?;
        ensure_period("MA short", self.ma_short.period)?;
        ensure_period("MA medium", self.ma_medium.period)?;
        ensure_period("MA long", self.ma_long.period)?;
        ensure_period("RSI", self.rsi.period)?;
        ensure_period("MACD fast", self.macd.fast_period)?;
        ensure_period("MACD slow", self.macd.slow_period)?;
        ensure_period("MACD signal", self.macd.signal_period)?;
        ensure_period("Bollinger", self.bollinger.period)?;
        ensure_period("ATR", self.atr.period)?;
        ensure_period("Momentum", self.momentum.period)?;
        ensure_period("ROC", self.roc.period)?;
        Ok(())
    }
}

/// 통합 지표 엔진.
///
/// 개별 지표 계산기를 묶어 OHLCV 시계열 전체를 한 번에 보강합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    volume: VolumeIndicators,
}

impl IndicatorEngine {
    /// 기본 지표 묶음으로 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자 지정 파라미터로 엔진 생성.
    pub fn with_settings(settings: IndicatorSettings) -> IndicatorResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    /// 현재 파라미터.
    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    // ==================== 개별 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 계산.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// RSI 계산.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR 계산.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }

    /// OBV 계산.
    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volume.obv(close, volume)
    }

    // ==================== 시계열 보강 ====================

    /// OHLCV 시계열에 전체 지표 묶음을 계산해 붙입니다.
    ///
    /// 출력 길이와 순서는 입력과 같습니다. 빈 입력은 빈 출력입니다.
    pub fn enrich(&self, bars: &[OhlcvBar]) -> IndicatorResult<Vec<EnrichedRow>> {
        let s = &self.settings;

        let close: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let high: Vec<Decimal> = bars.iter().map(|b| b.high).collect();
        let low: Vec<Decimal> = bars.iter().map(|b| b.low).collect();
        let volume: Vec<Decimal> = bars.iter().map(|b| b.volume).collect();

        let returns = self.momentum.roc(&close, s.returns)?;
        let ma20 = self.trend.sma(&close, s.ma_short)?;
        let ma50 = self.trend.sma(&close, s.ma_medium)?;
        let ma200 = self.trend.sma(&close, s.ma_long)?;
        let rsi = self.momentum.rsi(&close, s.rsi)?;
        let macd = self.trend.macd(&close, s.macd)?;
        let bands = self.volatility.bollinger_bands(&close, s.bollinger)?;
        let atr = self.volatility.atr(&high, &low, &close, s.atr)?;
        let natr = volatility::normalize_atr(&atr, &close);
        let obv = self.volume.obv(&close, &volume)?;
        let ad = self.volume.ad(&high, &low, &close, &volume)?;
        let momentum = self.momentum.momentum(&close, s.momentum)?;
        let roc = self.momentum.roc(&close, s.roc)?;

        let rows: Vec<EnrichedRow> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| EnrichedRow {
                bar: bar.clone(),
                returns: returns[i],
                ma20: ma20[i],
                ma50: ma50[i],
                ma200: ma200[i],
                rsi: rsi[i],
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                macd_hist: macd[i].histogram,
                bb_upper: bands[i].upper,
                bb_middle: bands[i].middle,
                bb_lower: bands[i].lower,
                atr: atr[i],
                natr: natr[i],
                obv: obv[i],
                ad: ad[i],
                momentum: momentum[i],
                roc: roc[i],
            })
            .collect();

        debug!(rows = rows.len(), "지표 계산 완료");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn flat_bars(n: usize) -> Vec<OhlcvBar> {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                OhlcvBar::new(
                    start + Duration::days(i as i64),
                    dec!(100),
                    dec!(100),
                    dec!(100),
                    dec!(100),
                    dec!(1000),
                )
            })
            .collect()
    }

    #[test]
    fn test_enrich_preserves_length() {
        let engine = IndicatorEngine::new();
        for n in [0, 1, 19, 20, 250] {
            assert_eq!(engine.enrich(&flat_bars(n)).unwrap().len(), n);
        }
    }

    #[test]
    fn test_enrich_flat_series() {
        let engine = IndicatorEngine::new();
        let rows = engine.enrich(&flat_bars(250)).unwrap();
        let last = rows.last().unwrap();

        assert_eq!(last.rsi, Some(dec!(100)));
        assert_eq!(last.macd_hist, Some(Decimal::ZERO));
        assert_eq!(last.bb_upper, last.bb_middle);
        assert_eq!(last.bb_lower, last.bb_middle);
        assert_eq!(last.ma200, Some(dec!(100)));
        assert_eq!(last.atr, Some(Decimal::ZERO));
        assert_eq!(last.returns, Some(Decimal::ZERO));
        assert_eq!(last.obv, Some(dec!(1000)));
        assert_eq!(last.ad, Some(Decimal::ZERO));

        assert!(rows[198].ma200.is_none());
        assert!(rows[199].ma200.is_some());
        assert!(rows[13].rsi.is_none());
        assert!(rows[14].rsi.is_some());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = IndicatorSettings::default();
        assert!(IndicatorEngine::with_settings(settings).is_ok());

        settings.rsi.period = 0;
        assert!(matches!(
            IndicatorEngine::with_settings(settings),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_ensure_same_len() {
        assert!(ensure_same_len(3, &[3, 3]).is_ok());
        assert_eq!(
            ensure_same_len(3, &[3, 2]),
            Err(IndicatorError::LengthMismatch { expected: 3, actual: 2 })
        );
    }
}
