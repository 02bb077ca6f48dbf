//! 주식 분석 엔진.
//!
//! 이 crate는 다음을 제공합니다:
//! - 기술적 지표 엔진 (SMA, RSI, MACD, 볼린저 밴드, ATR/NATR, OBV/AD, Momentum/ROC)
//! - 요약 통계 빌더 (추세 분류 및 추세 강도)
//! - 차트용 시계열 포매터
//! - 분석 파이프라인 (조회 → 지표 → 기간 절삭 → 펀더멘털 → 요약/포맷)

pub mod enriched;
pub mod formatter;
pub mod indicators;
pub mod numeric;
pub mod pipeline;
pub mod summary;

pub use enriched::EnrichedRow;
pub use formatter::{DisplayRow, SeriesFormatter};
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorSettings};
pub use pipeline::{trim_to_period, AnalysisOutcome, AnalysisPipeline, PipelineSettings};
pub use summary::SummaryBuilder;
