//! 외부 협력자 추상화.
//!
//! 파이프라인은 시세 소스, 메타데이터 소스, 질의 해석기, 내러티브 생성기를
//! trait 객체로만 알고 있으며 구체 구현(Yahoo, LLM, 규칙 기반 등)은 주입됩니다.

use async_trait::async_trait;

use super::{ExtractedQuery, FundamentalData, NarrativeText, OhlcvBar, StatsRecord};
use crate::error::{AnalysisResult, SourceError};
use crate::types::Interval;

/// 과거 시세 데이터 소스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 심볼의 전체 이력을 조회합니다.
    ///
    /// # Errors
    ///
    /// - `SourceError::NotFound`: 존재하지 않는 심볼
    /// - `SourceError::Unavailable` / `SourceError::Timeout`: 일시적 장애
    async fn fetch_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<OhlcvBar>, SourceError>;
}

/// 펀더멘털 메타데이터 소스.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// 심볼의 펀더멘털 지표를 조회합니다. 개별 필드는 비어 있을 수 있습니다.
    async fn fetch_metadata(&self, symbol: &str) -> Result<FundamentalData, SourceError>;
}

/// 자연어 질의 해석기.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    /// 자유 텍스트에서 심볼/기간/간격을 추출합니다.
    async fn interpret(&self, text: &str) -> AnalysisResult<ExtractedQuery>;
}

/// 내러티브 생성기.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// 통계 레코드와 사용자 질문으로 분석 텍스트를 생성합니다.
    async fn narrate(&self, stats: &StatsRecord, question: &str) -> AnalysisResult<NarrativeText>;
}
