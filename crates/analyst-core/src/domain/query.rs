//! 자연어 질의에서 추출한 분석 요청.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::Interval;

/// 질의 해석기가 반환하는 구조화된 질의.
///
/// `symbol`은 비어 있지 않은 대문자 티커입니다. `period`는 기간 토큰 원문이며
/// 파싱 실패는 파이프라인에서 복구 가능한 에러로 처리됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedQuery {
    /// 종목 티커
    pub symbol: String,
    /// 요청 기간 토큰 (예: "1y", "6mo", "max")
    pub period: String,
    /// 캔들 간격
    pub interval: Interval,
}

impl ExtractedQuery {
    /// 새 질의를 생성합니다.
    ///
    /// # Errors
    ///
    /// 심볼이 비어 있으면 `AnalysisError::QueryInterpretationFailed`.
    pub fn new(
        symbol: impl AsRef<str>,
        period: impl Into<String>,
        interval: Interval,
    ) -> AnalysisResult<Self> {
        let symbol = symbol.as_ref().trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AnalysisError::QueryInterpretationFailed(
                "심볼이 비어 있습니다".to_string(),
            ));
        }

        let period: String = period.into();
        Ok(Self {
            symbol,
            period: period.trim().to_string(),
            interval,
        })
    }
}

/// 파이프라인 입력.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// 질의 해석기를 거쳐야 하는 자유 텍스트
    Text(String),
    /// 이미 구조화된 질의
    Query(ExtractedQuery),
}

impl From<ExtractedQuery> for AnalysisRequest {
    fn from(query: ExtractedQuery) -> Self {
        AnalysisRequest::Query(query)
    }
}
