//! 분석 파이프라인의 에러 타입.
//!
//! 요청 단위로 치명적인 에러와 복구 가능한 에러를 구분합니다.
//! 복구 가능한 에러(`InvalidPeriodFormat`, `MetadataFetchFailed`)는
//! 파이프라인 내부에서 로그를 남기고 기본값으로 대체되며, 호출자에게 전파되지 않습니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 기계가 읽을 수 있는 에러 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidPeriodFormat,
    SymbolNotFound,
    InsufficientData,
    MetadataFetchFailed,
    NarrativeGenerationFailed,
    QueryInterpretationFailed,
    EmptySeries,
    Indicator,
    DataSource,
    Config,
}

impl ErrorKind {
    /// 에러 코드 문자열 (API 응답용).
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPeriodFormat => "INVALID_PERIOD_FORMAT",
            ErrorKind::SymbolNotFound => "SYMBOL_NOT_FOUND",
            ErrorKind::InsufficientData => "INSUFFICIENT_DATA",
            ErrorKind::MetadataFetchFailed => "METADATA_FETCH_FAILED",
            ErrorKind::NarrativeGenerationFailed => "NARRATIVE_GENERATION_FAILED",
            ErrorKind::QueryInterpretationFailed => "QUERY_INTERPRETATION_FAILED",
            ErrorKind::EmptySeries => "EMPTY_SERIES",
            ErrorKind::Indicator => "INDICATOR_ERROR",
            ErrorKind::DataSource => "DATA_SOURCE_ERROR",
            ErrorKind::Config => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 분석 파이프라인 에러.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 지원하지 않는 기간 형식
    #[error("잘못된 기간 형식: {token}")]
    InvalidPeriodFormat { token: String },

    /// 심볼에 대한 시세 데이터 없음
    #[error("심볼을 찾을 수 없습니다: {symbol}")]
    SymbolNotFound { symbol: String },

    /// 지표 계산에 필요한 최소 데이터 부족
    #[error("데이터가 부족합니다 ({symbol}): 필요 {required}개, 제공 {available}개")]
    InsufficientData {
        symbol: String,
        available: usize,
        required: usize,
    },

    /// 펀더멘털 메타데이터 조회 실패 (재시도 소진)
    #[error("메타데이터 조회 실패 ({symbol}, {attempts}회 시도): {reason}")]
    MetadataFetchFailed {
        symbol: String,
        attempts: u32,
        reason: String,
    },

    /// 내러티브 생성 실패
    #[error("분석 텍스트 생성 실패: {0}")]
    NarrativeGenerationFailed(String),

    /// 자연어 질의 해석 실패
    #[error("질의 해석 실패: {0}")]
    QueryInterpretationFailed(String),

    /// 빈 시계열로 요약 통계를 만들 수 없음
    #[error("빈 시계열입니다")]
    EmptySeries,

    /// 지표 계산 파라미터 오류
    #[error("지표 계산 에러: {0}")]
    Indicator(String),

    /// 데이터 소스 에러 (네트워크, 파싱 등)
    #[error("데이터 소스 에러: {0}")]
    DataSource(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// 에러 분류를 반환합니다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidPeriodFormat { .. } => ErrorKind::InvalidPeriodFormat,
            AnalysisError::SymbolNotFound { .. } => ErrorKind::SymbolNotFound,
            AnalysisError::InsufficientData { .. } => ErrorKind::InsufficientData,
            AnalysisError::MetadataFetchFailed { .. } => ErrorKind::MetadataFetchFailed,
            AnalysisError::NarrativeGenerationFailed(_) => ErrorKind::NarrativeGenerationFailed,
            AnalysisError::QueryInterpretationFailed(_) => ErrorKind::QueryInterpretationFailed,
            AnalysisError::EmptySeries => ErrorKind::EmptySeries,
            AnalysisError::Indicator(_) => ErrorKind::Indicator,
            AnalysisError::DataSource(_) => ErrorKind::DataSource,
            AnalysisError::Config(_) => ErrorKind::Config,
        }
    }

    /// 요청을 중단하지 않고 기본값으로 대체 가능한 에러인지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidPeriodFormat { .. } | AnalysisError::MetadataFetchFailed { .. }
        )
    }
}

/// 외부 데이터 소스(시세/메타데이터) 에러.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// 심볼이 존재하지 않음
    #[error("not found: {0}")]
    NotFound(String),

    /// 일시적 장애 (네트워크, 응답 파싱 등)
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// 제한 시간 초과
    #[error("timed out after {0}s")]
    Timeout(u64),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::DataSource(err.to_string())
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverable() {
        let period_err = AnalysisError::InvalidPeriodFormat {
            token: "5x".to_string(),
        };
        assert!(period_err.is_recoverable());

        let not_found = AnalysisError::SymbolNotFound {
            symbol: "ZZZZ".to_string(),
        };
        assert!(!not_found.is_recoverable());
        assert!(!AnalysisError::EmptySeries.is_recoverable());
    }

    #[test]
    fn test_error_kind_codes() {
        let err = AnalysisError::InsufficientData {
            symbol: "AAPL".to_string(),
            available: 5,
            required: 20,
        };
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert_eq!(err.kind().code(), "INSUFFICIENT_DATA");
        assert!(err.to_string().contains('5'));

        let json = serde_json::to_string(&ErrorKind::SymbolNotFound).unwrap();
        assert_eq!(json, "\"SYMBOL_NOT_FOUND\"");
    }
}
