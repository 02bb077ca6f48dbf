//! 데이터 모듈 오류 타입.

use analyst_core::{AnalysisError, SourceError};
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 API 연결 오류
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 타임아웃 오류 (초)
    #[error("Operation timeout after {0}s")]
    Timeout(u64),
}

impl DataError {
    /// Yahoo Finance 에러를 분류합니다.
    ///
    /// 존재하지 않는 심볼은 응답 본문에 "not found"/"no data" 문구로만 구분됩니다.
    pub fn from_yahoo(symbol: &str, err: &yahoo_finance_api::YahooError) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("not found")
            || lowered.contains("no data")
            || lowered.contains("no quotes")
            || lowered.contains("no result")
        {
            DataError::NotFound(symbol.to_string())
        } else {
            DataError::FetchError(format!("{}: {}", symbol, message))
        }
    }
}

impl From<DataError> for SourceError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(symbol) => SourceError::NotFound(symbol),
            DataError::Timeout(secs) => SourceError::Timeout(secs),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

impl From<DataError> for AnalysisError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(symbol) => AnalysisError::SymbolNotFound { symbol },
            other => AnalysisError::DataSource(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_source_error() {
        let not_found: SourceError = DataError::NotFound("ZZZZ".into()).into();
        assert_eq!(not_found, SourceError::NotFound("ZZZZ".into()));

        let timeout: SourceError = DataError::Timeout(30).into();
        assert_eq!(timeout, SourceError::Timeout(30));

        let parse: SourceError = DataError::ParseError("bad".into()).into();
        assert!(matches!(parse, SourceError::Unavailable(ref msg) if msg.contains("bad")));
    }

    #[test]
    fn test_into_analysis_error() {
        let err: AnalysisError = DataError::NotFound("ZZZZ".into()).into();
        assert!(matches!(err, AnalysisError::SymbolNotFound { ref symbol } if symbol == "ZZZZ"));
    }
}
