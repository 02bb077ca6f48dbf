//! API 에러 응답 타입.
//!
//! 모든 엔드포인트는 실패 시 동일한 JSON 형식을 반환합니다.
//! 파이프라인 에러는 [`ErrorKind`]에 따라 HTTP 상태 코드로 매핑됩니다.

use analyst_core::{AnalysisError, ErrorKind};
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

/// API 에러 응답.
///
/// ```json
/// {
///   "code": "SYMBOL_NOT_FOUND",
///   "message": "심볼을 찾을 수 없습니다: ZZZZ",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "SYMBOL_NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 시각 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 타임스탬프를 포함한 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보를 포함한 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 에러 분류별 HTTP 상태 코드.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::SymbolNotFound => StatusCode::NOT_FOUND,
        ErrorKind::InsufficientData
        | ErrorKind::QueryInterpretationFailed
        | ErrorKind::InvalidPeriodFormat => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NarrativeGenerationFailed
        | ErrorKind::DataSource
        | ErrorKind::MetadataFetchFailed => StatusCode::BAD_GATEWAY,
        ErrorKind::EmptySeries | ErrorKind::Indicator | ErrorKind::Config => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 파이프라인 에러를 API 에러 응답으로 변환합니다.
///
/// `InsufficientData`는 제공된 행 수를 `details`에 담습니다.
pub fn analysis_error(err: AnalysisError) -> (StatusCode, Json<ApiErrorResponse>) {
    let kind = err.kind();
    let status = status_for(kind);

    if status.is_server_error() {
        error!(code = kind.code(), error = %err, "분석 요청 실패");
    } else {
        warn!(code = kind.code(), error = %err, "분석 요청 거부");
    }

    let response = match &err {
        AnalysisError::InsufficientData {
            symbol,
            available,
            required,
        } => ApiErrorResponse::with_details(
            kind.code(),
            err.to_string(),
            serde_json::json!({
                "symbol": symbol,
                "available": available,
                "required": required,
            }),
        ),
        _ => ApiErrorResponse::new(kind.code(), err.to_string()),
    };

    (status, Json(response))
}

/// 리소스 없음(404) 응답.
pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::new("NOT_FOUND", message)),
    )
}

/// 입력 검증 실패(422) 응답.
pub fn validation_error(message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::SymbolNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::InsufficientData),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorKind::NarrativeGenerationFailed),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ErrorKind::EmptySeries),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_data_carries_row_count() {
        let (status, Json(body)) = analysis_error(AnalysisError::InsufficientData {
            symbol: "AAPL".to_string(),
            available: 5,
            required: 20,
        });

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INSUFFICIENT_DATA");
        let details = body.details.unwrap();
        assert_eq!(details["available"], 5);
        assert_eq!(details["required"], 20);
    }

    #[test]
    fn test_json_omits_empty_details() {
        let error = ApiErrorResponse::new("NOT_FOUND", "Analysis not found");
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("details"));
        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains("timestamp"));
    }
}
