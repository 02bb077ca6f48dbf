//! 주식 분석 endpoint.
//!
//! - `GET /api/v1/stock` - 기본 질의("Show me Apple stock") 분석
//! - `POST /api/v1/stock` - 자유 텍스트 질의 분석 후 공유 ID와 함께 저장
//! - `GET /api/v1/stock/share/{id}` - 저장된 분석 조회
//! - `DELETE /api/v1/stock/share/{id}` - 저장된 분석 삭제
//! - `GET /api/v1/analyze/{symbol}` - 심볼 직접 분석 (내러티브 없음)

use std::sync::Arc;

use analyst_analytics::{AnalysisOutcome, DisplayRow};
use analyst_core::{
    AnalysisRequest, ExtractedQuery, Interval, NarrativeText, Period, StatsRecord,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{analysis_error, not_found, validation_error, ApiResult};
use crate::repository::{NewAnalysis, StoredAnalysis};
use crate::state::AppState;

/// 질의 없는 GET 요청에 사용하는 기본 질의.
pub const DEFAULT_QUERY: &str = "Show me Apple stock";

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("메시지는 비어 있을 수 없습니다".into());
        return Err(err);
    }
    Ok(())
}

/// 분석 요청.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockAnalysisRequest {
    /// 사용자 질의 (예: "How has TSLA done over 6mo?")
    #[validate(
        length(max = 1000, message = "메시지는 1000자 이하여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub message: String,
}

/// 분석 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysisResponse {
    pub stock_data: Vec<DisplayRow>,
    pub analysis_text: NarrativeText,
    pub stats: StatsRecord,
    pub share_id: Uuid,
}

/// 기본 질의 응답 (저장하지 않음).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultStockResponse {
    pub stock_data: Vec<DisplayRow>,
    pub analysis_text: NarrativeText,
    pub stats: StatsRecord,
    pub timestamp: DateTime<Utc>,
}

/// 심볼 직접 분석 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolAnalysisResponse {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
    pub stock_data: Vec<DisplayRow>,
    pub stats: StatsRecord,
}

/// 심볼 직접 분석 쿼리 파라미터.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub period: Option<String>,
    pub interval: Option<String>,
}

fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// 질의 분석 후 내러티브를 생성합니다.
async fn analyze_and_narrate(
    state: &AppState,
    message: &str,
) -> ApiResult<(AnalysisOutcome, NarrativeText)> {
    let outcome = state
        .pipeline
        .analyze(AnalysisRequest::Text(message.to_string()))
        .await
        .map_err(analysis_error)?;

    let narrative = state
        .narrator
        .narrate(&outcome.stats, message)
        .await
        .map_err(analysis_error)?;

    Ok((outcome, narrative))
}

/// 기본 질의 분석.
///
/// GET /api/v1/stock
pub async fn get_default_stock(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DefaultStockResponse>> {
    let (outcome, narrative) = analyze_and_narrate(&state, DEFAULT_QUERY).await?;

    Ok(Json(DefaultStockResponse {
        stock_data: outcome.series,
        analysis_text: narrative,
        stats: outcome.stats,
        timestamp: Utc::now(),
    }))
}

/// 자유 텍스트 질의 분석.
///
/// 결과는 저장소에 보관되고 `shareId`로 다시 조회할 수 있습니다.
///
/// POST /api/v1/stock
pub async fn analyze_stock(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StockAnalysisRequest>,
) -> ApiResult<Json<StockAnalysisResponse>> {
    if let Err(errors) = request.validate() {
        return Err(validation_error(validation_message(&errors)));
    }

    info!(message = %request.message, "주식 분석 요청");
    let (outcome, narrative) = analyze_and_narrate(&state, &request.message).await?;

    let stored = state
        .repository
        .create(NewAnalysis {
            stock_data: outcome.series.clone(),
            technical_metrics: outcome.stats.technical.clone(),
            fundamental_metrics: outcome.stats.fundamental.clone(),
            analysis_text: narrative.clone(),
        })
        .await;

    info!(share_id = %stored.id, symbol = %outcome.query.symbol, "분석 결과 저장");

    Ok(Json(StockAnalysisResponse {
        stock_data: outcome.series,
        analysis_text: narrative,
        stats: outcome.stats,
        share_id: stored.id,
    }))
}

/// 저장된 분석 조회.
///
/// GET /api/v1/stock/share/{id}
pub async fn get_shared_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StoredAnalysis>> {
    state
        .repository
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(format!("Analysis not found: {}", id)))
}

/// 저장된 분석 삭제.
///
/// DELETE /api/v1/stock/share/{id}
pub async fn delete_shared_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.repository.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(format!("Analysis not found: {}", id)))
    }
}

/// 심볼 직접 분석.
///
/// GET /api/v1/analyze/{symbol}?period=6mo&interval=1d
pub async fn analyze_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> ApiResult<Json<SymbolAnalysisResponse>> {
    let interval = match params.interval.as_deref() {
        Some(token) => token.parse::<Interval>().map_err(validation_error)?,
        None => state.default_interval,
    };
    let period = params
        .period
        .unwrap_or_else(|| state.default_period.clone());

    let query = ExtractedQuery::new(&symbol, period, interval).map_err(analysis_error)?;
    let outcome = state
        .pipeline
        .analyze(query.into())
        .await
        .map_err(analysis_error)?;

    Ok(Json(SymbolAnalysisResponse {
        symbol: outcome.query.symbol,
        period: outcome.period,
        interval: outcome.query.interval,
        stock_data: outcome.series,
        stats: outcome.stats,
    }))
}

/// 주식 분석 라우터 (`/api/v1/stock`에 마운트).
pub fn stock_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_default_stock).post(analyze_stock))
        .route(
            "/share/{id}",
            get(get_shared_analysis).delete(delete_shared_analysis),
        )
}

/// 심볼 직접 분석 라우터 (`/api/v1/analyze`에 마운트).
pub fn analyze_router() -> Router<Arc<AppState>> {
    Router::new().route("/{symbol}", get(analyze_symbol))
}
