//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 버전/업타임
//! - `/api/v1/stock` - 자유 텍스트 분석, 공유 링크 조회/삭제
//! - `/api/v1/analyze/{symbol}` - 심볼 직접 분석

pub mod health;
pub mod stock;

pub use health::{health_router, HealthResponse};
pub use stock::{
    analyze_router, stock_router, DefaultStockResponse, StockAnalysisRequest,
    StockAnalysisResponse, SymbolAnalysisResponse, DEFAULT_QUERY,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/stock", stock_router())
        .nest("/api/v1/analyze", analyze_router())
}
