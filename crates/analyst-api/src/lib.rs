//! 주식 분석 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (분석, 공유 링크, 헬스 체크)
//! - 언어 모델 기반/규칙 기반 질의 해석기
//! - 언어 모델 기반/템플릿 내러티브 생성기
//! - 메모리 내 분석 결과 저장소
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`services`]: 질의 해석, 내러티브 생성, 언어 모델 클라이언트
//! - [`repository`]: 분석 결과 저장소

pub mod error;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;
