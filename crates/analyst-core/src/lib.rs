//! # Analyst Core
//!
//! 주식 분석 파이프라인의 핵심 도메인 모델 및 인프라를 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - OHLCV 캔들 및 펀더멘털 데이터 구조체
//! - 통계 레코드 (기술적 + 펀더멘털)
//! - 기간(period) 파서 및 캔들 간격(interval) 정의
//! - 외부 협력자 trait (시세 소스, 메타데이터 소스, 질의 해석기, 내러티브 생성기)
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
