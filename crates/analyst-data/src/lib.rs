//! 시세 및 펀더멘털 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - Yahoo Finance 기반 과거 시세 소스 (`MarketDataSource` 구현)
//! - Yahoo Finance quote summary 기반 펀더멘털 소스 (`MetadataSource` 구현)
//! - 외부 응답을 도메인 타입으로 변환하는 유틸리티

pub mod error;
pub mod provider;

pub use error::{DataError, Result};
pub use provider::*;
