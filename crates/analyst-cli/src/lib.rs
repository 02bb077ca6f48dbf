//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목 분석 (Yahoo Finance 조회 → 지표 → 요약, 선택적 내러티브)
//! - 기간 토큰 확인

pub mod commands;
