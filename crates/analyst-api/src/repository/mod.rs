//! 완료된 분석 결과 저장소.
//!
//! 공유 링크(`shareId`)로 분석 결과를 다시 조회할 수 있도록 보관합니다.

mod analysis;

pub use analysis::{AnalysisRepository, InMemoryAnalysisRepository, NewAnalysis, StoredAnalysis};
