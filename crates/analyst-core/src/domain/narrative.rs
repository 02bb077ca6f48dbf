//! 내러티브(자연어 분석 텍스트).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 언어 모델 응답을 JSON으로 해석하지 못했을 때의 전망 문구.
pub const UNPARSED_OUTLOOK: &str = "Unable to parse detailed analysis";

/// 통계 레코드에서 생성한 분석 텍스트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeText {
    /// 요약
    pub summary: String,
    /// 기술적 요인
    #[serde(default)]
    pub technical_factors: Vec<String>,
    /// 펀더멘털 요인
    #[serde(default)]
    pub fundamental_factors: Vec<String>,
    /// 시장 전망
    #[serde(default)]
    pub outlook: String,
    /// 생성 시각
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl NarrativeText {
    /// 현재 시각으로 새 내러티브를 생성합니다.
    pub fn new(
        summary: impl Into<String>,
        technical_factors: Vec<String>,
        fundamental_factors: Vec<String>,
        outlook: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            technical_factors,
            fundamental_factors,
            outlook: outlook.into(),
            timestamp: Utc::now(),
        }
    }

    /// 구조화되지 않은 원문을 요약으로 사용하는 내러티브.
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self::new(raw, Vec::new(), Vec::new(), UNPARSED_OUTLOOK)
    }
}
