//! 펀더멘털 메타데이터.

use serde::{Deserialize, Serialize};

/// 섹터/산업 정보가 없을 때 사용하는 값.
pub const NOT_AVAILABLE: &str = "N/A";

/// 종목 펀더멘털 지표.
///
/// 모든 필드는 독립적으로 없을 수 있습니다. 배당수익률과 이익률은 퍼센트 단위입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalData {
    /// 시가총액
    pub market_cap: Option<f64>,
    /// 섹터
    pub sector: String,
    /// 산업
    pub industry: String,
    /// 후행 PER
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// 선행 PER
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    /// PBR
    pub price_to_book: Option<f64>,
    /// 베타
    pub beta: Option<f64>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<f64>,
    /// 후행 EPS
    pub trailing_eps: Option<f64>,
    /// 선행 EPS
    pub forward_eps: Option<f64>,
    /// 순이익률 (%)
    pub profit_margins: Option<f64>,
    /// 영업이익률 (%)
    pub operating_margins: Option<f64>,
}

impl FundamentalData {
    /// 메타데이터 조회에 실패했을 때 사용하는 "데이터 없음" 레코드.
    pub fn unavailable() -> Self {
        Self {
            market_cap: None,
            sector: NOT_AVAILABLE.to_string(),
            industry: NOT_AVAILABLE.to_string(),
            trailing_pe: None,
            forward_pe: None,
            price_to_book: None,
            beta: None,
            dividend_yield: None,
            trailing_eps: None,
            forward_eps: None,
            profit_margins: None,
            operating_margins: None,
        }
    }

    /// 모든 필드가 "데이터 없음" 상태인지 확인합니다.
    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}

impl Default for FundamentalData {
    fn default() -> Self {
        Self::unavailable()
    }
}
