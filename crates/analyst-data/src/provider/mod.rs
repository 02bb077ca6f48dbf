//! 외부 데이터 소스 Provider.
//!
//! - `YahooMarketData`: Yahoo Finance 과거 시세 + quote summary 펀더멘털
//! - `RawQuote`: 외부 응답과 도메인 캔들 사이의 중간 표현

mod quote;
mod yahoo;

pub use quote::*;
pub use yahoo::*;
