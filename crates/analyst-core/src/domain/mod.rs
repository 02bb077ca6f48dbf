//! 주식 분석을 위한 도메인 모델.

mod fundamentals;
mod market_data;
mod narrative;
mod providers;
mod query;
mod stats;

pub use fundamentals::*;
pub use market_data::*;
pub use narrative::*;
pub use providers::*;
pub use query::*;
pub use stats::*;
