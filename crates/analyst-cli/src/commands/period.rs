//! 기간 토큰 확인 명령.

use analyst_core::{parse_period, Period};

/// 기간 토큰을 파싱해 출력용 문자열로 만듭니다.
///
/// # Errors
///
/// 지원하지 않는 형식이면 `InvalidPeriodFormat`.
pub fn describe_period(token: &str) -> anyhow::Result<String> {
    let described = match parse_period(token)? {
        Period::Days(days) => format!("{} → {} days", token.trim(), days),
        Period::Unbounded => format!("{} → unbounded (full history)", token.trim()),
    };
    Ok(described)
}
