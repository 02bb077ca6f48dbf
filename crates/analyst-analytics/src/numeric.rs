//! 출력 경계에서의 수치 변환.
//!
//! 반올림은 소수점 2자리, 중간값은 짝수 쪽(banker's rounding)입니다.
//! 정수 필드는 0 방향으로 절삭합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 소수점 2자리로 반올림한 f64.
pub fn round2(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or_default()
}

/// 0 방향으로 절삭한 i64. 범위를 벗어나면 포화됩니다.
pub fn truncate_int(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
