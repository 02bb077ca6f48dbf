//! 조회 기간 토큰 파서.
//!
//! `"7d"`, `"2w"`, `"3mo"`, `"1y"`, `"max"` 같은 기간 토큰을 일 수로 변환합니다.
//! 월(30일)과 연(365일)은 달력과 무관한 근사값입니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// 파싱된 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// 최근 N일 (tail-N 캔들)
    Days(usize),
    /// 전체 이력 (잘라내지 않음)
    Unbounded,
}

impl Period {
    /// 일 수를 반환합니다. `Unbounded`면 `None`.
    pub fn days(&self) -> Option<usize> {
        match self {
            Period::Days(n) => Some(*n),
            Period::Unbounded => None,
        }
    }

    /// 전체 이력 여부.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Period::Unbounded)
    }

    /// 토큰을 파싱하고, 실패하면 경고 로그를 남긴 뒤 `Unbounded`로 대체합니다.
    pub fn parse_or_unbounded(token: &str) -> Self {
        parse_period(token).unwrap_or_else(|e| {
            tracing::warn!(token = %token, error = %e, "잘못된 기간 형식, 전체 이력을 사용합니다");
            Period::Unbounded
        })
    }
}

/// 단위 접미사와 일 수 배율.
///
/// `mo`가 `m`으로 시작하는 다른 단위보다 먼저 검사되도록 순서를 유지합니다.
const UNITS: &[(&str, usize)] = &[("mo", 30), ("d", 1), ("w", 7), ("y", 365)];

/// 기간 토큰을 파싱합니다.
///
/// 정수 접두사(양수)와 단위 접미사(`d`, `w`, `mo`, `y`)로 구성되며,
/// `"max"`는 `Period::Unbounded`입니다. 앞뒤 공백은 무시하고 단위는 대소문자를 구분하지 않습니다.
///
/// # Errors
///
/// 그 외 형식은 `AnalysisError::InvalidPeriodFormat`을 반환합니다.
pub fn parse_period(token: &str) -> Result<Period, AnalysisError> {
    let invalid = || AnalysisError::InvalidPeriodFormat {
        token: token.to_string(),
    };

    let normalized = token.trim().to_ascii_lowercase();
    if normalized == "max" {
        return Ok(Period::Unbounded);
    }

    let split = normalized
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (digits, unit) = normalized.split_at(split);

    let count: usize = digits.parse().map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }

    let multiplier = UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|(_, m)| *m)
        .ok_or_else(invalid)?;

    count
        .checked_mul(multiplier)
        .map(Period::Days)
        .ok_or_else(invalid)
}

impl FromStr for Period {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_period(s)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{}d", n),
            Period::Unbounded => write!(f, "max"),
        }
    }
}
