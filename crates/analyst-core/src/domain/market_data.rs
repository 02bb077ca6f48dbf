//! 시세 데이터 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들 한 개.
///
/// 시계열은 날짜 오름차순, 중복 날짜 없음을 가정합니다.
/// 휴장일로 인한 간격은 정상이며 고정 주기를 가정하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// 캔들 날짜 (UTC)
    pub date: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl OhlcvBar {
    /// 새 캔들을 생성합니다.
    pub fn new(
        date: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 범위(고가 - 저가).
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 가격 필드가 서로 모순되지 않는지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && !self.volume.is_sign_negative()
    }
}

/// 날짜 오름차순 정렬 후 같은 날짜의 캔들은 마지막 것만 남깁니다.
pub fn normalize_series(mut bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> OhlcvBar {
        OhlcvBar::new(
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            close,
            close + dec!(1),
            close - dec!(1),
            close,
            dec!(1000),
        )
    }

    #[test]
    fn test_consistency() {
        assert!(bar(1, dec!(100)).is_consistent());

        let mut broken = bar(1, dec!(100));
        broken.low = dec!(200);
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_normalize_sorts_and_dedupes() {
        let series = vec![bar(3, dec!(3)), bar(1, dec!(1)), bar(2, dec!(2)), bar(3, dec!(30))];
        let normalized = normalize_series(series);

        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].close, dec!(1));
        assert_eq!(normalized[2].close, dec!(30));
    }
}
