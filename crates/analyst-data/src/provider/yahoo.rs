//! Yahoo Finance 데이터 소스.
//!
//! `yahoo_finance_api` 크레이트로 과거 시세(`get_quote_range`)와
//! 펀더멘털(`get_ticker_info`)을 조회합니다. 인증(crumb 토큰)은 크레이트가 처리합니다.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use analyst_core::{
    FundamentalData, Interval, MarketDataSource, MetadataSource, OhlcvBar, SourceError,
};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use yahoo_finance_api::YahooConnector;

use super::{bars_from_quotes, RawFundamentals, RawQuote};
use crate::error::{DataError, Result};

/// 간격별로 Yahoo가 허용하는 최대 조회 범위.
///
/// 일봉 이상은 전체 이력, 장중 간격은 Yahoo 제한에 맞춘 범위를 사용합니다.
pub fn history_range(interval: Interval) -> &'static str {
    match interval {
        Interval::M1 => "7d",
        Interval::M2 | Interval::M5 | Interval::M15 | Interval::M30 | Interval::M90 => "60d",
        Interval::M60 | Interval::H1 => "730d",
        _ => "max",
    }
}

/// 제한 시간 안에 작업을 실행합니다.
pub async fn run_with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| DataError::Timeout(timeout.as_secs()))?
}

/// 잠금을 얻은 뒤 제한 시간 안에 작업을 실행합니다.
///
/// 잠금 대기는 제한 시간에 포함하지 않으며, 잠금은 작업이 끝나거나 제한 시간이 지나면 풀립니다.
pub async fn run_locked_with_timeout<C, T, F>(
    lock: &Mutex<C>,
    timeout: Duration,
    op: F,
) -> Result<T>
where
    F: for<'a> FnOnce(&'a mut C) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>,
{
    let mut guard = lock.lock().await;
    run_with_timeout(timeout, op(&mut guard)).await
}

/// Yahoo Finance 시세 + 펀더멘털 소스.
pub struct YahooMarketData {
    /// 시세 조회용 커넥터
    quotes: YahooConnector,
    /// `get_ticker_info`가 `&mut self`를 요구하므로 별도 커넥터를 잠금으로 보호 (crumb 캐시)
    info: Mutex<YahooConnector>,
    /// 요청당 제한 시간
    timeout: Duration,
}

impl YahooMarketData {
    /// 새 Yahoo 소스를 생성합니다.
    pub fn new(timeout: Duration) -> Result<Self> {
        let quotes = YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        let info = YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self {
            quotes,
            info: Mutex::new(info),
            timeout,
        })
    }

    async fn fetch_quotes(&self, symbol: &str, interval: Interval) -> Result<Vec<OhlcvBar>> {
        let range = history_range(interval);
        let response = self
            .quotes
            .get_quote_range(symbol, interval.as_yahoo_str(), range)
            .await
            .map_err(|e| DataError::from_yahoo(symbol, &e))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::from_yahoo(symbol, &e))?;

        let raw: Vec<RawQuote> = quotes
            .iter()
            .map(|q| RawQuote {
                timestamp: q.timestamp as i64,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume as u64,
            })
            .collect();

        Ok(bars_from_quotes(symbol, &raw))
    }

    async fn fetch_ticker_info(
        connector: &mut YahooConnector,
        symbol: &str,
    ) -> Result<RawFundamentals> {
        let summary = connector
            .get_ticker_info(symbol)
            .await
            .map_err(|e| DataError::from_yahoo(symbol, &e))?;

        let quote_summary = summary.quote_summary.ok_or_else(|| {
            DataError::FetchError(format!("Yahoo ticker info 결과 없음: {}", symbol))
        })?;

        let result = quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                DataError::FetchError(format!("Yahoo ticker info 결과 비어있음: {}", symbol))
            })?;

        let profile = result.asset_profile.as_ref();
        let detail = result.summary_detail.as_ref();
        let key_stats = result.default_key_statistics.as_ref();
        let financial = result.financial_data.as_ref();

        Ok(RawFundamentals {
            market_cap: detail.and_then(|sd| sd.market_cap).map(|v| v as f64),
            sector: profile.and_then(|p| p.sector.clone()),
            industry: profile.and_then(|p| p.industry.clone()),
            trailing_pe: detail.and_then(|sd| sd.trailing_pe),
            forward_pe: key_stats
                .and_then(|ks| ks.forward_pe)
                .or_else(|| detail.and_then(|sd| sd.forward_pe)),
            price_to_book: key_stats.and_then(|ks| ks.price_to_book),
            beta: detail
                .and_then(|sd| sd.beta)
                .or_else(|| key_stats.and_then(|ks| ks.beta)),
            dividend_yield: detail.and_then(|sd| sd.trailing_annual_dividend_yield),
            trailing_eps: key_stats.and_then(|ks| ks.trailing_eps),
            forward_eps: key_stats.and_then(|ks| ks.forward_eps),
            profit_margins: financial.and_then(|fd| fd.profit_margins),
            operating_margins: financial.and_then(|fd| fd.operating_margins),
        })
    }
}

#[async_trait]
impl MarketDataSource for YahooMarketData {
    #[instrument(skip(self, interval), fields(interval = %interval))]
    async fn fetch_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> std::result::Result<Vec<OhlcvBar>, SourceError> {
        debug!(symbol = symbol, "Yahoo 시세 조회 시작");

        let bars = run_with_timeout(self.timeout, self.fetch_quotes(symbol, interval)).await?;
        if bars.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()).into());
        }

        info!(
            symbol = symbol,
            rows = bars.len(),
            first = %bars[0].date.date_naive(),
            last = %bars[bars.len() - 1].date.date_naive(),
            "Yahoo 시세 조회 완료"
        );
        Ok(bars)
    }
}

#[async_trait]
impl MetadataSource for YahooMarketData {
    #[instrument(skip(self))]
    async fn fetch_metadata(
        &self,
        symbol: &str,
    ) -> std::result::Result<FundamentalData, SourceError> {
        let owned = symbol.to_string();
        let raw = run_locked_with_timeout(&self.info, self.timeout, move |connector| {
            Box::pin(async move { Self::fetch_ticker_info(connector, &owned).await })
        })
        .await?;
        let data = raw.into_fundamentals();

        debug!(
            symbol = symbol,
            market_cap = ?data.market_cap,
            trailing_pe = ?data.trailing_pe,
            "Yahoo 펀더멘털 조회 완료"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_range() {
        assert_eq!(history_range(Interval::D1), "max");
        assert_eq!(history_range(Interval::W1), "max");
        assert_eq!(history_range(Interval::M1), "7d");
        assert_eq!(history_range(Interval::M15), "60d");
        assert_eq!(history_range(Interval::H1), "730d");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_source_error() {
        let result: Result<()> = run_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        let err: SourceError = result.unwrap_err().into();
        assert_eq!(err, SourceError::Timeout(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_wait_not_counted_against_timeout() {
        let lock = std::sync::Arc::new(Mutex::new(0u32));

        let held = lock.clone().lock_owned().await;
        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(held);
        });

        let result = run_locked_with_timeout(&*lock, Duration::from_secs(1), |count| {
            Box::pin(async move {
                *count += 1;
                Ok(*count)
            })
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        release.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_locked_op_times_out_and_releases() {
        let lock = Mutex::new(0u32);

        let result: Result<()> = run_locked_with_timeout(&lock, Duration::from_secs(1), |_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
        })
        .await;

        assert!(matches!(result, Err(DataError::Timeout(1))));
        assert!(lock.try_lock().is_ok());
    }
}
