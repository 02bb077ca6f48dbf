//! 분석 파이프라인 통합 테스트
//!
//! 메모리 내 시세/메타데이터 소스로 조회부터 요약까지 전체 흐름을 검증합니다.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use analyst_analytics::{AnalysisPipeline, PipelineSettings};
use analyst_core::{
    AnalysisError, AnalysisRequest, AnalysisResult, ExtractedQuery, FundamentalData, Interval,
    MarketDataSource, MetadataSource, OhlcvBar, Period, QueryInterpreter, SourceError, Trend,
};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

/// 고정된 캔들을 돌려주는 시세 소스
struct FixtureMarketData {
    bars: Result<Vec<OhlcvBar>, SourceError>,
}

#[async_trait]
impl MarketDataSource for FixtureMarketData {
    async fn fetch_history(
        &self,
        _symbol: &str,
        _interval: Interval,
    ) -> Result<Vec<OhlcvBar>, SourceError> {
        self.bars.clone()
    }
}

/// 처음 `failures`번은 실패하는 메타데이터 소스
struct FlakyMetadata {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyMetadata {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FlakyMetadata {
    async fn fetch_metadata(&self, _symbol: &str) -> Result<FundamentalData, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(SourceError::Unavailable(format!("503 on call {}", call)));
        }

        let mut data = FundamentalData::unavailable();
        data.sector = "Technology".to_string();
        data.trailing_pe = Some(28.4);
        Ok(data)
    }
}

/// 항상 "찾을 수 없음"을 돌려주는 메타데이터 소스
#[derive(Default)]
struct MissingMetadata {
    calls: AtomicU32,
}

#[async_trait]
impl MetadataSource for MissingMetadata {
    async fn fetch_metadata(&self, symbol: &str) -> Result<FundamentalData, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::NotFound(format!("no quote summary for {}", symbol)))
    }
}

/// 항상 같은 질의를 돌려주는 해석기
struct FixedInterpreter(ExtractedQuery);

#[async_trait]
impl QueryInterpreter for FixedInterpreter {
    async fn interpret(&self, _text: &str) -> AnalysisResult<ExtractedQuery> {
        Ok(self.0.clone())
    }
}

fn bars_from_closes(closes: impl IntoIterator<Item = Decimal>) -> Vec<OhlcvBar> {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    closes
        .into_iter()
        .enumerate()
        .map(|(i, close)| {
            OhlcvBar::new(
                start + Duration::days(i as i64),
                close,
                close,
                close,
                close,
                Decimal::from(1_000_000),
            )
        })
        .collect()
}

fn flat_bars(n: usize) -> Vec<OhlcvBar> {
    bars_from_closes(std::iter::repeat(Decimal::from(150)).take(n))
}

fn rising_bars(n: usize) -> Vec<OhlcvBar> {
    bars_from_closes((1..=n as i64).map(Decimal::from))
}

fn query(period: &str) -> ExtractedQuery {
    ExtractedQuery::new("AAPL", period, Interval::D1).unwrap()
}

fn pipeline(
    bars: Result<Vec<OhlcvBar>, SourceError>,
    metadata: Arc<FlakyMetadata>,
    period: &str,
) -> AnalysisPipeline {
    AnalysisPipeline::new(
        Arc::new(FixtureMarketData { bars }),
        metadata,
        Arc::new(FixedInterpreter(query(period))),
    )
}

#[tokio::test]
async fn test_flat_series_end_to_end() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let outcome = pipeline(Ok(flat_bars(250)), metadata.clone(), "1y")
        .analyze(AnalysisRequest::Query(query("1y")))
        .await
        .unwrap();

    assert_eq!(outcome.period, Period::Days(365));
    assert_eq!(outcome.series.len(), 250);

    let t = &outcome.stats.technical;
    assert_eq!(t.rsi, Some(100.0));
    assert_eq!(t.macd_hist, Some(0.0));
    assert_eq!(t.bb_upper, t.bb_middle);
    assert_eq!(t.bb_lower, t.bb_middle);
    assert_eq!(t.current_price, 150.0);
    assert_eq!(t.daily_change, 0.0);
    assert_eq!(t.ticker, "AAPL");
    // ma50 == ma200 이므로 상승 조건 불충족
    assert_eq!(t.trend, Trend::Bearish);

    assert_eq!(outcome.stats.fundamental.sector, "Technology");
    assert_eq!(metadata.calls(), 1);

    let first = &outcome.series[0];
    assert_eq!(first.rsi, 50.0);
    assert_eq!(first.ma200, 150.0);
    assert_eq!(first.date, "2022-01-03");
}

#[tokio::test]
async fn test_five_rows_is_insufficient() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let result = pipeline(Ok(flat_bars(5)), metadata.clone(), "1y")
        .analyze(AnalysisRequest::Query(query("1y")))
        .await;

    match result {
        Err(AnalysisError::InsufficientData {
            symbol,
            available,
            required,
        }) => {
            assert_eq!(symbol, "AAPL");
            assert_eq!(available, 5);
            assert_eq!(required, 20);
        }
        other => panic!("unexpected: {:?}", other.map(|o| o.series.len())),
    }
    assert_eq!(metadata.calls(), 0);
}

#[tokio::test]
async fn test_empty_history_is_symbol_not_found() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let result = pipeline(Ok(Vec::new()), metadata, "1y")
        .analyze(AnalysisRequest::Query(query("1y")))
        .await;

    assert!(matches!(result, Err(AnalysisError::SymbolNotFound { ref symbol }) if symbol == "AAPL"));
}

#[tokio::test]
async fn test_source_not_found_is_symbol_not_found() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let result = pipeline(Err(SourceError::NotFound("AAPL".into())), metadata, "1y")
        .analyze(AnalysisRequest::Query(query("1y")))
        .await;

    assert!(matches!(result, Err(AnalysisError::SymbolNotFound { .. })));
}

#[tokio::test]
async fn test_source_outage_is_data_source_error() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let result = pipeline(Err(SourceError::Timeout(30)), metadata, "1y")
        .analyze(AnalysisRequest::Query(query("1y")))
        .await;

    assert!(matches!(result, Err(AnalysisError::DataSource(_))));
}

#[tokio::test]
async fn test_trim_happens_after_indicators() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let outcome = pipeline(Ok(rising_bars(300)), metadata, "30d")
        .analyze(AnalysisRequest::Query(query("30d")))
        .await
        .unwrap();

    assert_eq!(outcome.series.len(), 30);
    assert_eq!(outcome.series[0].price, 271.0);
    assert_eq!(outcome.series[29].price, 300.0);

    // 마지막 200개 종가 101..=300의 평균
    assert_eq!(outcome.stats.technical.ma200, Some(200.5));
    // 절삭 구간 첫 행도 전체 이력 기준으로 정의됨 (72..=271의 평균)
    assert_eq!(outcome.series[0].ma200, 171.5);
    assert_eq!(outcome.stats.technical.yearly_low, 271.0);
    assert_eq!(outcome.stats.technical.daily_change, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_metadata_failure_degrades_to_unavailable() {
    let metadata = Arc::new(FlakyMetadata::new(u32::MAX));
    let outcome = pipeline(Ok(flat_bars(60)), metadata.clone(), "1mo")
        .analyze(AnalysisRequest::Query(query("1mo")))
        .await
        .unwrap();

    assert_eq!(metadata.calls(), 3);
    assert!(outcome.stats.fundamental.is_unavailable());
    assert_eq!(outcome.stats.fundamental.industry, "N/A");
    assert_eq!(outcome.series.len(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_metadata_not_found_uses_every_attempt() {
    let metadata = Arc::new(MissingMetadata::default());
    let outcome = AnalysisPipeline::new(
        Arc::new(FixtureMarketData {
            bars: Ok(flat_bars(40)),
        }),
        metadata.clone(),
        Arc::new(FixedInterpreter(query("max"))),
    )
    .analyze(AnalysisRequest::Query(query("max")))
    .await
    .unwrap();

    assert_eq!(metadata.calls.load(Ordering::SeqCst), 3);
    assert!(outcome.stats.fundamental.is_unavailable());
    assert_eq!(outcome.series.len(), 40);
}

#[tokio::test]
async fn test_metadata_recovers_on_retry() {
    let metadata = Arc::new(FlakyMetadata::new(1));
    let outcome = pipeline(Ok(flat_bars(40)), metadata.clone(), "max")
        .with_settings(PipelineSettings {
            retry_backoff: std::time::Duration::ZERO,
            ..PipelineSettings::default()
        })
        .analyze(AnalysisRequest::Query(query("max")))
        .await
        .unwrap();

    assert_eq!(metadata.calls(), 2);
    assert_eq!(outcome.stats.fundamental.trailing_pe, Some(28.4));
    assert_eq!(outcome.series.len(), 40);
}

#[tokio::test]
async fn test_invalid_period_falls_back_to_full_history() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let outcome = pipeline(Ok(flat_bars(45)), metadata, "5x")
        .analyze(AnalysisRequest::Query(query("5x")))
        .await
        .unwrap();

    assert_eq!(outcome.period, Period::Unbounded);
    assert_eq!(outcome.series.len(), 45);
    assert_eq!(outcome.query.period, "5x");
}

#[tokio::test]
async fn test_text_request_uses_interpreter() {
    let metadata = Arc::new(FlakyMetadata::new(0));
    let outcome = pipeline(Ok(flat_bars(30)), metadata, "2w")
        .analyze(AnalysisRequest::Text("how is apple doing?".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.query.symbol, "AAPL");
    assert_eq!(outcome.series.len(), 14);
}
