//! 분석 파이프라인.
//!
//! 질의 해석 → 전체 이력 조회 → 지표 계산 → 기간 절삭 → 펀더멘털 조회(재시도) →
//! 요약/포맷 순서로 한 종목을 분석합니다.
//!
//! 지표는 항상 전체 이력으로 계산하고, 요청 기간으로의 절삭은 그 이후에 합니다.
//! 절삭된 시계열로 계산하면 장기 이동평균 등이 틀어집니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use analyst_core::{
    analysis_span, AnalysisError, AnalysisRequest, AnalysisResult, DataConfig, ExtractedQuery,
    FundamentalData, MarketDataSource, MetadataSource, Period, QueryInterpreter, SourceError,
    StatsRecord,
};
use serde::Serialize;
use tracing::{debug, error, info, warn, Instrument};

use crate::enriched::EnrichedRow;
use crate::formatter::{DisplayRow, SeriesFormatter};
use crate::indicators::IndicatorEngine;
use crate::summary::SummaryBuilder;

/// 파이프라인 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// 분석에 필요한 최소 캔들 수
    pub min_rows: usize,
    /// 펀더멘털 조회 시도 횟수
    pub metadata_attempts: u32,
    /// 재시도 대기 시간 (시도 횟수에 비례)
    pub retry_backoff: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_rows: 20,
            metadata_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl From<&DataConfig> for PipelineSettings {
    fn from(config: &DataConfig) -> Self {
        Self {
            min_rows: config.min_rows,
            metadata_attempts: config.metadata_attempts,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// 실제로 사용된 질의
    pub query: ExtractedQuery,
    /// 적용된 기간 (잘못된 토큰은 전체 이력으로 대체됨)
    pub period: Period,
    /// 차트용 시계열
    pub series: Vec<DisplayRow>,
    /// 요약 통계
    pub stats: StatsRecord,
}

/// 보강된 시계열을 요청 기간(마지막 N행)으로 자릅니다.
pub fn trim_to_period(mut rows: Vec<EnrichedRow>, period: Period) -> Vec<EnrichedRow> {
    if let Period::Days(days) = period {
        if days < rows.len() {
            rows.drain(..rows.len() - days);
        }
    }
    rows
}

/// 분석 파이프라인.
///
/// 협력자는 `Arc<dyn Trait>`로 주입되며 파이프라인 자체는 불변이므로
/// 여러 요청에서 동시에 공유할 수 있습니다.
pub struct AnalysisPipeline {
    market_data: Arc<dyn MarketDataSource>,
    metadata: Arc<dyn MetadataSource>,
    interpreter: Arc<dyn QueryInterpreter>,
    engine: IndicatorEngine,
    summary: SummaryBuilder,
    formatter: SeriesFormatter,
    settings: PipelineSettings,
}

impl AnalysisPipeline {
    /// 기본 설정으로 파이프라인 생성.
    pub fn new(
        market_data: Arc<dyn MarketDataSource>,
        metadata: Arc<dyn MetadataSource>,
        interpreter: Arc<dyn QueryInterpreter>,
    ) -> Self {
        Self {
            market_data,
            metadata,
            interpreter,
            engine: IndicatorEngine::new(),
            summary: SummaryBuilder::new(),
            formatter: SeriesFormatter::new(),
            settings: PipelineSettings::default(),
        }
    }

    /// 파이프라인 설정 적용.
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 지표 엔진 교체.
    pub fn with_engine(mut self, engine: IndicatorEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// 자유 텍스트 또는 구조화된 질의를 분석합니다.
    ///
    /// # Errors
    ///
    /// - `QueryInterpretationFailed`: 자유 텍스트에서 심볼을 찾지 못함
    /// - `SymbolNotFound`: 시세가 없거나 존재하지 않는 심볼
    /// - `InsufficientData`: 최소 캔들 수 미달
    /// - `DataSource`: 시세 조회 중 일시적 장애
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult<AnalysisOutcome> {
        let query = match request {
            AnalysisRequest::Text(text) => {
                debug!(text = %text, "질의 해석");
                self.interpreter.interpret(&text).await?
            }
            AnalysisRequest::Query(query) => query,
        };

        let span = analysis_span!("analyze", query.symbol, query.period);
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: ExtractedQuery) -> AnalysisResult<AnalysisOutcome> {
        let started = Instant::now();
        let period = Period::parse_or_unbounded(&query.period);

        let bars = self
            .market_data
            .fetch_history(&query.symbol, query.interval)
            .await
            .map_err(|e| match e {
                SourceError::NotFound(_) => AnalysisError::SymbolNotFound {
                    symbol: query.symbol.clone(),
                },
                other => AnalysisError::DataSource(other.to_string()),
            })?;

        if bars.is_empty() {
            return Err(AnalysisError::SymbolNotFound {
                symbol: query.symbol.clone(),
            });
        }
        if bars.len() < self.settings.min_rows {
            warn!(available = bars.len(), required = self.settings.min_rows, "데이터 부족");
            return Err(AnalysisError::InsufficientData {
                symbol: query.symbol.clone(),
                available: bars.len(),
                required: self.settings.min_rows,
            });
        }

        let enriched = self.engine.enrich(&bars)?;
        let history_rows = enriched.len();
        let trimmed = trim_to_period(enriched, period);

        let fundamentals = self.fetch_fundamentals(&query.symbol).await;
        let stats = self.summary.build(&trimmed, fundamentals, &query.symbol)?;
        let series = self.formatter.format(&trimmed);

        info!(
            history_rows = history_rows,
            rows = series.len(),
            trend = %stats.technical.trend,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "분석 완료"
        );

        Ok(AnalysisOutcome {
            query,
            period,
            series,
            stats,
        })
    }

    /// 펀더멘털을 재시도하며 조회하고, 모두 실패하면 "데이터 없음" 레코드로 대체합니다.
    ///
    /// 에러 종류와 무관하게 `metadata_attempts`회를 모두 시도합니다.
    async fn fetch_fundamentals(&self, symbol: &str) -> FundamentalData {
        let max_attempts = self.settings.metadata_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.metadata.fetch_metadata(symbol).await {
                Ok(data) => return data,
                Err(e) if attempt < max_attempts => {
                    warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "펀더멘털 조회 재시도 예정"
                    );
                    tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                }
                Err(e) => {
                    let err = AnalysisError::MetadataFetchFailed {
                        symbol: symbol.to_string(),
                        attempts: attempt,
                        reason: e.to_string(),
                    };
                    error!(error = %err, "펀더멘털 없이 계속 진행");
                    break;
                }
            }
        }

        FundamentalData::unavailable()
    }
}
