//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 요청 간에 공유됩니다. 파이프라인과 협력자는 불변이므로
//! 요청마다 독립적으로 분석이 실행됩니다.

use std::sync::Arc;

use analyst_analytics::AnalysisPipeline;
use analyst_core::{DataConfig, Interval, NarrativeGenerator};
use tracing::warn;

use crate::repository::AnalysisRepository;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 분석 파이프라인 (조회 → 지표 → 요약)
    pub pipeline: Arc<AnalysisPipeline>,

    /// 내러티브 생성기 (언어 모델 또는 템플릿)
    pub narrator: Arc<dyn NarrativeGenerator>,

    /// 공유 링크용 분석 결과 저장소
    pub repository: Arc<dyn AnalysisRepository>,

    /// 심볼 직접 분석 시 기본 기간
    pub default_period: String,

    /// 심볼 직접 분석 시 기본 간격
    pub default_interval: Interval,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(
        pipeline: AnalysisPipeline,
        narrator: Arc<dyn NarrativeGenerator>,
        repository: Arc<dyn AnalysisRepository>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            narrator,
            repository,
            default_period: "1y".to_string(),
            default_interval: Interval::D1,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터 설정의 기본 기간/간격을 적용합니다.
    pub fn with_query_defaults(mut self, config: &DataConfig) -> Self {
        self.default_period = config.default_period.clone();
        match Interval::from_yahoo_str(&config.default_interval) {
            Some(interval) => self.default_interval = interval,
            None => warn!(interval = %config.default_interval, "잘못된 기본 간격, 1d 유지"),
        }
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 상태: 250일 평탄 시세, 고정 펀더멘털, 규칙 기반 해석기, 템플릿 내러티브.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use analyst_core::{
        FundamentalData, MarketDataSource, MetadataSource, OhlcvBar, SourceError,
    };
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::repository::InMemoryAnalysisRepository;
    use crate::services::{RuleBasedInterpreter, TemplateNarrator};

    struct FlatMarketData;

    #[async_trait]
    impl MarketDataSource for FlatMarketData {
        async fn fetch_history(
            &self,
            symbol: &str,
            _interval: Interval,
        ) -> Result<Vec<OhlcvBar>, SourceError> {
            if symbol == "ZZZZ" {
                return Err(SourceError::NotFound(symbol.to_string()));
            }
            let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
            let price = Decimal::from(150);
            Ok((0..250)
                .map(|i| {
                    OhlcvBar::new(
                        start + Duration::days(i),
                        price,
                        price,
                        price,
                        price,
                        Decimal::from(1_000_000),
                    )
                })
                .collect())
        }
    }

    struct FixedMetadata;

    #[async_trait]
    impl MetadataSource for FixedMetadata {
        async fn fetch_metadata(&self, _symbol: &str) -> Result<FundamentalData, SourceError> {
            let mut data = FundamentalData::unavailable();
            data.trailing_pe = Some(28.4);
            Ok(data)
        }
    }

    let pipeline = AnalysisPipeline::new(
        Arc::new(FlatMarketData),
        Arc::new(FixedMetadata),
        Arc::new(RuleBasedInterpreter::new()),
    );

    AppState::new(
        pipeline,
        Arc::new(TemplateNarrator::new()),
        Arc::new(InMemoryAnalysisRepository::new()),
    )
}
