//! 분석 결과 리포지토리.

use std::collections::HashMap;

use analyst_analytics::DisplayRow;
use analyst_core::{FundamentalData, NarrativeText, TechnicalStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// 저장할 분석 결과.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub stock_data: Vec<DisplayRow>,
    pub technical_metrics: TechnicalStats,
    pub fundamental_metrics: FundamentalData,
    pub analysis_text: NarrativeText,
}

/// 저장된 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    /// 공유 ID
    pub id: Uuid,
    /// 차트용 시계열
    pub stock_data: Vec<DisplayRow>,
    /// 기술적 지표 스냅샷
    pub technical_metrics: TechnicalStats,
    /// 펀더멘털 지표
    pub fundamental_metrics: FundamentalData,
    /// 분석 텍스트
    pub analysis_text: NarrativeText,
    /// 저장 시각
    pub timestamp: DateTime<Utc>,
}

/// 분석 결과 저장소.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// 새 ID를 발급해 저장하고 저장된 레코드를 반환합니다.
    async fn create(&self, analysis: NewAnalysis) -> StoredAnalysis;

    /// ID로 조회합니다.
    async fn get(&self, id: Uuid) -> Option<StoredAnalysis>;

    /// 삭제하고, 레코드가 있었는지 반환합니다.
    async fn delete(&self, id: Uuid) -> bool;
}

/// 프로세스 메모리에 보관하는 저장소.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisRepository {
    analyses: RwLock<HashMap<Uuid, StoredAnalysis>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 분석 수.
    pub async fn len(&self) -> usize {
        self.analyses.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.analyses.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn create(&self, analysis: NewAnalysis) -> StoredAnalysis {
        let stored = StoredAnalysis {
            id: Uuid::new_v4(),
            stock_data: analysis.stock_data,
            technical_metrics: analysis.technical_metrics,
            fundamental_metrics: analysis.fundamental_metrics,
            analysis_text: analysis.analysis_text,
            timestamp: Utc::now(),
        };

        self.analyses.write().await.insert(stored.id, stored.clone());
        debug!(id = %stored.id, ticker = %stored.technical_metrics.ticker, "분석 결과 저장");
        stored
    }

    async fn get(&self, id: Uuid) -> Option<StoredAnalysis> {
        self.analyses.read().await.get(&id).cloned()
    }

    async fn delete(&self, id: Uuid) -> bool {
        let removed = self.analyses.write().await.remove(&id).is_some();
        debug!(id = %id, removed, "분석 결과 삭제");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::Trend;

    fn sample() -> NewAnalysis {
        NewAnalysis {
            stock_data: Vec::new(),
            technical_metrics: TechnicalStats {
                current_price: 187.5,
                daily_change: -1.25,
                daily_return: Some(-0.66),
                yearly_return: None,
                daily_volume: 52_000_000,
                obv: None,
                ad_line: None,
                atr: None,
                natr: None,
                momentum: None,
                roc: None,
                rsi: Some(48.2),
                ma20: None,
                ma50: None,
                ma200: None,
                macd: None,
                macd_signal: None,
                macd_hist: None,
                bb_upper: None,
                bb_middle: None,
                bb_lower: None,
                yearly_high: 199.6,
                yearly_low: 164.1,
                ticker: "AAPL".to_string(),
                trend: Trend::Bearish,
                trend_strength: 1.8,
            },
            fundamental_metrics: FundamentalData::unavailable(),
            analysis_text: NarrativeText::unparsed("text"),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryAnalysisRepository::new();
        let stored = repo.create(sample()).await;

        let fetched = repo.get(stored.id).await.unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.technical_metrics.ticker, "AAPL");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let repo = InMemoryAnalysisRepository::new();
        let a = repo.create(sample()).await;
        let b = repo.create(sample()).await;

        assert_ne!(a.id, b.id);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryAnalysisRepository::new();
        let stored = repo.create(sample()).await;

        assert!(repo.delete(stored.id).await);
        assert!(!repo.delete(stored.id).await);
        assert!(repo.get(stored.id).await.is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let repo = InMemoryAnalysisRepository::new();
        assert!(repo.get(Uuid::new_v4()).await.is_none());
    }
}
