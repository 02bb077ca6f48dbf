//! 분석 텍스트(내러티브) 생성기.
//!
//! - [`LlmNarrator`]: 통계 레코드를 컨텍스트로 언어 모델에 분석을 요청
//! - [`TemplateNarrator`]: 통계 레코드만으로 결정적인 문장을 조립 (LLM 비활성/테스트용)

use analyst_core::{
    AnalysisError, AnalysisResult, FundamentalData, NarrativeGenerator, NarrativeText,
    StatsRecord, TechnicalStats, Trend, NOT_AVAILABLE,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::llm_client::{strip_code_fence, LlmClient};

const SYSTEM_PROMPT: &str = r#"You are a financial analysis assistant. Analyze the user's query and provide:
1. A summary of the analysis
2. Technical factors affecting the asset
3. Fundamental factors affecting the asset
4. A market outlook

Format your response as a JSON object with these keys:
{
    "summary": "string",
    "technicalFactors": ["string"],
    "fundamentalFactors": ["string"],
    "outlook": "string"
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNarrative {
    summary: String,
    #[serde(default)]
    technical_factors: Vec<String>,
    #[serde(default)]
    fundamental_factors: Vec<String>,
    #[serde(default)]
    outlook: String,
}

/// 시스템 프롬프트에 통계 컨텍스트를 덧붙입니다.
pub fn build_system_prompt(stats: &StatsRecord) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\nContext:\n");
    prompt.push_str(&stats.to_context_lines().join("\n"));
    prompt
}

/// 모델 응답을 내러티브로 변환합니다.
///
/// JSON이 아니면 원문 전체를 요약으로 사용합니다.
pub fn parse_narrative(answer: &str) -> NarrativeText {
    match serde_json::from_str::<RawNarrative>(strip_code_fence(answer)) {
        Ok(raw) => NarrativeText::new(
            raw.summary,
            raw.technical_factors,
            raw.fundamental_factors,
            raw.outlook,
        ),
        Err(e) => {
            warn!(error = %e, "내러티브 JSON 파싱 실패, 원문 사용");
            NarrativeText::unparsed(answer)
        }
    }
}

/// 언어 모델 기반 내러티브 생성기.
#[derive(Debug, Clone)]
pub struct LlmNarrator {
    client: LlmClient,
}

impl LlmNarrator {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NarrativeGenerator for LlmNarrator {
    #[instrument(skip(self, stats, question), fields(ticker = %stats.ticker()))]
    async fn narrate(&self, stats: &StatsRecord, question: &str) -> AnalysisResult<NarrativeText> {
        let answer = self
            .client
            .complete(&build_system_prompt(stats), question)
            .await
            .map_err(|e| AnalysisError::NarrativeGenerationFailed(e.to_string()))?;

        let narrative = parse_narrative(&answer);
        debug!(
            technical = narrative.technical_factors.len(),
            fundamental = narrative.fundamental_factors.len(),
            "내러티브 생성 완료"
        );
        Ok(narrative)
    }
}

/// 템플릿 기반 내러티브 생성기.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn new() -> Self {
        Self
    }

    /// 통계 레코드에서 내러티브를 조립합니다.
    pub fn compose(&self, stats: &StatsRecord) -> NarrativeText {
        let t = &stats.technical;
        let summary = format!(
            "{} is trading at {:.2} ({:+.2} on the day), within a range of {:.2}-{:.2}. \
             The overall trend is {} with a strength of {:.2}.",
            t.ticker, t.current_price, t.daily_change, t.yearly_low, t.yearly_high, t.trend,
            t.trend_strength
        );

        NarrativeText::new(
            summary,
            technical_factors(t),
            fundamental_factors(&stats.fundamental),
            outlook(t),
        )
    }
}

fn technical_factors(t: &TechnicalStats) -> Vec<String> {
    let mut factors = Vec::new();

    for (label, ma) in [("20-day", t.ma20), ("50-day", t.ma50), ("200-day", t.ma200)] {
        if let Some(ma) = ma {
            let side = if t.current_price >= ma { "above" } else { "below" };
            factors.push(format!("Price is {} the {} moving average ({:.2})", side, label, ma));
        }
    }

    if let Some(rsi) = t.rsi {
        let zone = if rsi >= 70.0 {
            "overbought"
        } else if rsi <= 30.0 {
            "oversold"
        } else {
            "neutral"
        };
        factors.push(format!("RSI at {:.2} is in {} territory", rsi, zone));
    }

    if let (Some(macd), Some(signal)) = (t.macd, t.macd_signal) {
        let cross = if macd > signal { "above" } else { "below" };
        factors.push(format!(
            "MACD ({:.2}) is {} its signal line ({:.2})",
            macd, cross, signal
        ));
    }

    if let Some(natr) = t.natr {
        factors.push(format!("Normalized ATR of {:.2}% indicates daily volatility", natr));
    }

    factors
}

fn fundamental_factors(f: &FundamentalData) -> Vec<String> {
    let mut factors = Vec::new();

    if f.sector != NOT_AVAILABLE {
        factors.push(format!("Sector: {} / {}", f.sector, f.industry));
    }
    if let Some(cap) = f.market_cap {
        factors.push(format!("Market cap of {:.2}B", cap / 1e9));
    }
    if let Some(pe) = f.trailing_pe {
        factors.push(format!("Trailing P/E of {:.2}", pe));
    }
    if let Some(pe) = f.forward_pe {
        factors.push(format!("Forward P/E of {:.2}", pe));
    }
    if let Some(yield_pct) = f.dividend_yield {
        factors.push(format!("Dividend yield of {:.2}%", yield_pct));
    }
    if let Some(margin) = f.profit_margins {
        factors.push(format!("Profit margin of {:.2}%", margin));
    }
    if factors.is_empty() {
        factors.push("Fundamental data is unavailable".to_string());
    }

    factors
}

fn outlook(t: &TechnicalStats) -> String {
    match t.trend {
        Trend::Bullish => format!(
            "Momentum favours further upside while price holds above the 50-day average (strength {:.2}).",
            t.trend_strength
        ),
        Trend::Bearish => format!(
            "Not all trend conditions are met; expect caution until momentum confirms (strength {:.2}).",
            t.trend_strength
        ),
    }
}

#[async_trait]
impl NarrativeGenerator for TemplateNarrator {
    async fn narrate(&self, stats: &StatsRecord, _question: &str) -> AnalysisResult<NarrativeText> {
        Ok(self.compose(stats))
    }
}
