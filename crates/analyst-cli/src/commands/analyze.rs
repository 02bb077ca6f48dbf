//! 종목 분석 명령.
//!
//! Yahoo Finance에서 전체 이력을 조회해 지표와 요약 통계를 계산하고,
//! 사람이 읽는 요약 또는 JSON으로 출력합니다.

use std::sync::Arc;
use std::time::Duration;

use analyst_analytics::{AnalysisOutcome, AnalysisPipeline, PipelineSettings};
use analyst_api::services::build_collaborators;
use analyst_core::{AnalysisRequest, AppConfig, DataConfig, ExtractedQuery, Interval, NarrativeText};
use analyst_data::YahooMarketData;
use serde::Serialize;
use tracing::info;

/// 분석 명령 옵션.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// 자유 텍스트 질의
    pub query: String,
    /// 심볼 직접 지정 (질의 해석 생략)
    pub symbol: Option<String>,
    /// 기간 토큰
    pub period: Option<String>,
    /// 캔들 간격
    pub interval: Option<String>,
    /// JSON 출력
    pub json: bool,
    /// 내러티브 생성
    pub narrate: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a AnalysisOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_text: Option<&'a NarrativeText>,
}

/// 옵션에서 파이프라인 요청을 만듭니다.
///
/// `--symbol`이 있으면 질의 해석 없이 구조화된 질의를 사용합니다.
pub fn build_request(
    options: &AnalyzeOptions,
    defaults: &DataConfig,
) -> anyhow::Result<AnalysisRequest> {
    let Some(symbol) = options.symbol.as_deref() else {
        return Ok(AnalysisRequest::Text(options.query.clone()));
    };

    let interval_token = options
        .interval
        .as_deref()
        .unwrap_or(&defaults.default_interval);
    let interval: Interval = interval_token
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let period = options
        .period
        .clone()
        .unwrap_or_else(|| defaults.default_period.clone());

    Ok(ExtractedQuery::new(symbol, period, interval)?.into())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

/// 사람이 읽는 요약.
pub fn render_summary(outcome: &AnalysisOutcome, narrative: Option<&NarrativeText>) -> String {
    let t = &outcome.stats.technical;
    let f = &outcome.stats.fundamental;
    let mut lines = vec![
        format!(
            "{} ({}, {}, {} rows)",
            t.ticker,
            outcome.period,
            outcome.query.interval,
            outcome.series.len()
        ),
        format!(
            "  Price        {:.2} ({:+.2}, {}%)",
            t.current_price,
            t.daily_change,
            fmt_opt(t.daily_return)
        ),
        format!("  Range        {:.2} - {:.2}", t.yearly_low, t.yearly_high),
        format!("  Volume       {}", t.daily_volume),
        format!(
            "  MA 20/50/200 {} / {} / {}",
            fmt_opt(t.ma20),
            fmt_opt(t.ma50),
            fmt_opt(t.ma200)
        ),
        format!("  RSI          {}", fmt_opt(t.rsi)),
        format!(
            "  MACD         {} (signal {}, hist {})",
            fmt_opt(t.macd),
            fmt_opt(t.macd_signal),
            fmt_opt(t.macd_hist)
        ),
        format!(
            "  Bollinger    {} / {} / {}",
            fmt_opt(t.bb_lower),
            fmt_opt(t.bb_middle),
            fmt_opt(t.bb_upper)
        ),
        format!("  ATR / NATR   {} / {}%", fmt_opt(t.atr), fmt_opt(t.natr)),
        format!("  Trend        {} (strength {:.2})", t.trend, t.trend_strength),
        format!(
            "  Fundamentals sector {}, P/E {}, dividend yield {}%",
            f.sector,
            fmt_opt(f.trailing_pe),
            fmt_opt(f.dividend_yield)
        ),
    ];

    if let Some(narrative) = narrative {
        lines.push(String::new());
        lines.push(narrative.summary.clone());
        for factor in narrative
            .technical_factors
            .iter()
            .chain(&narrative.fundamental_factors)
        {
            lines.push(format!("  - {}", factor));
        }
        lines.push(format!("Outlook: {}", narrative.outlook));
    }

    lines.join("\n")
}

/// JSON 출력.
pub fn render_json(
    outcome: &AnalysisOutcome,
    narrative: Option<&NarrativeText>,
) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        outcome,
        analysis_text: narrative,
    })?)
}

/// 분석을 실행하고 출력 문자열을 반환합니다.
pub async fn run_analyze(options: AnalyzeOptions, config: &AppConfig) -> anyhow::Result<String> {
    let yahoo = Arc::new(YahooMarketData::new(Duration::from_secs(
        config.data.fetch_timeout_secs,
    ))?);
    let (interpreter, narrator) = build_collaborators(config);
    let pipeline = AnalysisPipeline::new(yahoo.clone(), yahoo, interpreter)
        .with_settings(PipelineSettings::from(&config.data));

    let request = build_request(&options, &config.data)?;
    let outcome = pipeline.analyze(request).await?;
    info!(symbol = %outcome.query.symbol, rows = outcome.series.len(), "분석 완료");

    let narrative = if options.narrate {
        let question = if options.query.trim().is_empty() {
            format!("Analyze {}", outcome.query.symbol)
        } else {
            options.query.clone()
        };
        Some(narrator.narrate(&outcome.stats, &question).await?)
    } else {
        None
    };

    if options.json {
        render_json(&outcome, narrative.as_ref())
    } else {
        Ok(render_summary(&outcome, narrative.as_ref()))
    }
}
