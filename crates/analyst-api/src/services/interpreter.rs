//! 자연어 질의 해석기.
//!
//! - [`RuleBasedInterpreter`]: 대문자 티커/회사명, 기간 토큰/구문을 규칙으로 추출
//! - [`LlmQueryInterpreter`]: 언어 모델에 JSON 추출을 요청하고, 실패하면 규칙 기반으로 대체

use analyst_core::{
    parse_period, AnalysisError, AnalysisResult, DataConfig, ExtractedQuery, Interval,
    QueryInterpreter,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::llm_client::{strip_code_fence, LlmClient};

/// 회사명 → 티커.
const COMPANY_TICKERS: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("nvidia", "NVDA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("intel", "INTC"),
    ("amd", "AMD"),
    ("disney", "DIS"),
    ("berkshire", "BRK-B"),
    ("walmart", "WMT"),
    ("coca-cola", "KO"),
    ("nike", "NKE"),
    ("samsung", "005930.KS"),
];

/// 티커로 오인하기 쉬운 대문자 단어.
const TICKER_STOPWORDS: &[&str] = &["I", "A", "AI", "US", "USA", "CEO", "ETF", "IPO", "EPS", "PE"];

/// 간격을 뜻하는 단어.
const INTERVAL_WORDS: &[(&str, Interval)] = &[
    ("hourly", Interval::H1),
    ("daily", Interval::D1),
    ("weekly", Interval::W1),
    ("monthly", Interval::Mo1),
];

/// 규칙 기반 질의 해석기.
#[derive(Debug, Clone)]
pub struct RuleBasedInterpreter {
    default_period: String,
    default_interval: Interval,
}

impl Default for RuleBasedInterpreter {
    fn default() -> Self {
        Self {
            default_period: "1y".to_string(),
            default_interval: Interval::D1,
        }
    }
}

impl RuleBasedInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 데이터 설정의 기본 기간/간격을 사용합니다.
    pub fn from_config(config: &DataConfig) -> Self {
        let default_interval = Interval::from_yahoo_str(&config.default_interval)
            .unwrap_or_else(|| {
                warn!(interval = %config.default_interval, "잘못된 기본 간격, 1d 사용");
                Interval::D1
            });

        Self {
            default_period: config.default_period.clone(),
            default_interval,
        }
    }

    pub fn default_interval(&self) -> Interval {
        self.default_interval
    }

    pub fn default_period(&self) -> &str {
        &self.default_period
    }

    /// 텍스트에서 질의를 추출합니다.
    ///
    /// # Errors
    ///
    /// 티커나 알려진 회사명이 없으면 `QueryInterpretationFailed`.
    pub fn extract(&self, text: &str) -> AnalysisResult<ExtractedQuery> {
        let words: Vec<&str> = text
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
            .map(|w| w.trim_matches(|c| c == '-' || c == '.'))
            .filter(|w| !w.is_empty())
            .collect();
        let lower: Vec<String> = words.iter().map(|w| w.to_ascii_lowercase()).collect();

        let symbol = find_ticker(&words)
            .or_else(|| find_company(&lower))
            .ok_or_else(|| {
                AnalysisError::QueryInterpretationFailed(format!(
                    "종목을 찾을 수 없습니다: {}",
                    text
                ))
            })?;

        let period = find_period(&lower).unwrap_or_else(|| self.default_period.clone());
        let interval = find_interval(&lower).unwrap_or(self.default_interval);

        ExtractedQuery::new(symbol, period, interval)
    }
}

fn find_ticker(words: &[&str]) -> Option<String> {
    words
        .iter()
        .find(|w| {
            (1..=5).contains(&w.len())
                && w.chars().all(|c| c.is_ascii_uppercase())
                && !TICKER_STOPWORDS.contains(*w)
        })
        .map(|w| w.to_string())
}

fn find_company(lower: &[String]) -> Option<String> {
    lower.iter().find_map(|w| {
        COMPANY_TICKERS
            .iter()
            .find(|(name, _)| name == w)
            .map(|(_, ticker)| ticker.to_string())
    })
}

/// 기간 토큰(`6mo`, `max`) 또는 구문(`6 months`, `past year`)을 찾습니다.
fn find_period(lower: &[String]) -> Option<String> {
    for (i, word) in lower.iter().enumerate() {
        let is_token = word.starts_with(|c: char| c.is_ascii_digit()) && parse_period(word).is_ok();
        if word == "max" || is_token {
            return Some(word.clone());
        }

        if let Some(unit) = period_unit(word) {
            let count = match i.checked_sub(1).map(|j| lower[j].as_str()) {
                Some(prev) => match prev.parse::<u32>() {
                    Ok(n) if n > 0 => Some(n),
                    Ok(_) => None,
                    Err(_) if matches!(prev, "a" | "one" | "past" | "last" | "this") => Some(1),
                    Err(_) => None,
                },
                None => None,
            };
            if let Some(count) = count {
                return Some(format!("{}{}", count, unit));
            }
        }
    }

    if lower.windows(2).any(|w| w[0] == "all" && w[1] == "time") {
        return Some("max".to_string());
    }
    None
}

fn period_unit(word: &str) -> Option<&'static str> {
    match word {
        "day" | "days" => Some("d"),
        "week" | "weeks" => Some("w"),
        "month" | "months" => Some("mo"),
        "year" | "years" => Some("y"),
        _ => None,
    }
}

/// 간격 단어(`weekly`) 또는 기간과 겹치지 않는 간격 토큰(`1h`, `15m`, `1wk`)을 찾습니다.
fn find_interval(lower: &[String]) -> Option<Interval> {
    lower.iter().find_map(|w| {
        INTERVAL_WORDS
            .iter()
            .find(|(word, _)| word == w)
            .map(|(_, interval)| *interval)
            .or_else(|| {
                if parse_period(w).is_ok() {
                    None
                } else {
                    Interval::from_yahoo_str(w)
                }
            })
    })
}

#[async_trait]
impl QueryInterpreter for RuleBasedInterpreter {
    async fn interpret(&self, text: &str) -> AnalysisResult<ExtractedQuery> {
        let query = self.extract(text)?;
        debug!(symbol = %query.symbol, period = %query.period, interval = %query.interval, "규칙 기반 해석");
        Ok(query)
    }
}

const EXTRACTION_PROMPT: &str = r#"You extract stock lookup parameters from a user's request.
Respond with only a JSON object of the form:
{"symbol": "AAPL", "period": "1y", "interval": "1d"}

- symbol: the exchange ticker of the company the user asks about, in upper case
- period: one of Nd, Nw, Nmo, Ny (N a positive integer) or "max"; default "1y"
- interval: one of 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo; default "1d"
"#;

#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

/// 언어 모델 기반 질의 해석기.
///
/// 모델 호출이나 응답 파싱이 실패하면 규칙 기반 해석기로 대체합니다.
#[derive(Debug, Clone)]
pub struct LlmQueryInterpreter {
    client: LlmClient,
    fallback: RuleBasedInterpreter,
}

impl LlmQueryInterpreter {
    pub fn new(client: LlmClient, fallback: RuleBasedInterpreter) -> Self {
        Self { client, fallback }
    }

    async fn ask_model(&self, text: &str) -> AnalysisResult<ExtractedQuery> {
        let answer = self
            .client
            .complete(EXTRACTION_PROMPT, text)
            .await
            .map_err(|e| AnalysisError::QueryInterpretationFailed(e.to_string()))?;

        parse_extraction(strip_code_fence(&answer), &self.fallback)
    }
}

/// 모델 응답 JSON을 질의로 변환합니다. 빠지거나 잘못된 기간/간격은 기본값을 사용합니다.
fn parse_extraction(
    json: &str,
    defaults: &RuleBasedInterpreter,
) -> AnalysisResult<ExtractedQuery> {
    let raw: RawExtraction = serde_json::from_str(json)
        .map_err(|e| AnalysisError::QueryInterpretationFailed(format!("JSON 파싱 실패: {}", e)))?;

    let symbol = raw.symbol.unwrap_or_default();
    let period = raw
        .period
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| defaults.default_period().to_string());
    let interval = match raw.interval.as_deref().map(Interval::from_yahoo_str) {
        Some(Some(interval)) => interval,
        Some(None) => {
            warn!(interval = ?raw.interval, "모델이 잘못된 간격을 반환, 기본값 사용");
            defaults.default_interval()
        }
        None => defaults.default_interval(),
    };

    ExtractedQuery::new(symbol, period, interval)
}

#[async_trait]
impl QueryInterpreter for LlmQueryInterpreter {
    async fn interpret(&self, text: &str) -> AnalysisResult<ExtractedQuery> {
        match self.ask_model(text).await {
            Ok(query) => {
                debug!(symbol = %query.symbol, period = %query.period, "언어 모델 해석");
                Ok(query)
            }
            Err(e) => {
                warn!(error = %e, "언어 모델 해석 실패, 규칙 기반으로 대체");
                self.fallback.interpret(text).await
            }
        }
    }
}
