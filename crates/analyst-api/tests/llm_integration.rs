//! 언어 모델 클라이언트 통합 테스트
//!
//! mockito 서버로 Chat Completions 엔드포인트를 흉내 냅니다.

use analyst_api::services::{
    LlmClient, LlmError, LlmNarrator, LlmQueryInterpreter, RuleBasedInterpreter,
};
use analyst_core::{
    AnalysisError, FundamentalData, Interval, LlmConfig, NarrativeGenerator, QueryInterpreter,
    StatsRecord, TechnicalStats, Trend, UNPARSED_OUTLOOK,
};
use mockito::{Matcher, Server, ServerGuard};
use secrecy::SecretString;

fn client_for(server: &ServerGuard) -> LlmClient {
    let config = LlmConfig {
        base_url: format!("{}/v1/chat/completions", server.url()),
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    LlmClient::new(&config, SecretString::from("test-key".to_string())).unwrap()
}

fn completion(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn stats() -> StatsRecord {
    StatsRecord {
        technical: TechnicalStats {
            current_price: 187.5,
            daily_change: 1.25,
            daily_return: Some(0.67),
            yearly_return: Some(8.1),
            daily_volume: 52_000_000,
            obv: Some(120_000_000),
            ad_line: Some(3_000_000),
            atr: Some(3.2),
            natr: Some(1.71),
            momentum: Some(4.5),
            roc: Some(2.4),
            rsi: Some(61.3),
            ma20: Some(184.0),
            ma50: Some(181.0),
            ma200: Some(176.0),
            macd: Some(1.1),
            macd_signal: Some(0.9),
            macd_hist: Some(0.2),
            bb_upper: Some(190.0),
            bb_middle: Some(184.0),
            bb_lower: Some(178.0),
            yearly_high: 199.6,
            yearly_low: 164.1,
            ticker: "AAPL".to_string(),
            trend: Trend::Bullish,
            trend_strength: 7.4,
        },
        fundamental: FundamentalData::unavailable(),
    }
}

#[tokio::test]
async fn complete_sends_bearer_and_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "deepseek-chat",
            "max_tokens": 1000,
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hello"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("hi there"))
        .create_async()
        .await;

    let answer = client_for(&server).complete("sys", "hello").await.unwrap();

    assert_eq!(answer, "hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn complete_surfaces_http_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body("invalid api key")
        .create_async()
        .await;

    let err = client_for(&server).complete("sys", "hello").await.unwrap_err();

    assert!(matches!(err, LlmError::Status { status: 401, ref body } if body == "invalid api key"));
}

#[tokio::test]
async fn complete_rejects_empty_choices() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let err = client_for(&server).complete("sys", "hello").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn narrator_parses_fenced_json() {
    let mut server = Server::new_async().await;
    let content = "```json\n{\"summary\": \"AAPL is in an uptrend\", \"technicalFactors\": [\"Price above MA200\"], \"fundamentalFactors\": [], \"outlook\": \"Positive\"}\n```";
    server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("technical.ticker".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(content))
        .create_async()
        .await;

    let narrator = LlmNarrator::new(client_for(&server));
    let narrative = narrator.narrate(&stats(), "Show me Apple stock").await.unwrap();

    assert_eq!(narrative.summary, "AAPL is in an uptrend");
    assert_eq!(narrative.technical_factors, vec!["Price above MA200".to_string()]);
    assert_eq!(narrative.outlook, "Positive");
}

#[tokio::test]
async fn narrator_keeps_free_text_answer() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("Apple looks strong this quarter."))
        .create_async()
        .await;

    let narrator = LlmNarrator::new(client_for(&server));
    let narrative = narrator.narrate(&stats(), "apple?").await.unwrap();

    assert_eq!(narrative.summary, "Apple looks strong this quarter.");
    assert!(narrative.technical_factors.is_empty());
    assert_eq!(narrative.outlook, UNPARSED_OUTLOOK);
}

#[tokio::test]
async fn narrator_transport_failure_is_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .create_async()
        .await;

    let narrator = LlmNarrator::new(client_for(&server));
    let err = narrator.narrate(&stats(), "apple?").await.unwrap_err();

    assert!(matches!(err, AnalysisError::NarrativeGenerationFailed(_)));
}

#[tokio::test]
async fn interpreter_reads_model_json() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(
            r#"{"symbol": "googl", "period": "6mo", "interval": "1wk"}"#,
        ))
        .create_async()
        .await;

    let interpreter = LlmQueryInterpreter::new(client_for(&server), RuleBasedInterpreter::new());
    let query = interpreter
        .interpret("how has alphabet done in the last half year, weekly")
        .await
        .unwrap();

    assert_eq!(query.symbol, "GOOGL");
    assert_eq!(query.period, "6mo");
    assert_eq!(query.interval, Interval::W1);
}

#[tokio::test]
async fn interpreter_falls_back_to_rules() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .create_async()
        .await;

    let interpreter = LlmQueryInterpreter::new(client_for(&server), RuleBasedInterpreter::new());
    let query = interpreter.interpret("Show me Apple stock").await.unwrap();

    assert_eq!(query.symbol, "AAPL");
    assert_eq!(query.period, "1y");
    assert_eq!(query.interval, Interval::D1);
}
