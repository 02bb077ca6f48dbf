//! OpenAI 호환 Chat Completions 클라이언트.
//!
//! DeepSeek 등 `/v1/chat/completions` 형식을 따르는 엔드포인트에 요청합니다.
//! API 키는 설정의 `api_key_env`가 가리키는 환경 변수에서 읽습니다.

use std::time::Duration;

use analyst_core::LlmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// 언어 모델 호출 에러.
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 키 환경 변수가 없음
    #[error("API 키가 설정되지 않았습니다: {0}")]
    MissingApiKey(String),

    /// 전송 실패 (연결, 타임아웃, 응답 디코딩)
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx가 아닌 응답
    #[error("API 에러 {status}: {body}")]
    Status { status: u16, body: String },

    /// choices가 비어 있음
    #[error("응답에 메시지가 없습니다")]
    EmptyResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Chat Completions 클라이언트.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    max_tokens: u32,
}

impl LlmClient {
    /// 명시적인 API 키로 클라이언트를 생성합니다.
    pub fn new(config: &LlmConfig, api_key: SecretString) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// 설정의 `api_key_env` 환경 변수에서 API 키를 읽어 생성합니다.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(config, SecretString::from(api_key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 시스템 프롬프트와 사용자 메시지로 한 번 요청하고 응답 본문을 반환합니다.
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let request = ChatRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "언어 모델 API 에러 응답");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        debug!(chars = content.len(), "언어 모델 응답 수신");
        Ok(content)
    }
}

/// 마크다운 코드 펜스(```` ```json ```` 또는 ```` ``` ````)를 벗겨냅니다.
///
/// 펜스가 없으면 앞뒤 공백만 제거합니다.
pub fn strip_code_fence(text: &str) -> &str {
    if let Some((_, rest)) = text.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some((_, rest)) = text.split_once("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nthanks";
        assert_eq!(strip_code_fence(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_plain_fence() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_no_fence() {
        assert_eq!(strip_code_fence("  {\"a\": 1} \n"), "{\"a\": 1}");
    }

    #[test]
    fn test_missing_api_key() {
        let config = LlmConfig {
            api_key_env: "ANALYST_TEST_KEY_THAT_DOES_NOT_EXIST".to_string(),
            ..LlmConfig::default()
        };

        let err = LlmClient::from_config(&config).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(name) if name.contains("DOES_NOT_EXIST")));
    }
}
