//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → 환경 변수(`ANALYST__섹션__키`) 순서로 설정을 병합합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 수집 설정
    pub data: DataConfig,
    /// 언어 모델 설정
    pub llm: LlmConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 120,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데이터 수집 및 파이프라인 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 질의에 간격이 없을 때 사용할 캔들 간격
    pub default_interval: String,
    /// 질의에 기간이 없을 때 사용할 기간
    pub default_period: String,
    /// 분석에 필요한 최소 캔들 수
    pub min_rows: usize,
    /// 메타데이터 조회 시도 횟수
    pub metadata_attempts: u32,
    /// 재시도 간 대기 시간 (밀리초, 시도 횟수에 비례)
    pub retry_backoff_ms: u64,
    /// 외부 조회 타임아웃 (초)
    pub fetch_timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_interval: "1d".to_string(),
            default_period: "1y".to_string(),
            min_rows: 20,
            metadata_attempts: 3,
            retry_backoff_ms: 500,
            fetch_timeout_secs: 30,
        }
    }
}

/// 언어 모델(OpenAI 호환 Chat Completions) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM 사용 여부 (false면 규칙 기반 해석기/템플릿 내러티브 사용)
    pub enabled: bool,
    /// Chat Completions 엔드포인트
    pub base_url: String,
    /// 모델 이름
    pub model: String,
    /// API 키를 담은 환경 변수 이름
    pub api_key_env: String,
    /// 샘플링 온도
    pub temperature: f32,
    /// 최대 생성 토큰 수
    pub max_tokens: u32,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ANALYST")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로(`config/default.toml`)에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 미적용).
    pub fn from_toml_str(content: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
