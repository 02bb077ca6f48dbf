//! 외부 협력자 구현 (질의 해석, 내러티브 생성, 언어 모델 클라이언트).

pub mod interpreter;
pub mod llm_client;
pub mod narrator;

pub use interpreter::{LlmQueryInterpreter, RuleBasedInterpreter};
pub use llm_client::{strip_code_fence, ChatMessage, LlmClient, LlmError};
pub use narrator::{LlmNarrator, TemplateNarrator};

use std::sync::Arc;

use analyst_core::{AppConfig, NarrativeGenerator, QueryInterpreter};
use tracing::{info, warn};

/// 질의 해석기와 내러티브 생성기를 구성합니다.
///
/// LLM이 활성화되어 있고 API 키가 있으면 언어 모델 구현을, 아니면 규칙/템플릿 구현을 사용합니다.
pub fn build_collaborators(
    config: &AppConfig,
) -> (Arc<dyn QueryInterpreter>, Arc<dyn NarrativeGenerator>) {
    let rules = RuleBasedInterpreter::from_config(&config.data);

    if !config.llm.enabled {
        info!("LLM disabled, using rule-based interpreter and template narrator");
        return (Arc::new(rules), Arc::new(TemplateNarrator::new()));
    }

    match LlmClient::from_config(&config.llm) {
        Ok(client) => {
            info!(model = %client.model(), endpoint = %config.llm.base_url, "LLM client initialized");
            (
                Arc::new(LlmQueryInterpreter::new(client.clone(), rules)),
                Arc::new(LlmNarrator::new(client)),
            )
        }
        Err(e) => {
            warn!(error = %e, "LLM unavailable, falling back to rule-based interpreter and template narrator");
            (Arc::new(rules), Arc::new(TemplateNarrator::new()))
        }
    }
}
