pub mod claude;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One-shot generation: system guidance plus a single user turn.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Model id to send when the caller has no preference.
    fn model_name(&self) -> &str;
}

/// Unified LLM provider enum dispatching to OpenAI-compatible, Claude or Gemini backends.
#[derive(Debug, Clone)]
pub enum Provider {
    OpenAi(openai::OpenAiConfig, String),
    Claude(claude::ClaudeConfig, String),
    Gemini(gemini::GeminiConfig, String),
    Ollama(openai::OpenAiConfig, String),
}

impl Provider {
    pub fn openai(api_key: String, model: String) -> Self {
        Provider::OpenAi(
            openai::OpenAiConfig {
                api_key,
                base_url: openai::DEFAULT_BASE_URL.to_string(),
            },
            model,
        )
    }

    pub fn claude(api_key: String, model: String) -> Self {
        Provider::Claude(
            claude::ClaudeConfig {
                api_key,
                base_url: claude::DEFAULT_BASE_URL.to_string(),
            },
            model,
        )
    }

    pub fn gemini(api_key: String, model: String) -> Self {
        Provider::Gemini(
            gemini::GeminiConfig {
                api_key,
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
            },
            model,
        )
    }

    pub fn ollama(host: String, model: String) -> Self {
        Provider::Ollama(
            openai::OpenAiConfig {
                api_key: String::new(),
                base_url: format!("{}/v1", host.trim_end_matches('/')),
            },
            model,
        )
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Provider::OpenAi(..) => "openai",
            Provider::Claude(..) => "claude",
            Provider::Gemini(..) => "gemini",
            Provider::Ollama(..) => "ollama",
        }
    }
}

#[async_trait]
impl TextGenerator for Provider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        match self {
            Provider::OpenAi(config, _) | Provider::Ollama(config, _) => {
                openai::generate(config, request).await
            }
            Provider::Claude(config, _) => claude::generate(config, request).await,
            Provider::Gemini(config, _) => gemini::generate(config, request).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::OpenAi(_, model)
            | Provider::Claude(_, model)
            | Provider::Gemini(_, model)
            | Provider::Ollama(_, model) => model,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0} is not configured")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_base_url_gets_v1_suffix() {
        let provider = Provider::ollama("http://localhost:11434/".into(), "llama3".into());
        match provider {
            Provider::Ollama(config, model) => {
                assert_eq!(config.base_url, "http://localhost:11434/v1");
                assert!(config.api_key.is_empty());
                assert_eq!(model, "llama3");
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_model_name_comes_from_variant() {
        let provider = Provider::gemini("k".into(), "gemini-3-flash-preview".into());
        assert_eq!(provider.model_name(), "gemini-3-flash-preview");
        assert_eq!(provider.provider_name(), "gemini");
    }
}
