use crate::db::Database;
use crate::error::{Result, VaultError};
use crate::llm::{claude, gemini, openai, LlmError, ModelInfo, Provider};
use std::collections::BTreeMap;
use tracing::debug;

pub const SETTING_KEYS: &[&str] = &[
    "openai_api_key",
    "openai_base_url",
    "claude_api_key",
    "claude_base_url",
    "gemini_api_key",
    "gemini_base_url",
    "ollama_host",
    "default_model",
];

pub const DEFAULT_MODEL: &str = "gemini/gemini-3-flash-preview";
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// `sk-abc...wxyz` style display for API keys.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return value.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn list_settings(db: &Database) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for key in SETTING_KEYS {
        if let Some(value) = db.get_setting(key)? {
            let shown = if key.ends_with("_api_key") {
                mask_secret(&value)
            } else {
                value
            };
            map.insert(key.to_string(), shown);
        }
    }
    Ok(map)
}

pub fn set_setting(db: &Database, key: &str, value: &str) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        return Err(VaultError::InvalidInput(format!("Unknown setting key: {}", key)));
    }
    db.set_setting(key, value)?;
    Ok(())
}

pub fn delete_setting(db: &Database, key: &str) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        return Err(VaultError::InvalidInput(format!("Unknown setting key: {}", key)));
    }
    db.delete_setting(key)?;
    Ok(())
}

/// Stored setting first, then the environment variable.
fn lookup(db: &Database, key: &str, env_var: &str) -> Option<String> {
    db.get_setting(key)
        .ok()
        .flatten()
        .or_else(|| std::env::var(env_var).ok())
        .filter(|v| !v.trim().is_empty())
}

/// Resolve an LLM provider from a model string like "gemini/...", "openai/gpt-4o",
/// "claude/..." or "ollama/...". Unqualified names go to OpenAI.
pub fn resolve_provider(model: Option<&str>, db: &Database) -> std::result::Result<Provider, LlmError> {
    let model = model
        .map(str::to_string)
        .or_else(|| lookup(db, "default_model", "CLINIQ_MODEL"))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    debug!(model = %model, "resolving provider");

    if let Some(model_id) = model.strip_prefix("ollama/") {
        let host = lookup(db, "ollama_host", "OLLAMA_HOST")
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        Ok(Provider::ollama(host, model_id.to_string()))
    } else if let Some(model_id) = model.strip_prefix("claude/") {
        let api_key = lookup(db, "claude_api_key", "ANTHROPIC_API_KEY")
            .ok_or_else(|| LlmError::NotConfigured("Claude API key".into()))?;
        let base_url = lookup(db, "claude_base_url", "ANTHROPIC_BASE_URL")
            .unwrap_or_else(|| claude::DEFAULT_BASE_URL.to_string());
        Ok(Provider::Claude(
            claude::ClaudeConfig { api_key, base_url },
            model_id.to_string(),
        ))
    } else if let Some(model_id) = model.strip_prefix("gemini/") {
        let api_key = lookup(db, "gemini_api_key", "GEMINI_API_KEY")
            .ok_or_else(|| LlmError::NotConfigured("Gemini API key".into()))?;
        let base_url = lookup(db, "gemini_base_url", "GEMINI_BASE_URL")
            .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());
        Ok(Provider::Gemini(
            gemini::GeminiConfig { api_key, base_url },
            model_id.to_string(),
        ))
    } else {
        let model_id = model.strip_prefix("openai/").unwrap_or(&model);
        let api_key = lookup(db, "openai_api_key", "OPENAI_API_KEY")
            .ok_or_else(|| LlmError::NotConfigured("OpenAI API key".into()))?;
        let base_url = lookup(db, "openai_base_url", "OPENAI_BASE_URL")
            .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string());
        Ok(Provider::OpenAi(
            openai::OpenAiConfig { api_key, base_url },
            model_id.to_string(),
        ))
    }
}

fn model(id: &str, name: &str, provider: &str) -> ModelInfo {
    ModelInfo {
        id: id.into(),
        name: name.into(),
        provider: provider.into(),
    }
}

pub fn available_models(db: &Database) -> Vec<ModelInfo> {
    let mut models = Vec::new();

    if lookup(db, "gemini_api_key", "GEMINI_API_KEY").is_some() {
        models.push(model(DEFAULT_MODEL, "Gemini 3 Flash (preview)", "Google"));
    }

    if lookup(db, "openai_api_key", "OPENAI_API_KEY").is_some() {
        models.extend([
            model("openai/gpt-4o", "GPT-4o", "OpenAI"),
            model("openai/gpt-4o-mini", "GPT-4o Mini", "OpenAI"),
        ]);
    }

    if lookup(db, "claude_api_key", "ANTHROPIC_API_KEY").is_some() {
        models.push(model(
            "claude/claude-sonnet-4-20250514",
            "Claude Sonnet 4",
            "Anthropic",
        ));
    }

    // Local, no key needed.
    models.extend([
        model("ollama/llama3", "Llama 3", "Ollama"),
        model("ollama/qwen2.5", "Qwen 2.5", "Ollama"),
    ]);

    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TextGenerator;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-1234567890abcd"), "sk-1...abcd");
        assert_eq!(mask_secret("short"), "short");
    }

    #[test]
    fn test_list_masks_api_keys_only() {
        let db = Database::open_in_memory().unwrap();
        set_setting(&db, "gemini_api_key", "AIzaSyExampleKey123").unwrap();
        set_setting(&db, "default_model", "ollama/llama3").unwrap();

        let map = list_settings(&db).unwrap();
        assert_eq!(map["gemini_api_key"], "AIza...y123");
        assert_eq!(map["default_model"], "ollama/llama3");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            set_setting(&db, "theme", "dark"),
            Err(VaultError::InvalidInput(_))
        ));
        assert!(delete_setting(&db, "theme").is_err());
    }

    #[test]
    fn test_resolve_uses_stored_settings() {
        let db = Database::open_in_memory().unwrap();
        set_setting(&db, "claude_api_key", "stored-claude-key").unwrap();
        set_setting(&db, "claude_base_url", "http://127.0.0.1:9").unwrap();

        let provider = resolve_provider(Some("claude/claude-sonnet-4-20250514"), &db).unwrap();
        assert_eq!(provider.provider_name(), "claude");
        assert_eq!(provider.model_name(), "claude-sonnet-4-20250514");
        match provider {
            Provider::Claude(config, _) => {
                assert_eq!(config.api_key, "stored-claude-key");
                assert_eq!(config.base_url, "http://127.0.0.1:9");
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_resolve_default_model_setting() {
        let db = Database::open_in_memory().unwrap();
        set_setting(&db, "default_model", "ollama/qwen2.5").unwrap();
        set_setting(&db, "ollama_host", "http://gpu-box:11434").unwrap();

        let provider = resolve_provider(None, &db).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "qwen2.5");
    }
}
