//! OpenAI-compatible chat-completions explainer

use super::{build_prompt, ExplanationContext, ExplanationGenerator};
use crate::error::ExplanationError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

const SYSTEM_PROMPT: &str =
    "You write short, grounded explanations of Bazi element matches. Never invent chart facts.";

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl ExplainerConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            temperature: 0.7,
        }
    }

    /// Read `BAZI_LLM_BASE_URL`, `BAZI_LLM_API_KEY` and `BAZI_LLM_MODEL`.
    ///
    /// Returns `None` when no base URL is configured.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("BAZI_LLM_BASE_URL").ok().filter(|s| !s.is_empty())?;
        let model = env::var("BAZI_LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let mut config = Self::new(base_url, model);
        config.api_key = env::var("BAZI_LLM_API_KEY").ok().filter(|s| !s.is_empty());
        Some(config)
    }
}

pub struct OpenAiCompatibleExplainer {
    client: Client,
    config: ExplainerConfig,
    name: String,
}

impl OpenAiCompatibleExplainer {
    pub fn new(config: ExplainerConfig) -> Self {
        Self {
            client: Client::new(),
            name: format!("openai-compatible:{}", config.model),
            config,
        }
    }

    fn provider_error(&self, message: impl ToString) -> ExplanationError {
        ExplanationError::Provider {
            provider: self.name.clone(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ExplanationGenerator for OpenAiCompatibleExplainer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_explanation(&self, ctx: &ExplanationContext) -> Result<String, ExplanationError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(ctx) },
            ],
            "temperature": self.config.temperature,
        });

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut request = self.client.post(url).json(&body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.provider_error(e))?;

        let json: serde_json::Value = response.json().await.map_err(|e| self.provider_error(e))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| self.provider_error("response has no message content"))?;

        if content.trim().is_empty() {
            return Err(ExplanationError::EmptyResponse(self.name.clone()));
        }

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explainer_name_includes_model() {
        let explainer = OpenAiCompatibleExplainer::new(ExplainerConfig::new("http://localhost:8080/v1/", "local-model"));
        assert_eq!(explainer.name(), "openai-compatible:local-model");
        assert_eq!(explainer.config.temperature, 0.7);
    }
}
