//! Narrative provider for any OpenAI-compatible `/v1/chat/completions` endpoint

use serde::Deserialize;

use crate::error::ProviderError;

use super::factory::ProviderSettings;
use super::{NarrativeContext, NarrativeProvider, PromptBuilder};

pub struct OpenAiCompatibleNarrativeProvider {
    settings: ProviderSettings,
    #[cfg(feature = "ai")]
    client: reqwest::blocking::Client,
}

impl OpenAiCompatibleNarrativeProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        if settings.base_url.trim().is_empty() {
            return Err(ProviderError::Unavailable("base URL is empty".to_string()));
        }
        Ok(Self {
            #[cfg(feature = "ai")]
            client: super::http::build_client(settings.timeout)?,
            settings,
        })
    }

    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    #[cfg(feature = "ai")]
    fn send_request(&self, prompt: &str) -> Result<String, ProviderError> {
        use super::http::{check_status, map_send_error};
        use super::prompt::SYSTEM_PROMPT;
        use serde_json::json;

        let body = json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .map_err(|e| map_send_error(e, self.settings.timeout))?;

        let parsed: ChatCompletionResponse = check_status(response)?
            .json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parsed.into_text()
    }

    #[cfg(not(feature = "ai"))]
    fn send_request(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "AI feature not enabled. Rebuild with: cargo build --features ai".to_string(),
        ))
    }
}

impl NarrativeProvider for OpenAiCompatibleNarrativeProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn generate(&self, context: &NarrativeContext) -> Result<String, ProviderError> {
        let prompt = PromptBuilder::new().build(context);
        self.send_request(&prompt)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl ChatCompletionResponse {
    #[cfg_attr(not(feature = "ai"), allow(dead_code))]
    fn into_text(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("no choices in response".to_string()))
    }
}
