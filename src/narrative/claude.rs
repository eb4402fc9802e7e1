//! Claude API narrative provider
//!
//! Requires the `ai` feature to be enabled:
//! ```toml
//! linares-digital = { version = "1.0", features = ["ai"] }
//! ```

use crate::error::ProviderError;

use super::factory::ProviderSettings;
use super::{NarrativeContext, NarrativeProvider, PromptBuilder};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Narrative provider backed by the Anthropic Messages API
pub struct ClaudeNarrativeProvider {
    settings: ProviderSettings,
    #[cfg(feature = "ai")]
    client: reqwest::blocking::Client,
}

impl ClaudeNarrativeProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            #[cfg(feature = "ai")]
            client: super::http::build_client(settings.timeout)?,
            settings,
        })
    }

    #[cfg(feature = "ai")]
    fn send_request(&self, prompt: &str) -> Result<String, ProviderError> {
        use super::http::{check_status, map_send_error};
        use super::prompt::SYSTEM_PROMPT;
        use serde_json::json;

        let body = json!({
            "model": self.settings.model,
            "max_tokens": MAX_TOKENS,
            "system": SYSTEM_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response = self
            .client
            .post(&self.settings.base_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| map_send_error(e, self.settings.timeout))?;

        let json: serde_json::Value = check_status(response)?
            .json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        extract_text(&json)
    }

    #[cfg(not(feature = "ai"))]
    fn send_request(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "AI feature not enabled. Rebuild with: cargo build --features ai".to_string(),
        ))
    }
}

impl NarrativeProvider for ClaudeNarrativeProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn generate(&self, context: &NarrativeContext) -> Result<String, ProviderError> {
        let prompt = PromptBuilder::new().build(context);
        self.send_request(&prompt)
    }
}

/// Concatenate the text blocks of a Messages API response
#[cfg_attr(not(feature = "ai"), allow(dead_code))]
fn extract_text(json: &serde_json::Value) -> Result<String, ProviderError> {
    let blocks = json["content"]
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse("No content in response".to_string()))?;

    let text: Vec<&str> = blocks
        .iter()
        .filter(|block| block["type"].as_str().map_or(true, |t| t == "text"))
        .filter_map(|block| block["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "No text block in response".to_string(),
        ));
    }
    Ok(text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_joins_blocks() {
        let response = json!({
            "content": [
                { "type": "text", "text": "First." },
                { "type": "tool_use", "id": "x" },
                { "type": "text", "text": "Second." }
            ]
        });
        assert_eq!(extract_text(&response).unwrap(), "First.\nSecond.");
    }

    #[test]
    fn test_extract_text_without_content() {
        let err = extract_text(&json!({ "error": "nope" })).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
        let err = extract_text(&json!({ "content": [] })).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[cfg(not(feature = "ai"))]
    #[test]
    fn test_generate_without_ai_feature_is_unavailable() {
        use crate::{CompanySize, Sector, Tier};

        let provider = ClaudeNarrativeProvider::new(ProviderSettings::for_test()).unwrap();
        let ctx = NarrativeContext {
            business_name: "x".to_string(),
            sector: Sector::Other,
            size: CompanySize::Micro,
            global_index: 3.0,
            tier: Tier::Defined,
            strongest: "a".to_string(),
            weakest: "b".to_string(),
            dimensions: vec![],
        };
        assert!(matches!(
            provider.generate(&ctx),
            Err(ProviderError::Unavailable(_))
        ));
    }
}
