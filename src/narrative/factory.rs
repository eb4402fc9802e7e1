use std::time::Duration;

use tracing::debug;

use crate::config::{NarrativeConfig, ProviderKind};
use crate::error::ProviderError;
use crate::questionnaire::Questionnaire;

use super::{
    ClaudeNarrativeProvider, NarrativeProvider, OpenAiCompatibleNarrativeProvider,
    TemplateNarrativeProvider,
};

/// Resolved connection settings for a network provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    /// Resolve settings from config, reading the credential from the environment
    pub fn from_config(config: &NarrativeConfig) -> Result<Self, ProviderError> {
        let env_name = config.api_key_env().ok_or_else(|| {
            ProviderError::Unavailable(format!(
                "provider '{}' takes no credential",
                config.provider()
            ))
        })?;
        let api_key = std::env::var(env_name)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential(env_name.to_string()))?;

        Ok(Self {
            api_key,
            model: config.model().to_string(),
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        Self {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        }
    }
}

/// Build the provider named by the configuration.
///
/// A missing credential is an expected outcome, not a fault; the caller
/// falls back to the template.
pub fn build_narrative_provider(
    config: &NarrativeConfig,
    questionnaire: &Questionnaire,
) -> Result<Box<dyn NarrativeProvider>, ProviderError> {
    let provider: Box<dyn NarrativeProvider> = match config.provider() {
        ProviderKind::Template => Box::new(TemplateNarrativeProvider::new(questionnaire.clone())),
        ProviderKind::Anthropic => Box::new(ClaudeNarrativeProvider::new(
            ProviderSettings::from_config(config)?,
        )?),
        ProviderKind::OpenaiCompatible => Box::new(OpenAiCompatibleNarrativeProvider::new(
            ProviderSettings::from_config(config)?,
        )?),
    };
    debug!(provider = provider.name(), "narrative provider selected");
    Ok(provider)
}
