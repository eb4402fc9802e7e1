//! Advisory narrative for a scored assessment
//!
//! A [`NarrativeProvider`] turns a [`NarrativeContext`] into text. The
//! [`NarrativeService`] wraps the configured provider and guarantees a
//! narrative: any provider failure degrades to the template text.

pub mod claude;
mod context;
pub mod factory;
#[cfg(feature = "ai")]
mod http;
pub mod openai_compatible;
pub mod prompt;
pub mod template;
mod traits;

pub use claude::ClaudeNarrativeProvider;
pub use context::NarrativeContext;
pub use factory::{build_narrative_provider, ProviderSettings};
pub use openai_compatible::OpenAiCompatibleNarrativeProvider;
pub use prompt::PromptBuilder;
pub use template::TemplateNarrativeProvider;
pub use traits::NarrativeProvider;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::NarrativeConfig;
use crate::error::ProviderError;
use crate::questionnaire::Questionnaire;

/// Advisory text plus where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    /// Markdown-flavoured text, treated as opaque by the reporters
    pub text: String,
    pub source: NarrativeSource,
}

impl Narrative {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, NarrativeSource::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NarrativeSource {
    /// Produced by the configured provider
    Generated { provider: String },
    /// The provider failed; text comes from the template
    Fallback { reason: String },
}

/// Always yields a narrative: one attempt with the configured provider,
/// template text on any failure.
pub struct NarrativeService {
    provider: Result<Box<dyn NarrativeProvider>, ProviderError>,
    fallback: TemplateNarrativeProvider,
}

impl NarrativeService {
    pub fn new(provider: Box<dyn NarrativeProvider>, questionnaire: &Questionnaire) -> Self {
        Self {
            provider: Ok(provider),
            fallback: TemplateNarrativeProvider::new(questionnaire.clone()),
        }
    }

    /// Build from configuration. Setup failures (e.g. a missing credential)
    /// are kept and reported as the fallback reason on every narration.
    pub fn from_config(config: &NarrativeConfig, questionnaire: &Questionnaire) -> Self {
        let provider = build_narrative_provider(config, questionnaire);
        if let Err(e) = &provider {
            debug!(error = %e, "narrative provider unavailable, template will be used");
        }
        Self {
            provider,
            fallback: TemplateNarrativeProvider::new(questionnaire.clone()),
        }
    }

    /// Template-only service, no network
    pub fn offline(questionnaire: &Questionnaire) -> Self {
        Self::new(
            Box::new(TemplateNarrativeProvider::new(questionnaire.clone())),
            questionnaire,
        )
    }

    /// Name of the configured provider, if it could be built
    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().ok().map(|p| p.name())
    }

    pub fn narrate(&self, context: &NarrativeContext) -> Narrative {
        let attempt = match &self.provider {
            Ok(provider) => provider
                .generate(context)
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Err(ProviderError::InvalidResponse("empty narrative".to_string()))
                    } else {
                        Ok(text)
                    }
                })
                .map(|text| (text, provider.name())),
            Err(e) => Err(e.clone()),
        };

        match attempt {
            Ok((text, provider)) => {
                debug!(provider, chars = text.len(), "narrative generated");
                Narrative {
                    text,
                    source: NarrativeSource::Generated {
                        provider: provider.to_string(),
                    },
                }
            }
            Err(e) => {
                warn!(reason = %e, "narrative provider failed, using template");
                Narrative {
                    text: self.fallback.render(context),
                    source: NarrativeSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}
