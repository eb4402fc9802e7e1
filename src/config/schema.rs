//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::questionnaire::Questionnaire;
use crate::reporter::ReportFormat;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Which narrative provider to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Local rule-based text, no network
    #[default]
    Template,
    /// Anthropic Messages API
    Anthropic,
    /// Any `/v1/chat/completions` endpoint
    OpenaiCompatible,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "template" | "offline" => Some(Self::Template),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "openai-compatible" | "openai" => Some(Self::OpenaiCompatible),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Anthropic => "anthropic",
            Self::OpenaiCompatible => "openai-compatible",
        }
    }

    /// Environment variable holding the credential, if the provider needs one
    pub fn default_api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Template => None,
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenaiCompatible => Some("OPENAI_API_KEY"),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Template => "",
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenaiCompatible => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Template => "",
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
            Self::OpenaiCompatible => "https://api.openai.com",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative generation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeConfig {
    /// Provider to call. Default: template
    #[serde(default)]
    pub provider: Option<ProviderKind>,

    /// Model identifier sent to the provider
    #[serde(default)]
    pub model: Option<String>,

    /// Endpoint override (e.g. a local OpenAI-compatible server)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds (1-120). Default: 20
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl NarrativeConfig {
    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider().default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider().default_base_url())
    }

    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider().default_api_key_env())
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    fn merge_from(&mut self, base: NarrativeConfig) {
        if self.provider.is_none() {
            self.provider = base.provider;
        }
        if self.model.is_none() {
            self.model = base.model;
        }
        if self.base_url.is_none() {
            self.base_url = base.base_url;
        }
        if self.api_key_env.is_none() {
            self.api_key_env = base.api_key_env;
        }
        if self.timeout_secs.is_none() {
            self.timeout_secs = base.timeout_secs;
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Format used when `--report` is given without `--format` and the
    /// extension says nothing
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

/// Root config structure for .linaresrc.json
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum global index (exit 1 if below). Default: none
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Custom questionnaire replacing the built-in one
    #[serde(default)]
    pub questionnaire: Option<Questionnaire>,

    #[serde(default)]
    pub narrative: NarrativeConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>, offline: bool) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if offline {
            self.narrative.provider = Some(ProviderKind::Template);
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        // A questionnaire is replaced as a whole, never merged per dimension
        if self.questionnaire.is_none() {
            self.questionnaire = base.questionnaire;
        }
        self.narrative.merge_from(base.narrative);
        if self.report.format.is_none() {
            self.report.format = base.report.format;
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(threshold) = self.threshold {
            if !(1.0..=5.0).contains(&threshold) {
                anyhow::bail!("threshold {} is outside the 1-5 scale", threshold);
            }
        }
        if let Some(secs) = self.narrative.timeout_secs {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                anyhow::bail!(
                    "narrative.timeoutSecs {} is outside 1-{}",
                    secs,
                    MAX_TIMEOUT_SECS
                );
            }
        }
        Ok(())
    }

    /// The questionnaire to score against: custom if configured, else built-in
    pub fn questionnaire(&self) -> Questionnaire {
        self.questionnaire.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.threshold, None);
        assert_eq!(config.narrative.provider(), ProviderKind::Template);
        assert_eq!(config.narrative.timeout_secs(), 20);
        assert_eq!(config.narrative.api_key_env(), None);
        assert_eq!(config.questionnaire(), Questionnaire::builtin());
    }

    #[test]
    fn test_provider_defaults_follow_kind() {
        let config: Config =
            serde_json::from_str(r#"{ "narrative": { "provider": "anthropic" } }"#).unwrap();
        assert_eq!(config.narrative.api_key_env(), Some("ANTHROPIC_API_KEY"));
        assert_eq!(
            config.narrative.base_url(),
            "https://api.anthropic.com/v1/messages"
        );

        let config: Config = serde_json::from_str(
            r#"{ "narrative": { "provider": "openai-compatible", "apiKeyEnv": "LOCAL_KEY",
                 "baseUrl": "http://localhost:11434", "model": "llama3" } }"#,
        )
        .unwrap();
        assert_eq!(config.narrative.provider(), ProviderKind::OpenaiCompatible);
        assert_eq!(config.narrative.api_key_env(), Some("LOCAL_KEY"));
        assert_eq!(config.narrative.model(), "llama3");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let parsed: Result<Config, _> =
            serde_json::from_str(r#"{ "narrative": { "provider": "gemini" } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let config: Config = serde_json::from_str(
            r#"{ "threshold": 2.0, "narrative": { "provider": "anthropic" } }"#,
        )
        .unwrap();
        let merged = config.clone().merge_with_cli(Some(3.5), false);
        assert_eq!(merged.threshold, Some(3.5));
        assert_eq!(merged.narrative.provider(), ProviderKind::Anthropic);

        let offline = config.merge_with_cli(None, true);
        assert_eq!(offline.threshold, Some(2.0));
        assert_eq!(offline.narrative.provider(), ProviderKind::Template);
    }

    #[test]
    fn test_merge_from_keeps_child_values() {
        let mut child: Config = serde_json::from_str(
            r#"{ "narrative": { "model": "child-model" }, "report": { "format": "html" } }"#,
        )
        .unwrap();
        let base: Config = serde_json::from_str(
            r#"{ "threshold": 2.5,
                 "narrative": { "provider": "anthropic", "model": "base-model", "timeoutSecs": 30 },
                 "report": { "format": "text" } }"#,
        )
        .unwrap();
        child.merge_from(base);
        assert_eq!(child.threshold, Some(2.5));
        assert_eq!(child.narrative.provider(), ProviderKind::Anthropic);
        assert_eq!(child.narrative.model(), "child-model");
        assert_eq!(child.narrative.timeout_secs(), 30);
        assert_eq!(child.report.format, Some(ReportFormat::Html));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.narrative.timeout_secs = Some(0);
        assert!(config.validate().is_err());
        config.narrative.timeout_secs = Some(121);
        assert!(config.validate().is_err());
        config.narrative.timeout_secs = Some(120);
        assert!(config.validate().is_ok());

        config.threshold = Some(6.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(ProviderKind::parse("Claude"), Some(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenaiCompatible));
        assert_eq!(ProviderKind::parse("offline"), Some(ProviderKind::Template));
        assert_eq!(ProviderKind::parse("gemini"), None);
    }
}
