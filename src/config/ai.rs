//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// Provider every flow calls
    #[serde(default)]
    pub provider: AiProvider,

    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// OpenAI base URL (override for proxies and compatible servers)
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Anthropic base URL
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,

    /// Default model; falls back to the provider's own default when unset
    pub model: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub extract: FlowSettings,

    #[serde(default)]
    pub generate: FlowSettings,

    #[serde(default)]
    pub debug: FlowSettings,

    #[serde(default)]
    pub mcq: FlowSettings,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAI => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }
}

/// Model selection and sampling for one flow
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowSettings {
    /// Model for this flow; the provider default is used when unset
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl FlowSettings {
    fn validate(&self, flow: &'static str) -> Result<(), ValidationError> {
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidFlowSettings {
                flow,
                reason: "max_tokens must be positive",
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidFlowSettings {
                flow,
                reason: "temperature must be between 0 and 2",
            });
        }
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ValidationError::InvalidFlowSettings {
                flow,
                reason: "model must not be blank",
            });
        }
        Ok(())
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key of the selected provider, if configured
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            AiProvider::OpenAI => self.openai_api_key.as_ref(),
            AiProvider::Anthropic => self.anthropic_api_key.as_ref(),
        };
        key.map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired(match self.provider {
                AiProvider::OpenAI => "OPENAI_API_KEY",
                AiProvider::Anthropic => "ANTHROPIC_API_KEY",
            }));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        self.extract.validate("extract")?;
        self.generate.validate("generate")?;
        self.debug.validate("debug")?;
        self.mcq.validate("mcq")?;
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            anthropic_api_key: None,
            openai_base_url: default_openai_base_url(),
            anthropic_base_url: default_anthropic_base_url(),
            model: None,
            timeout_secs: default_timeout(),
            extract: FlowSettings::default(),
            generate: FlowSettings::default(),
            debug: FlowSettings::default(),
            mcq: FlowSettings::default(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_openai_key() -> AiConfig {
        AiConfig {
            openai_api_key: Some(Secret::new("sk-xxx".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::OpenAI);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.generate.max_tokens, 4096);
        assert!(config.mcq.model.is_none());
    }

    #[test]
    fn test_validation_no_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
    }

    #[test]
    fn test_selected_provider_needs_its_own_key() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            ..with_openai_key()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_valid_config() {
        let config = with_openai_key();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key(), Some("sk-xxx"));
    }

    #[test]
    fn test_flow_settings_are_checked() {
        let mut config = with_openai_key();
        config.debug.temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFlowSettings { flow: "debug", .. })
        ));
    }

    #[test]
    fn test_api_key_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", with_openai_key());
        assert!(!rendered.contains("sk-xxx"));
    }
}
