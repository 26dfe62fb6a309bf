//! Governance and model-selection settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Default for Provider {
    fn default() -> Self {
        Self::OpenAI
    }
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Models offered by this provider; the first is the default.
    pub fn models(&self) -> &'static [Model] {
        match self {
            Self::OpenAI => &[Model::Gpt4oMini, Model::Gpt41],
            Self::Anthropic => &[Model::Claude35Sonnet, Model::Claude3Haiku],
        }
    }

    pub fn default_model(&self) -> Model {
        self.models()[0]
    }

    pub fn offers(&self, model: Model) -> bool {
        self.models().contains(&model)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "claude-3-5-sonnet")]
    Claude35Sonnet,
    #[serde(rename = "claude-3-haiku")]
    Claude3Haiku,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt41 => "gpt-4.1",
            Self::Claude35Sonnet => "claude-3-5-sonnet",
            Self::Claude3Haiku => "claude-3-haiku",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gpt-4o-mini" => Some(Self::Gpt4oMini),
            "gpt-4.1" => Some(Self::Gpt41),
            "claude-3-5-sonnet" => Some(Self::Claude35Sonnet),
            "claude-3-haiku" => Some(Self::Claude3Haiku),
            _ => None,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session governance controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GovernanceSettings {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default = "default_model")]
    pub model: Model,
    /// Changes are proposed but never executed against the document
    #[serde(default = "default_true")]
    pub dry_run: bool,
    /// Workbook content is withheld from the model where possible
    #[serde(default = "default_true")]
    pub privacy_mode: bool,
}

fn default_model() -> Model {
    Provider::default().default_model()
}

const fn default_true() -> bool {
    true
}

impl Default for GovernanceSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: default_model(),
            dry_run: true,
            privacy_mode: true,
        }
    }
}

impl GovernanceSettings {
    /// Switch provider, falling back to its default model if the current
    /// model is not offered.
    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
        if !provider.offers(self.model) {
            self.model = provider.default_model();
        }
    }

    /// Select a model of the current provider. Returns false and leaves the
    /// settings untouched if the provider does not offer it.
    pub fn set_model(&mut self, model: Model) -> bool {
        if !self.provider.offers(model) {
            return false;
        }
        self.model = model;
        true
    }

    pub fn is_consistent(&self) -> bool {
        self.provider.offers(self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GovernanceSettings::default();
        assert_eq!(settings.provider, Provider::OpenAI);
        assert_eq!(settings.model, Model::Gpt4oMini);
        assert!(settings.dry_run);
        assert!(settings.privacy_mode);
        assert!(settings.is_consistent());
    }

    #[test]
    fn test_switching_provider_resets_foreign_model() {
        let mut settings = GovernanceSettings::default();
        settings.set_provider(Provider::Anthropic);
        assert_eq!(settings.model, Model::Claude35Sonnet);

        assert!(settings.set_model(Model::Claude3Haiku));
        settings.set_provider(Provider::Anthropic);
        assert_eq!(settings.model, Model::Claude3Haiku);
    }

    #[test]
    fn test_rejects_model_of_other_provider() {
        let mut settings = GovernanceSettings::default();
        assert!(!settings.set_model(Model::Claude3Haiku));
        assert_eq!(settings.model, Model::Gpt4oMini);
    }

    #[test]
    fn test_model_serde_names() {
        let json = serde_json::to_string(&Model::Gpt41).unwrap();
        assert_eq!(json, "\"gpt-4.1\"");
        assert_eq!(Model::parse_str("CLAUDE-3-HAIKU"), Some(Model::Claude3Haiku));
    }
}
