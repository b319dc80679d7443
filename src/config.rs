use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "hf_text_processor.toml";
pub const DEFAULT_LOG_LEVEL: &str = "hf_text_processor=info";

/// Main configuration structure loaded from hf_text_processor.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub inference: InferenceConfig,
    pub models: ModelsConfig,
    pub limits: LimitsConfig,
    pub generation: GenerationConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Connection settings for the hosted inference router
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Passed as `parameters.aggregation_strategy` on token classification when set
    pub aggregation_strategy: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co".to_string(),
            timeout_ms: 60_000,
            aggregation_strategy: None,
        }
    }
}

/// Model identifiers for each step
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub summarization: String,
    pub keyphrase: String,
    pub generation: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            summarization: "facebook/bart-large-cnn".to_string(),
            keyphrase: "ml6team/keyphrase-extraction-kbir-inspec".to_string(),
            generation: "katanemo/Arch-Router-1.5B".to_string(),
        }
    }
}

/// Input prefix lengths, in characters, sent to each model
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub summary_input_chars: usize,
    pub keyphrase_input_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            summary_input_chars: 3000,
            keyphrase_input_chars: 1500,
        }
    }
}

/// Sampling parameters for question generation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 600,
            temperature: 0.5,
            top_p: 0.9,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub hf_token: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            hf_token: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            hf_token: std::env::var("HF_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Load TP_ENV_FILE if set, otherwise ./.env. A missing file is not an error
/// and variables already present in the environment are never overwritten,
/// so calling this more than once is harmless.
pub fn load_env_file() {
    if let Ok(env_path) = std::env::var("TP_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::from_path(".env");
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// `path` wins over HF_TEXT_PROCESSOR_CONFIG, which wins over "hf_text_processor.toml".
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        load_env_file();

        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var("HF_TEXT_PROCESSOR_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config file {}", config_path));
            }
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply TP_* environment overrides (env-first)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TP_BASE_URL") {
            self.inference.base_url = url;
            tracing::debug!("TP_BASE_URL env override applied");
        }
        if let Some(timeout) = std::env::var("TP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.inference.timeout_ms = timeout;
        }
        if let Ok(strategy) = std::env::var("TP_AGGREGATION_STRATEGY") {
            let strategy = strategy.trim();
            self.inference.aggregation_strategy = if strategy.is_empty() || strategy == "none" {
                None
            } else {
                Some(strategy.to_string())
            };
        }
        if let Ok(model) = std::env::var("TP_SUMMARY_MODEL") {
            self.models.summarization = model;
        }
        if let Ok(model) = std::env::var("TP_KEYPHRASE_MODEL") {
            self.models.keyphrase = model;
        }
        if let Ok(model) = std::env::var("TP_GENERATION_MODEL") {
            self.models.generation = model;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.inference.base_url.starts_with("http://")
            && !self.inference.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "Inference base URL '{}' must start with http:// or https://",
                self.inference.base_url
            );
        }
        if self.inference.timeout_ms == 0 {
            anyhow::bail!("inference.timeout_ms must be > 0");
        }
        for (name, model) in [
            ("summarization", &self.models.summarization),
            ("keyphrase", &self.models.keyphrase),
            ("generation", &self.models.generation),
        ] {
            if model.trim().is_empty() {
                anyhow::bail!("models.{} must not be empty", name);
            }
        }
        if self.limits.summary_input_chars == 0 || self.limits.keyphrase_input_chars == 0 {
            anyhow::bail!("limits.*_input_chars must be > 0");
        }
        if self.generation.max_tokens == 0 {
            anyhow::bail!("generation.max_tokens must be > 0");
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            anyhow::bail!("generation.temperature must be between 0.0 and 2.0");
        }
        if !(self.generation.top_p > 0.0 && self.generation.top_p <= 1.0) {
            anyhow::bail!("generation.top_p must be in (0.0, 1.0]");
        }
        Ok(())
    }

    /// API token, or an error naming the variable to set
    pub fn require_token(&self) -> anyhow::Result<&str> {
        self.runtime
            .hf_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Missing HF_TOKEN in environment or .env file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.keyphrase_input_chars, 1500);
        assert_eq!(config.limits.summary_input_chars, 3000);
        assert_eq!(config.generation.max_tokens, 600);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [models]
            keyphrase = "ml6team/keyphrase-extraction-distilbert-inspec"

            [generation]
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(
            config.models.keyphrase,
            "ml6team/keyphrase-extraction-distilbert-inspec"
        );
        assert_eq!(config.models.summarization, "facebook/bart-large-cnn");
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.top_p, 0.9);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.generation.top_p = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.inference.base_url = "router.huggingface.co".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.models.generation = "  ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("models.generation"));
    }

    #[test]
    fn test_require_token() {
        let mut config = Config::default();
        assert!(config.require_token().is_err());
        config.runtime.hf_token = Some("hf_abc".to_string());
        assert_eq!(config.require_token().unwrap(), "hf_abc");
    }
}
