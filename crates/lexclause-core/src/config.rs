//! Process settings and the explicit configuration value threaded into the pipeline.

use thiserror::Error;

/// The six categories used when a caller supplies none.
pub const DEFAULT_CLAUSE_TYPES: &[&str] = &[
    "Termination",
    "Confidentiality",
    "Governing Law",
    "Payment Terms",
    "Liability",
    "Intellectual Property",
];

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Models known to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    Gpt41,
    Gpt41Mini,
}

impl ModelType {
    pub const ALL: &'static [ModelType] = &[Self::Gpt41, Self::Gpt41Mini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt41 => "gpt-4.1",
            Self::Gpt41Mini => "gpt-4.1-mini-2025-04-14",
        }
    }
}

/// Thresholds used when the model's output cannot be parsed into real records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryLimits {
    /// Character width of each placeholder window over the input text.
    pub chunk_window: usize,
    /// Maximum number of placeholder windows.
    pub max_chunks: usize,
    /// Character length at which the synthetic whole-document record is truncated.
    pub truncate_at: usize,
}

impl Default for RecoveryLimits {
    fn default() -> Self {
        Self {
            chunk_window: 200,
            max_chunks: 3,
            truncate_at: 1000,
        }
    }
}

/// Classification parameters, passed explicitly to the pipeline entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub default_model: String,
    pub supported_models: Vec<String>,
    pub clause_types: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub limits: RecoveryLimits,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::with_default_model(DEFAULT_MODEL)
    }
}

impl ClassifierConfig {
    /// Defaults with a specific default model; the supported list is that model
    /// followed by every [`ModelType`], without duplicates.
    pub fn with_default_model(model: impl Into<String>) -> Self {
        let default_model = model.into();
        Self {
            supported_models: supported_models(&default_model),
            default_model,
            clause_types: DEFAULT_CLAUSE_TYPES.iter().map(|s| s.to_string()).collect(),
            temperature: 0.3,
            max_tokens: 1000,
            limits: RecoveryLimits::default(),
        }
    }

    pub fn is_supported_model(&self, model: &str) -> bool {
        self.supported_models.iter().any(|m| m == model)
    }
}

fn supported_models(default_model: &str) -> Vec<String> {
    let mut models = vec![default_model.to_string()];
    for model in ModelType::ALL {
        if !models.iter().any(|m| m == model.as_str()) {
            models.push(model.as_str().to_string());
        }
    }
    models
}

/// Settings read from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub default_model: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub default_clause_types: Vec<String>,
}

impl Settings {
    /// Load from environment variables. Does not read `.env`; binaries do that first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => parse_number("PORT", &v)?,
            None => 5000,
        };
        let default_temperature = match get("DEFAULT_TEMPERATURE") {
            Some(v) => parse_number("DEFAULT_TEMPERATURE", &v)?,
            None => 0.3,
        };
        let default_max_tokens = match get("DEFAULT_MAX_TOKENS") {
            Some(v) => parse_number("DEFAULT_MAX_TOKENS", &v)?,
            None => 1000,
        };
        let debug = match get("DEBUG") {
            Some(v) => parse_bool("DEBUG", &v)?,
            None => false,
        };
        let default_clause_types = match get("DEFAULT_CLAUSE_TYPES") {
            Some(v) => parse_list("DEFAULT_CLAUSE_TYPES", &v)?,
            None => DEFAULT_CLAUSE_TYPES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            debug,
            default_model: get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            default_temperature,
            default_max_tokens,
            default_clause_types,
        })
    }

    /// The API key, or an error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            clause_types: self.default_clause_types.clone(),
            temperature: self.default_temperature,
            max_tokens: self.default_max_tokens,
            ..ClassifierConfig::with_default_model(self.default_model.clone())
        }
    }
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}

/// Accepts a JSON array of strings or a comma-separated list.
fn parse_list(name: &'static str, value: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = value.trim();
    let items: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })?
    } else {
        trimmed.split(',').map(|s| s.trim().to_string()).collect()
    };

    let items: Vec<String> = items.into_iter().filter(|s| !s.is_empty()).collect();
    if items.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "list is empty".into(),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.port, 5000);
        assert_eq!(s.host, "0.0.0.0");
        assert!(!s.debug);
        assert_eq!(s.default_model, "gpt-4.1");
        assert_eq!(s.default_max_tokens, 1000);
        assert_eq!(s.default_clause_types.len(), 6);
        assert_eq!(s.openai_base_url, DEFAULT_BASE_URL);
        assert!(s.openai_api_key.is_none());
    }

    #[test]
    fn missing_api_key_is_reported() {
        let s = settings(&[]).unwrap();
        let err = s.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY must be set");

        let s = settings(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(s.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn clause_types_accept_json_or_commas() {
        let s = settings(&[("DEFAULT_CLAUSE_TYPES", r#"["Termination", "Liability"]"#)]).unwrap();
        assert_eq!(s.default_clause_types, vec!["Termination", "Liability"]);

        let s = settings(&[("DEFAULT_CLAUSE_TYPES", "Termination, Payment Terms,")]).unwrap();
        assert_eq!(s.default_clause_types, vec!["Termination", "Payment Terms"]);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = settings(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn invalid_debug_flag_is_rejected() {
        assert!(settings(&[("DEBUG", "True")]).unwrap().debug);
        assert!(settings(&[("DEBUG", "maybe")]).is_err());
    }

    #[test]
    fn supported_models_put_default_first_without_duplicates() {
        let config = ClassifierConfig::default();
        assert_eq!(
            config.supported_models,
            vec!["gpt-4.1", "gpt-4.1-mini-2025-04-14"]
        );

        let config = ClassifierConfig::with_default_model("gpt-4o");
        assert_eq!(config.supported_models[0], "gpt-4o");
        assert_eq!(config.supported_models.len(), 3);
        assert!(config.is_supported_model("gpt-4.1"));
        assert!(!config.is_supported_model("gpt-3"));
    }

    #[test]
    fn classifier_config_follows_settings() {
        let s = settings(&[
            ("DEFAULT_MODEL", "gpt-4.1-mini-2025-04-14"),
            ("DEFAULT_TEMPERATURE", "0.1"),
            ("DEFAULT_CLAUSE_TYPES", "Type A,Type B"),
        ])
        .unwrap();
        let config = s.classifier_config();
        assert_eq!(config.default_model, "gpt-4.1-mini-2025-04-14");
        assert_eq!(config.supported_models, vec!["gpt-4.1-mini-2025-04-14", "gpt-4.1"]);
        assert_eq!(config.clause_types, vec!["Type A", "Type B"]);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.limits, RecoveryLimits::default());
    }
}
