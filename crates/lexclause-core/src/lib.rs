pub mod config;
pub mod record;

pub use config::{ClassifierConfig, ConfigError, ModelType, RecoveryLimits, Settings};
pub use record::{ClassificationOutcome, ClauseRecord, ConfidenceLevel, OutcomeMetadata};
