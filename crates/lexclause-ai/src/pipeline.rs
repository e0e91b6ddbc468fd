//! Pipeline entry point.

use std::sync::Arc;

use lexclause_core::{ClassificationOutcome, ClassifierConfig, OutcomeMetadata};
use lexclause_llm::{CompletionClient, CompletionRequest};
use tracing::{debug, error, info, warn};

use crate::calibrate::calibrate;
use crate::interpret::{Interpretation, interpret};
use crate::normalize::clean_text;
use crate::prompt::{SYSTEM_PROMPT, build_classification_prompt};
use crate::segment::{SentenceSplitter, default_splitter, segment};
use crate::summary::summarize_document;
use crate::ClassifyError;

/// Per-request overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    pub model: Option<String>,
    /// `None` or an empty list selects the configured default categories.
    pub clause_types: Option<Vec<String>>,
    pub temperature: Option<f32>,
}

/// Request-scoped clause classifier. Holds no mutable state; one instance can
/// serve concurrent requests.
pub struct Classifier {
    client: Arc<dyn CompletionClient>,
    config: ClassifierConfig,
    splitter: Box<dyn SentenceSplitter>,
}

impl Classifier {
    pub fn new(client: Arc<dyn CompletionClient>, config: ClassifierConfig) -> Self {
        Self {
            client,
            config,
            splitter: default_splitter(),
        }
    }

    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_supported_model(&self, model: &str) -> bool {
        self.config.is_supported_model(model)
    }

    /// Normalise and segment `text` into clause candidates.
    pub fn clauses(&self, text: &str) -> Vec<String> {
        segment(&clean_text(text), self.splitter.as_ref())
    }

    /// Classify every clause in `text`.
    ///
    /// Malformed model output never fails the call; see [`interpret`]. Missing
    /// input and service failures are returned as errors.
    pub async fn classify(
        &self,
        text: &str,
        options: &ClassifyOptions,
    ) -> Result<ClassificationOutcome, ClassifyError> {
        if text.trim().is_empty() {
            warn!("empty text provided for classification");
            return Err(ClassifyError::EmptyInput);
        }

        let clause_types = match &options.clause_types {
            Some(types) if !types.is_empty() => {
                debug!(?types, "using custom clause types");
                types.clone()
            }
            _ => {
                debug!(types = ?self.config.clause_types, "using default clause types");
                self.config.clause_types.clone()
            }
        };
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());

        let clauses = self.clauses(text);
        if clauses.is_empty() {
            warn!("no clauses detected in input");
            return Err(ClassifyError::NoClauses);
        }

        let request = CompletionRequest {
            model: model.clone(),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            user_prompt: build_classification_prompt(&clauses, &clause_types),
            temperature: options.temperature.unwrap_or(self.config.temperature),
            max_tokens: self.config.max_tokens,
            json_mode: true,
        };

        info!(model = %model, clauses = clauses.len(), "classifying clauses");
        let completion = self.client.complete(&request).await.map_err(|e| {
            error!(error = %e, model = %model, "classification service call failed");
            e
        })?;

        let Interpretation {
            mut records,
            source,
        } = interpret(&completion.text, text, self.config.limits);
        calibrate(&mut records);
        let document_summary = summarize_document(&records);

        info!(
            records = records.len(),
            source = source.as_str(),
            "classification complete"
        );

        Ok(ClassificationOutcome::success(
            records,
            document_summary,
            OutcomeMetadata {
                model,
                clause_count: clauses.len(),
                clause_types,
            },
        ))
    }
}
