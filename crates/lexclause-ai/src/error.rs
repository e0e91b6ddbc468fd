use lexclause_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Empty text provided")]
    EmptyInput,

    #[error("No clauses detected")]
    NoClauses,

    /// The model call itself failed. Not recovered locally.
    #[error(transparent)]
    Service(#[from] LlmError),
}

impl ClassifyError {
    /// True when the caller supplied no usable text.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::NoClauses)
    }
}
