//! Clause classification pipeline: normalise, segment, prompt, call, interpret,
//! calibrate, summarise.

pub mod calibrate;
mod error;
pub mod interpret;
pub mod normalize;
mod pipeline;
pub mod prompt;
pub mod segment;
pub mod summary;

pub use error::ClassifyError;
pub use interpret::{Interpretation, RecoverySource, interpret};
pub use pipeline::{Classifier, ClassifyOptions};
pub use segment::{RegexSplitter, SentenceSplitter, default_splitter};
#[cfg(feature = "unicode")]
pub use segment::UnicodeSplitter;
