pub mod extract;
pub mod prompt;
pub mod types;

pub use extract::{classification_from_reply, error_result, is_classification_failure};
pub use prompt::{build_classification_prompt, classification_request, CLASSIFY_MAX_TOKENS};
pub use types::{ClassificationResult, ClassifyError};
