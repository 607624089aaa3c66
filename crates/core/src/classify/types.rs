use serde::{Deserialize, Serialize};

use crate::kind::{DeclarationKind, ParseKindError};

/// Verdict on whether a description maps to a Lean 4 declaration kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_expressible: bool,
    /// `None` whenever `is_expressible` is false.
    #[serde(rename = "lean4_type")]
    pub kind: Option<DeclarationKind>,
    /// Passed through as reported by the model, not clamped.
    pub confidence: f64,
    pub reasoning: String,
}

impl ClassificationResult {
    /// A negative verdict carrying only a diagnostic message.
    pub fn not_expressible(reasoning: impl Into<String>) -> Self {
        Self {
            is_expressible: false,
            kind: None,
            confidence: 0.0,
            reasoning: reasoning.into(),
        }
    }

    /// The kind to hand to the generator, if the verdict allows one.
    pub fn chosen_kind(&self) -> Option<DeclarationKind> {
        if self.is_expressible {
            self.kind
        } else {
            None
        }
    }
}

/// Why a model reply could not be turned into a [`ClassificationResult`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// Neither extraction strategy produced valid JSON.
    #[error("no JSON object found in response")]
    NoJsonObject,

    /// A field was present with the wrong JSON type.
    #[error("invalid field '{field}': {message}")]
    Schema { field: &'static str, message: String },

    #[error(transparent)]
    InvalidKind(#[from] ParseKindError),
}
