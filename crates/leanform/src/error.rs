#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Invalid component '{0}': expected 'name: type -- description'")]
    InvalidComponent(String),

    #[error("Not expressible as a Lean 4 type: {0}")]
    NotExpressible(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}
