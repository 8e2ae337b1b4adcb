use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlainreadError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rewrite provider error: {0:#}")]
    Provider(anyhow::Error),

    #[error("Embedding error: {0:#}")]
    Embedding(anyhow::Error),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlainreadError {
    /// Failures of an external collaborator, as opposed to bad input or setup.
    pub fn is_upstream(&self) -> bool {
        matches!(self, PlainreadError::Provider(_) | PlainreadError::Embedding(_))
    }
}
