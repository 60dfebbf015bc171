use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("{0}")]
    Credential(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("Failed to persist settings: {0}")]
    Storage(String),
}
