use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfDeckError {
    #[error("Failed to load PDF: {0}")]
    LoadError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}
