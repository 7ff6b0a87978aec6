use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Feed error: {0}")]
    FeedError(String),
}
