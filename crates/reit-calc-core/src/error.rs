use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReitCalcError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ReitCalcError {
    /// True for errors caused by the caller's parameters rather than the engine.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReitCalcError::InvalidInput { .. } | ReitCalcError::InsufficientData(_)
        )
    }
}

impl From<serde_json::Error> for ReitCalcError {
    fn from(e: serde_json::Error) -> Self {
        ReitCalcError::SerializationError(e.to_string())
    }
}
