#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("partition {name} failed: {reason}")]
    Partition { name: String, reason: String },

    #[error("document source error: {0}")]
    Source(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled,
}

impl EngineError {
    pub fn partition(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Partition {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
