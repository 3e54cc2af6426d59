#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown target unit: {0}")]
    UnknownTargetUnit(String),

    #[error("Unknown processor type: {0}")]
    UnknownProcessor(String),

    #[error("Processor type already registered: {0}")]
    DuplicateProcessor(String),

    #[error("Failed to send event to pipeline")]
    PipelineSend,

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Errors that keep a processor from being brought online.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::InvalidPattern { .. } | AppError::UnknownTargetUnit(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
