use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Chart rendering error: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PipelineError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PipelineError::Render(err.to_string())
    }
}

/// Result of a public pipeline operation.
///
/// Absence of input data is a routine condition, not an error, and processing
/// failures are terminal for the single attempt. Neither is ever propagated
/// to the caller as a panic or an `Err`; callers branch on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation completed and produced a value.
    Success(T),
    /// No input file was available; nothing was written.
    Empty,
    /// The operation was attempted and failed with the given reason.
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Consumes the outcome, returning the success value if there is one.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}
