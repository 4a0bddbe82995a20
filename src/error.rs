use thiserror::Error;

/// Errors raised by the loading layer.
///
/// `Unavailable` means a source could not be read or parsed at all; callers
/// degrade by treating that period as absent. `MissingColumn` means the
/// source was readable but has the wrong shape, and is surfaced distinctly
/// so the two cases are never confused.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}
