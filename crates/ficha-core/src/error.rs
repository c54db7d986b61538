use std::path::PathBuf;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or querying reference data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A catalog or character file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A catalog or character document is not valid JSON for its type.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// A label did not name any known attribute or category.
    #[error("unknown label: \"{0}\"")]
    UnknownLabel(String),
}
