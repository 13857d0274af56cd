//! Color table error types.

/// Errors that can occur while refreshing or loading the color table.
///
/// None of these are fatal to the board: the resolver keeps serving the
/// previous table and callers fall back on configured colors.
#[derive(Debug, thiserror::Error)]
pub enum ColorTableError {
    /// Download of the reference table failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Source returned an error status.
    #[error("color table source returned status {status}")]
    Status { status: u16 },

    /// Reading or writing the local table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table contents were not valid CSV with the expected columns.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}
