//! Feed client error types.

/// Errors from the TRIAS feed client.
///
/// All of these are per-stop-point, per-cycle failures: the aggregator logs
/// them and carries on with the remaining stop points.
#[derive(Debug, thiserror::Error)]
pub enum TriasError {
    /// HTTP request failed (network error, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint returned an error status.
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not a well-formed TRIAS document.
    #[error("XML parse error: {message}")]
    Xml { message: String },

    /// Reading mock feed data from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
