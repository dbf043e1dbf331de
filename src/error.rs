//! Error types for portpool.

use thiserror::Error;

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors a caller can see from a scan.
///
/// A port that refuses or times out is not an error; it is reported as a
/// closed outcome. Configuration problems are raised before the scan starts.
/// `Incomplete` means a worker task died mid-scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Start port is zero or greater than the end port.
    #[error("invalid port range {start}-{end}")]
    InvalidRange { start: u16, end: u16 },

    /// A `start-end` port string that could not be parsed.
    #[error("invalid port specification '{0}', expected start-end")]
    InvalidPortSpec(String),

    /// Worker pool size of zero.
    #[error("worker pool size must be at least 1")]
    NoWorkers,

    /// Request or outcome queue capacity of zero.
    #[error("queue capacity must be at least 1")]
    NoQueueCapacity,

    /// No target host given.
    #[error("no target specified")]
    EmptyTarget,

    /// Transport identifier other than `tcp`.
    #[error("unsupported protocol '{0}'")]
    UnsupportedProtocol(String),

    /// Configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The outcome stream closed before every request produced an outcome.
    #[error("scan incomplete: expected {expected} outcomes, received {received}")]
    Incomplete { expected: usize, received: usize },
}
