use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by package readers.
///
/// Every failure is reported synchronously to the caller of the operation
/// that detected it; nothing is retried internally. `get_resource` never
/// returns [`ReaderError::FileNotFound`] — a total search miss is a normal
/// `Ok(None)` result, which is how callers tell "required file missing"
/// apart from "optional asset absent".
#[derive(Debug, Error)]
pub enum ReaderError {
    /// A directory root contains neither a package manifest nor a bundle manifest.
    #[error("'{0}' does not contain an APPX/MSIX package or bundle")]
    InvalidPackageLayout(PathBuf),

    /// The manifest file a reader was anchored to does not exist.
    #[error("manifest file '{0}' does not exist")]
    NotFound(PathBuf),

    /// A required path argument was empty.
    #[error("a non-empty relative path is required")]
    InvalidArgument,

    /// An exact-path read missed.
    #[error("file '{0}' does not exist in the package")]
    FileNotFound(PathBuf),

    /// Cooperative cancellation was observed during enumeration or resolution.
    #[error("operation cancelled")]
    Cancelled,

    /// An underlying storage error, surfaced unmodified.
    #[error("i/o failure")]
    Io(#[from] std::io::Error),
}
