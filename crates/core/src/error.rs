//! Error types for s3up-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for s3up-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for s3up-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("failed to load config file {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    /// Required connection settings are still empty after resolution
    #[error(
        "All S3 credentials must be provided either via command line or config file (missing: {})",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),

    /// The local file to upload does not exist
    #[error("File {} does not exist", .0.display())]
    InputFileNotFound(PathBuf),

    /// Object store rejected or failed the upload
    #[error("upload failed: {0}")]
    Upload(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Generic SdkError conversion for all S3 operations
impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    fn from(err: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        Error::Upload(aws_sdk_s3::error::DisplayErrorContext(&err).to_string())
    }
}
