//! s3up-core - Core library for the s3up CLI
//!
//! This library resolves layered configuration (flags, `config.toml`, defaults),
//! derives the storage key and public URL of an uploaded file, and uploads it
//! to an S3-compatible object store.

pub mod config;
pub mod content_type;
pub mod error;
pub mod naming;
pub mod store;
pub mod upload;
pub mod url;

// Re-export commonly used types
pub use config::{
    default_config_path, find_config, load_config_file, resolve, validate_config, CliFlags,
    ConfigFile, ExplicitFields, Field, ProfileConfig, UploadConfig,
};
pub use content_type::detect_content_type;
pub use error::{Error, Result};
pub use naming::{compose, derive_filename, storage_key, timestamped_filename, url_path};
pub use store::{ObjectStore, S3Store};
pub use upload::{ensure_input_file, upload_file, UploadReceipt};
pub use url::public_url;
