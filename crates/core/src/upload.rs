//! Single-file upload: naming, store write and resulting URL

use crate::config::UploadConfig;
use crate::content_type::detect_content_type;
use crate::error::{Error, Result};
use crate::naming::{base_name, derive_filename, storage_key, url_path};
use crate::store::ObjectStore;
use crate::url::public_url;
use std::path::Path;
use tracing::info;

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub key: String,
    pub content_type: String,
    pub url: String,
}

/// Fail early if the local file is missing
pub fn ensure_input_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::InputFileNotFound(path.to_path_buf()))
    }
}

/// Upload `path` according to `config`.
///
/// `timestamp` (unix seconds) names the object when renaming is enabled.
pub async fn upload_file(
    store: &dyn ObjectStore,
    config: &UploadConfig,
    path: &Path,
    timestamp: i64,
) -> Result<UploadReceipt> {
    ensure_input_file(path)?;

    let filename = derive_filename(&base_name(path), config.rename_file, timestamp);
    let directory = config.directory.as_deref();
    let key = storage_key(&filename, directory);
    let content_type = detect_content_type(path);

    let body = tokio::fs::read(path).await?;
    info!(
        file = %path.display(),
        bucket = %config.bucket,
        key = %key,
        content_type = %content_type,
        size = body.len(),
        "uploading file"
    );

    store.put(&config.bucket, &key, body, &content_type).await?;

    let url = public_url(config, &url_path(&filename, directory));
    info!(url = %url, "upload complete");

    Ok(UploadReceipt {
        key,
        content_type,
        url,
    })
}
