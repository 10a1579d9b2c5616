//! Command handler for s3up CLI

use anyhow::Result;
use s3up_core::{
    default_config_path, ensure_input_file, find_config, resolve, upload_file, CliFlags,
    ExplicitFields, S3Store,
};
use std::path::PathBuf;
use tracing::debug;

/// Everything the upload needs from the command line
#[derive(Debug)]
pub struct UploadRequest {
    pub flags: CliFlags,
    pub explicit: ExplicitFields,
    pub config_path: Option<PathBuf>,
    pub file: PathBuf,
}

/// Handle the upload: resolve configuration, upload, print the public URL
pub async fn handle_upload(request: UploadRequest) -> Result<()> {
    let probe = default_config_path();
    let file_config = find_config(request.config_path.as_deref(), &probe)?;
    let config = resolve(&request.flags, &request.explicit, file_config.as_ref())?;

    // Checked before any client is built
    ensure_input_file(&request.file)?;

    let store = S3Store::new(&config).await;
    let timestamp = chrono::Utc::now().timestamp();
    debug!(timestamp, "upload timestamp");

    let receipt = upload_file(&store, &config, &request.file, timestamp).await?;

    println!("{}", receipt.url);

    Ok(())
}
