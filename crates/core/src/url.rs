//! Public URL formatting

use crate::config::UploadConfig;

/// Public URL of an object whose URL path is `url_path`.
///
/// `img_url_prefix` replaces the `<endpoint>/<bucket>` base when set.
pub fn public_url(config: &UploadConfig, url_path: &str) -> String {
    match config.img_url_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{}/{}", prefix, url_path),
        _ => format!("{}/{}/{}", config.endpoint_url, config.bucket, url_path),
    }
}
