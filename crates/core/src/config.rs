//! Configuration resolution for s3up
//!
//! Three layers feed the final [`UploadConfig`]: values typed on the command
//! line, an optional `config.toml`, and the defaults baked into the flag
//! declarations. Each field is resolved on its own, so a bucket given as a
//! flag can be combined with a region read from the file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name probed next to the executable
pub const CONFIG_FILE: &str = "config.toml";

/// Default S3 endpoint
pub const DEFAULT_ENDPOINT_URL: &str = "https://s3.amazonaws.com";

/// Default region (what R2 expects)
pub const DEFAULT_REGION: &str = "auto";

/// A configurable setting, named after its command-line flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EndpointUrl,
    Region,
    AccessKey,
    SecretAccessKey,
    Bucket,
    ImgUrlPrefix,
    Directory,
    RenameFile,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::EndpointUrl,
        Field::Region,
        Field::AccessKey,
        Field::SecretAccessKey,
        Field::Bucket,
        Field::ImgUrlPrefix,
        Field::Directory,
        Field::RenameFile,
    ];

    /// Long flag spelling, e.g. `--access-key`
    pub fn flag(&self) -> &'static str {
        match self {
            Field::EndpointUrl => "--endpoint-url",
            Field::Region => "--region",
            Field::AccessKey => "--access-key",
            Field::SecretAccessKey => "--secret-access-key",
            Field::Bucket => "--bucket",
            Field::ImgUrlPrefix => "--img-url-prefix",
            Field::Directory => "--directory",
            Field::RenameFile => "--rename-file",
        }
    }
}

/// Fields whose value the user actually typed on the command line
pub type ExplicitFields = HashSet<Field>;

/// Flag values as parsed, defaults included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliFlags {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub img_url_prefix: String,
    pub directory: String,
    pub rename_file: bool,
}

impl Default for CliFlags {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket: String::new(),
            img_url_prefix: String::new(),
            directory: String::new(),
            rename_file: false,
        }
    }
}

/// On-disk configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub default: ProfileConfig,
}

/// The `[default]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub img_url_prefix: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub rename_file: Option<bool>,
}

/// Fully resolved configuration, immutable for the rest of the run
#[derive(Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub img_url_prefix: Option<String>,
    pub directory: Option<String>,
    pub rename_file: bool,
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("img_url_prefix", &self.img_url_prefix)
            .field("directory", &self.directory)
            .field("rename_file", &self.rename_file)
            .finish()
    }
}

/// Path of the config file that sits next to the running executable.
///
/// Falls back to the current directory when the executable path is unknown.
pub fn default_config_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join(CONFIG_FILE)
}

/// Load and parse a TOML configuration file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Find the config file layer for this invocation.
///
/// An explicit path must load. Otherwise `probe` is loaded only if it exists;
/// a missing probe file yields `None`.
pub fn find_config(explicit: Option<&Path>, probe: &Path) -> Result<Option<ConfigFile>> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading explicit config file");
        return load_config_file(path).map(Some);
    }

    if probe.is_file() {
        debug!(path = %probe.display(), "loading config file next to executable");
        return load_config_file(probe).map(Some);
    }

    debug!(path = %probe.display(), "no config file found, using flags only");
    Ok(None)
}

/// Merge flags, file and defaults into an [`UploadConfig`].
///
/// Explicit flags win, then non-empty file values, then whatever the flag
/// holds by default. Fails with [`Error::MissingCredentials`] if any required
/// field is still empty.
pub fn resolve(
    cli: &CliFlags,
    explicit: &ExplicitFields,
    file: Option<&ConfigFile>,
) -> Result<UploadConfig> {
    let profile = file.map(|f| &f.default);
    let layer = |field: Field, cli_value: &str, pick: fn(&ProfileConfig) -> Option<&String>| {
        if explicit.contains(&field) {
            return cli_value.to_string();
        }
        match profile.and_then(pick).filter(|v| !v.is_empty()) {
            Some(value) => {
                debug!(flag = field.flag(), "using value from config file");
                value.clone()
            }
            None => cli_value.to_string(),
        }
    };

    let endpoint_url = layer(Field::EndpointUrl, &cli.endpoint_url, |p| p.endpoint_url.as_ref());
    let region = layer(Field::Region, &cli.region, |p| p.region.as_ref());
    let access_key_id = layer(Field::AccessKey, &cli.access_key_id, |p| p.access_key_id.as_ref());
    let secret_access_key = layer(Field::SecretAccessKey, &cli.secret_access_key, |p| {
        p.secret_access_key.as_ref()
    });
    let bucket = layer(Field::Bucket, &cli.bucket, |p| p.bucket.as_ref());
    let img_url_prefix = layer(Field::ImgUrlPrefix, &cli.img_url_prefix, |p| p.img_url_prefix.as_ref());
    let directory = layer(Field::Directory, &cli.directory, |p| p.directory.as_ref());

    // A `false` in the file is indistinguishable from "not provided".
    let rename_file = if explicit.contains(&Field::RenameFile) {
        cli.rename_file
    } else {
        cli.rename_file || profile.and_then(|p| p.rename_file).unwrap_or(false)
    };

    let config = UploadConfig {
        endpoint_url,
        region,
        access_key_id,
        secret_access_key,
        bucket,
        img_url_prefix: non_empty(img_url_prefix),
        directory: non_empty(directory),
        rename_file,
    };

    validate_config(&config)?;
    debug!(?config, "configuration resolved");

    Ok(config)
}

/// Check that every required field is non-empty
pub fn validate_config(config: &UploadConfig) -> Result<()> {
    let required = [
        (Field::EndpointUrl, &config.endpoint_url),
        (Field::Region, &config.region),
        (Field::AccessKey, &config.access_key_id),
        (Field::SecretAccessKey, &config.secret_access_key),
        (Field::Bucket, &config.bucket),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.flag())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingCredentials(missing))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_full_flags() -> CliFlags {
        CliFlags {
            endpoint_url: "https://example.r2.cloudflarestorage.com".to_string(),
            region: "auto".to_string(),
            access_key_id: "cli-key".to_string(),
            secret_access_key: "cli-secret".to_string(),
            bucket: "cli-bucket".to_string(),
            ..CliFlags::default()
        }
    }

    fn parse(source: &str) -> ConfigFile {
        toml::from_str(source).unwrap()
    }

    fn explicit(fields: &[Field]) -> ExplicitFields {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_explicit_flag_beats_file() {
        let mut cli = make_full_flags();
        cli.bucket = "mybucket".to_string();
        let file = parse(
            r#"
            [default]
            bucket = "otherbucket"
            "#,
        );

        let config = resolve(&cli, &explicit(&[Field::Bucket]), Some(&file)).unwrap();
        assert_eq!(config.bucket, "mybucket");
    }

    #[test]
    fn test_file_beats_unset_flag() {
        let cli = make_full_flags();
        let file = parse(
            r#"
            [default]
            bucket = "otherbucket"
            "#,
        );

        let config = resolve(&cli, &ExplicitFields::new(), Some(&file)).unwrap();
        assert_eq!(config.bucket, "otherbucket");
    }

    #[test]
    fn test_default_stands_when_nobody_sets_it() {
        let cli = CliFlags {
            access_key_id: "k".to_string(),
            secret_access_key: "s".to_string(),
            bucket: "b".to_string(),
            ..CliFlags::default()
        };
        let file = parse("[default]\n");

        let config = resolve(&cli, &ExplicitFields::new(), Some(&file)).unwrap();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_fields_resolve_independently() {
        let cli = CliFlags {
            bucket: "flag-bucket".to_string(),
            ..CliFlags::default()
        };
        let file = parse(
            r#"
            [default]
            region = "eu-west-1"
            access_key_id = "file-key"
            secret_access_key = "file-secret"
            bucket = "file-bucket"
            "#,
        );

        let config = resolve(&cli, &explicit(&[Field::Bucket]), Some(&file)).unwrap();
        assert_eq!(config.bucket, "flag-bucket");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.access_key_id, "file-key");
        assert_eq!(config.secret_access_key, "file-secret");
    }

    #[test]
    fn test_empty_file_value_is_not_provided() {
        let cli = make_full_flags();
        let file = parse(
            r#"
            [default]
            bucket = ""
            directory = ""
            "#,
        );

        let config = resolve(&cli, &ExplicitFields::new(), Some(&file)).unwrap();
        assert_eq!(config.bucket, "cli-bucket");
        assert_eq!(config.directory, None);
    }

    #[test]
    fn test_explicit_empty_flag_still_wins() {
        let mut cli = make_full_flags();
        cli.img_url_prefix = String::new();
        let file = parse(
            r#"
            [default]
            img_url_prefix = "https://cdn.example.com"
            "#,
        );

        let config = resolve(&cli, &explicit(&[Field::ImgUrlPrefix]), Some(&file)).unwrap();
        assert_eq!(config.img_url_prefix, None);
    }

    #[test]
    fn test_rename_file_from_file() {
        let cli = make_full_flags();
        let file = parse("[default]\nrename_file = true\n");

        let config = resolve(&cli, &ExplicitFields::new(), Some(&file)).unwrap();
        assert!(config.rename_file);
    }

    #[test]
    fn test_explicit_rename_false_beats_file() {
        let cli = make_full_flags();
        let file = parse("[default]\nrename_file = true\n");

        let config = resolve(&cli, &explicit(&[Field::RenameFile]), Some(&file)).unwrap();
        assert!(!config.rename_file);
    }

    #[test]
    fn test_no_file_uses_flags() {
        let mut cli = make_full_flags();
        cli.directory = "uploads".to_string();
        cli.rename_file = true;

        let config = resolve(&cli, &ExplicitFields::new(), None).unwrap();
        assert_eq!(config.bucket, "cli-bucket");
        assert_eq!(config.directory.as_deref(), Some("uploads"));
        assert!(config.rename_file);
    }

    #[test]
    fn test_missing_credentials_without_file() {
        let cli = CliFlags {
            bucket: "b".to_string(),
            ..CliFlags::default()
        };

        match resolve(&cli, &explicit(&[Field::Bucket]), None) {
            Err(Error::MissingCredentials(missing)) => {
                assert_eq!(missing, vec!["--access-key", "--secret-access-key"]);
            }
            other => panic!("expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_credentials_with_incomplete_file() {
        let cli = CliFlags::default();
        let file = parse("[default]\nbucket = \"b\"\n");

        let result = resolve(&cli, &ExplicitFields::new(), Some(&file));
        assert!(matches!(result, Err(Error::MissingCredentials(_))));
    }

    #[test]
    fn test_explicit_empty_endpoint_is_missing() {
        let mut cli = make_full_flags();
        cli.endpoint_url = String::new();

        match resolve(&cli, &explicit(&[Field::EndpointUrl]), None) {
            Err(Error::MissingCredentials(missing)) => assert_eq!(missing, vec!["--endpoint-url"]),
            other => panic!("expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = resolve(&make_full_flags(), &ExplicitFields::new(), None).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("cli-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[default]
endpoint_url = "https://account.r2.cloudflarestorage.com"
region = "auto"
access_key_id = "key"
secret_access_key = "secret"
bucket = "images"
img_url_prefix = "https://cdn.example.com"
directory = "uploads"
rename_file = true
unknown_key = "ignored"
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.default.bucket.as_deref(), Some("images"));
        assert_eq!(config.default.directory.as_deref(), Some("uploads"));
        assert_eq!(config.default.rename_file, Some(true));
    }

    #[test]
    fn test_load_config_file_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[default\nbucket = ").unwrap();

        let result = load_config_file(file.path());
        assert!(matches!(result, Err(Error::ConfigLoad { .. })));
    }

    #[test]
    fn test_find_config_explicit_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let probe = dir.path().join(CONFIG_FILE);

        let result = find_config(Some(&missing), &probe);
        assert!(matches!(result, Err(Error::ConfigLoad { .. })));
    }

    #[test]
    fn test_find_config_probe_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let probe = dir.path().join(CONFIG_FILE);

        assert!(find_config(None, &probe).unwrap().is_none());
    }

    #[test]
    fn test_find_config_probe_present() {
        let dir = tempfile::tempdir().unwrap();
        let probe = dir.path().join(CONFIG_FILE);
        fs::write(&probe, "[default]\nregion = \"us-east-1\"\n").unwrap();

        let config = find_config(None, &probe).unwrap().unwrap();
        assert_eq!(config.default.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_find_config_explicit_skips_probe() {
        let dir = tempfile::tempdir().unwrap();
        let probe = dir.path().join(CONFIG_FILE);
        fs::write(&probe, "[default]\nregion = \"probe\"\n").unwrap();
        let explicit_path = dir.path().join("explicit.toml");
        fs::write(&explicit_path, "[default]\nregion = \"explicit\"\n").unwrap();

        let config = find_config(Some(&explicit_path), &probe).unwrap().unwrap();
        assert_eq!(config.default.region.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with(CONFIG_FILE));
    }
}
