use anyhow::Result;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use color_eyre::config::HookBuilder;
use s3up_core::config::{DEFAULT_ENDPOINT_URL, DEFAULT_REGION};
use s3up_core::{CliFlags, Error, ExplicitFields, Field};
use std::path::PathBuf;

mod handlers;
mod logging;

/// s3up - upload a file to S3-compatible storage and print its public URL
#[derive(Parser, Debug)]
#[command(name = "s3up")]
#[command(version)]
#[command(about = "Upload a file to S3 or R2 and print its public URL", long_about = None)]
struct Cli {
    /// S3 endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT_URL)]
    endpoint_url: String,

    /// S3 region
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// S3 access key
    #[arg(long)]
    access_key: Option<String>,

    /// S3 secret access key
    #[arg(long)]
    secret_access_key: Option<String>,

    /// S3 bucket name
    #[arg(long)]
    bucket: Option<String>,

    /// Public URL prefix (replaces <endpoint>/<bucket> in the printed URL)
    #[arg(long)]
    img_url_prefix: Option<String>,

    /// Directory path in the bucket
    #[arg(long)]
    directory: Option<String>,

    /// Configuration file path (default: config.toml next to the executable)
    #[arg(long)]
    config: Option<String>,

    /// Rename the file to <unix-timestamp><ext>
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    rename_file: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Local file to upload
    file: PathBuf,
}

impl Cli {
    /// Flag values as held after parsing, defaults included
    fn flags(&self) -> CliFlags {
        CliFlags {
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
            access_key_id: self.access_key.clone().unwrap_or_default(),
            secret_access_key: self.secret_access_key.clone().unwrap_or_default(),
            bucket: self.bucket.clone().unwrap_or_default(),
            img_url_prefix: self.img_url_prefix.clone().unwrap_or_default(),
            directory: self.directory.clone().unwrap_or_default(),
            rename_file: self.rename_file,
        }
    }

    /// `--config` with an empty value counts as absent
    fn config_path(&self) -> Option<PathBuf> {
        self.config
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

/// Argument id of the flag behind a config field
fn arg_id(field: Field) -> &'static str {
    match field {
        Field::EndpointUrl => "endpoint_url",
        Field::Region => "region",
        Field::AccessKey => "access_key",
        Field::SecretAccessKey => "secret_access_key",
        Field::Bucket => "bucket",
        Field::ImgUrlPrefix => "img_url_prefix",
        Field::Directory => "directory",
        Field::RenameFile => "rename_file",
    }
}

/// Fields typed on the command line, as opposed to holding their default
fn explicit_fields(matches: &ArgMatches) -> ExplicitFields {
    Field::ALL
        .into_iter()
        .filter(|field| matches.value_source(arg_id(*field)) == Some(ValueSource::CommandLine))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Parse CLI arguments, keeping the matches to tell typed flags from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    logging::init_logging(cli.verbose)?;

    let request = handlers::UploadRequest {
        flags: cli.flags(),
        explicit: explicit_fields(&matches),
        config_path: cli.config_path(),
        file: cli.file.clone(),
    };

    if let Err(err) = handlers::handle_upload(request).await {
        eprintln!("Error: {:#}", err);
        if let Some(Error::MissingCredentials(_)) = err.downcast_ref::<Error>() {
            eprintln!();
            eprintln!("{}", Cli::command().render_help());
        }
        std::process::exit(1);
    }

    Ok(())
}
