use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pixeldock_uploader::api::v1::ImageApiV1;
use pixeldock_uploader::commands::{health, settings as settings_cmd, upload};
use pixeldock_uploader::error::Result;
use pixeldock_uploader::models::{ClientSettings, UploadPolicy};
use pixeldock_uploader::services::{LogNotifier, UploadStore};
use pixeldock_uploader::storage::settings as settings_store;

#[derive(Parser)]
#[command(name = "pixeldock", version, about = "Upload images to a PixelDock backend")]
struct Cli {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, global = true, default_value = "pixeldock.json")]
    config: PathBuf,

    /// Backend origin, overrides settings and PIXELDOCK_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Reject overlapping uploads instead of running them concurrently
    #[arg(long, global = true)]
    single_flight: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more image files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check that the backend is up
    Health,
    /// Print the resolved settings
    Config {
        /// Write the resolved settings to the --config file
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = settings_store::load_settings(&cli.config)?;
    settings_store::apply_env_overrides(&mut settings);
    if let Some(url) = &cli.base_url {
        settings.base_url = url.clone();
    }
    if cli.single_flight {
        settings.upload_policy = UploadPolicy::SingleFlight;
    }
    Ok(settings)
}

fn build_api(settings: &ClientSettings) -> Result<ImageApiV1> {
    let api = ImageApiV1::new(settings)?;
    log::debug!("Using backend {}", api.base_url());
    Ok(api)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = resolve_settings(&cli)?;
    match &cli.command {
        Commands::Config { save } => {
            println!("{}", settings_cmd::resolved_settings(&cli.config, &settings, *save)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Upload { files } => {
            let api = build_api(&settings)?;
            let store = UploadStore::with_policy(api, LogNotifier, settings.upload_policy);
            let summary = upload::upload_files(&store, files).await;

            for (path, message) in &summary.failed {
                eprintln!("✘ {}: {}", path.display(), message);
            }
            println!(
                "Uploaded {}/{} file(s). History (most recent first):",
                summary.uploaded.len(),
                files.len()
            );
            for record in store.history() {
                println!("  {}", upload::format_record(&record));
            }
            store.close();

            Ok(if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Health => {
            let api = build_api(&settings)?;
            match health::check_health(&api).await {
                Some(status) if status.is_up() => {
                    println!(
                        "{} is {} ({})",
                        api.base_url(),
                        status.status,
                        status.service.as_deref().unwrap_or("unknown service")
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Some(status) => {
                    println!("{} reports {}", api.base_url(), status.status);
                    Ok(ExitCode::FAILURE)
                }
                None => {
                    println!("{} is unreachable", api.base_url());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
