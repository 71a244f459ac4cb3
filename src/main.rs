use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use similarity_catalog_server::catalog::CsvTrackLoader;
use similarity_catalog_server::config;
use similarity_catalog_server::enrichment::{
    EnrichmentGateway, NoOpEnrichmentGateway, SpotifyClient,
};
use similarity_catalog_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use similarity_catalog_server::similarity::SimilarityService;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the CSV dataset of tracks. Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub dataset_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of content in the cache in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Timeout in seconds for each enrichment request.
    #[clap(long, default_value_t = 10)]
    pub enrichment_timeout_sec: u64,

    /// Number of similar tracks returned when the request doesn't say.
    #[clap(long, default_value_t = 50)]
    pub default_top_n: i64,

    /// Spotify application client id. Enrichment is disabled without it.
    #[clap(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify application client secret.
    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            dataset_path: args.dataset_path.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            frontend_dir_path: args.frontend_dir_path.clone(),
            enrichment_timeout_sec: args.enrichment_timeout_sec,
            default_top_n: args.default_top_n,
            spotify_client_id: args.spotify_client_id.clone(),
            spotify_client_secret: args.spotify_client_secret.clone(),
        }
    }
}

fn make_gateway(app_config: &config::AppConfig) -> Result<Arc<dyn EnrichmentGateway>> {
    match &app_config.spotify {
        Some(spotify) => {
            info!("Enriching tracks from {}", spotify.api_base_url);
            let client = SpotifyClient::new(
                spotify.credentials.clone(),
                &spotify.accounts_base_url,
                &spotify.api_base_url,
                app_config.enrichment_timeout(),
            )
            .context("Failed to create Spotify client")?;
            Ok(Arc::new(client))
        }
        None => {
            info!("No Spotify credentials configured, enrichment disabled");
            Ok(Arc::new(NoOpEnrichmentGateway))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  dataset_path: {:?}", app_config.dataset_path);
    info!("  port: {}", app_config.port);
    info!("  logging_level: {}", app_config.logging_level);
    info!("  enrichment_timeout_sec: {}", app_config.enrichment_timeout_sec);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let loader = Arc::new(CsvTrackLoader::new(&app_config.dataset_path));
    let gateway = make_gateway(&app_config)?;
    let service = Arc::new(SimilarityService::new(
        loader,
        gateway,
        app_config.enrichment_timeout(),
    ));

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        content_cache_age_sec: app_config.content_cache_age_sec,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        default_top_n: app_config.default_top_n,
    };

    tokio::select! {
        result = run_server(server_config, service, app_config.metrics_port) => {
            info!("Server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
