mod file_config;

pub use file_config::{FileConfig, SpotifyConfig};

use crate::enrichment::spotify::{DEFAULT_ACCOUNTS_BASE_URL, DEFAULT_API_BASE_URL};
use crate::enrichment::SpotifyCredentials;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dataset_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub enrichment_timeout_sec: u64,
    pub default_top_n: i64,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub enrichment_timeout_sec: u64,
    pub default_top_n: i64,

    // Enrichment is disabled when no credentials are configured
    pub spotify: Option<SpotifySettings>,
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub credentials: SpotifyCredentials,
    pub accounts_base_url: String,
    pub api_base_url: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dataset_path = file
            .dataset_path
            .map(PathBuf::from)
            .or_else(|| cli.dataset_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "dataset_path must be specified via --dataset-path or in config file"
                )
            })?;

        if !dataset_path.exists() {
            bail!("Dataset file does not exist: {:?}", dataset_path);
        }
        if !dataset_path.is_file() {
            bail!("dataset_path is not a file: {:?}", dataset_path);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let enrichment_timeout_sec = file
            .enrichment_timeout_sec
            .unwrap_or(cli.enrichment_timeout_sec);
        let default_top_n = file.default_top_n.unwrap_or(cli.default_top_n);

        // Spotify settings - TOML [spotify] section takes precedence over CLI/env
        let spotify_file = file.spotify.unwrap_or_default();
        let client_id = spotify_file
            .client_id
            .or_else(|| cli.spotify_client_id.clone());
        let client_secret = spotify_file
            .client_secret
            .or_else(|| cli.spotify_client_secret.clone());
        let spotify = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(SpotifySettings {
                credentials: SpotifyCredentials {
                    client_id,
                    client_secret,
                },
                accounts_base_url: spotify_file
                    .accounts_base_url
                    .unwrap_or_else(|| DEFAULT_ACCOUNTS_BASE_URL.to_string()),
                api_base_url: spotify_file
                    .api_base_url
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            }),
            (None, None) => None,
            _ => bail!("Both Spotify client id and client secret must be provided together"),
        };

        Ok(Self {
            dataset_path,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            enrichment_timeout_sec,
            default_top_n,
            spotify,
        })
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_sec)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
