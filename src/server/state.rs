use axum::extract::FromRef;
use chrono::{DateTime, Utc};

use crate::similarity::SimilarityService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSimilarityService = Arc<SimilarityService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
    pub service: GuardedSimilarityService,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, service: GuardedSimilarityService) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            started_at: Utc::now(),
            service,
            hash: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedSimilarityService {
    fn from_ref(input: &ServerState) -> Self {
        input.service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
