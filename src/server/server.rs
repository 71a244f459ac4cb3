use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::catalog::MetricField;
use crate::similarity::{SimilarityError, SimilarityService};
use std::sync::Arc;
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::metrics::{metrics_handler, record_similarity_query};
use super::{http_cache, log_requests, state::*, ServerConfig};

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub started_at: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct TracksQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct SimilarQuery {
    pub top_n: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PlotQuery {
    pub x: Option<String>,
    pub y: Option<String>,
    pub top_n: Option<i64>,
}

fn error_response(err: SimilarityError) -> Response {
    match err {
        SimilarityError::NotFound(id) => {
            (StatusCode::NOT_FOUND, format!("Track {} not found", id)).into_response()
        }
        SimilarityError::DataUnavailable(err) => {
            error!("Dataset unavailable: {:#}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Track dataset is currently unavailable",
            )
                .into_response()
        }
    }
}

fn record_outcome<T>(operation: &str, start: Instant, result: &Result<T, SimilarityError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(SimilarityError::NotFound(_)) => "not_found",
        Err(SimilarityError::DataUnavailable(_)) => "data_unavailable",
    };
    record_similarity_query(operation, outcome, start.elapsed());
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        started_at: state.started_at.to_rfc3339(),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn get_tracks(
    State(service): State<GuardedSimilarityService>,
    Query(query): Query<TracksQuery>,
) -> Response {
    let page_number = query.page_number.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_number < 1 || page_size < 1 {
        return (
            StatusCode::BAD_REQUEST,
            "page_number and page_size must be at least 1",
        )
            .into_response();
    }

    let start = Instant::now();
    let result = service
        .get_tracks(page_number as usize, page_size as usize)
        .await;
    record_outcome("tracks", start, &result);
    match result {
        Ok(tracks) => Json(tracks).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_track(
    State(service): State<GuardedSimilarityService>,
    Path(id): Path<usize>,
) -> Response {
    let start = Instant::now();
    let result = service.get_track(id).await;
    record_outcome("track", start, &result);
    match result {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_similar(
    State(state): State<ServerState>,
    Path(id): Path<usize>,
    Query(query): Query<SimilarQuery>,
) -> Response {
    let top_n = query.top_n.unwrap_or(state.config.default_top_n);

    let start = Instant::now();
    let result = state.service.get_similar(id, top_n).await;
    record_outcome("similar", start, &result);
    match result {
        Ok(scored) => Json(scored).into_response(),
        Err(err) => error_response(err),
    }
}

fn parse_metric(value: Option<&str>, default: MetricField) -> Result<MetricField, Response> {
    match value {
        None => Ok(default),
        Some(name) => name
            .parse::<MetricField>()
            .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response()),
    }
}

async fn get_similar_plot(
    State(state): State<ServerState>,
    Path(id): Path<usize>,
    Query(query): Query<PlotQuery>,
) -> Response {
    let x = match parse_metric(query.x.as_deref(), MetricField::SpotifyStreams) {
        Ok(field) => field,
        Err(response) => return response,
    };
    let y = match parse_metric(query.y.as_deref(), MetricField::AllTimeRank) {
        Ok(field) => field,
        Err(response) => return response,
    };
    let top_n = query.top_n.unwrap_or(state.config.default_top_n);

    let start = Instant::now();
    let result = state.service.get_similar_plot(id, top_n, x, y).await;
    record_outcome("plot", start, &result);
    match result {
        Ok(points) => Json(points).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_metric_fields() -> impl IntoResponse {
    let names: Vec<&'static str> = MetricField::ALL.iter().map(|field| field.name()).collect();
    Json(names)
}

pub fn make_app(config: ServerConfig, service: Arc<SimilarityService>) -> Result<Router> {
    let state = ServerState::new(config.clone(), service);

    let content_routes: Router = Router::new()
        .route("/tracks", get(get_tracks))
        .route("/tracks/{id}", get(get_track))
        .route("/tracks/{id}/similar", get(get_similar))
        .route("/tracks/{id}/similar/plot", get(get_similar_plot))
        .route("/metrics/fields", get(get_metric_fields))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/v1", content_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    service: Arc<SimilarityService>,
    metrics_port: u16,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, service)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app) => {
            info!("HTTP server stopped: {:?}", result);
            Ok(result?)
        },
        result = axum::serve(metrics_listener, make_metrics_app()) => {
            info!("Metrics server stopped: {:?}", result);
            Ok(result?)
        },
    }
}
