//! # leadctl: Lead List Distribution Service
//!
//! `leadctl` is a back-office API for call-center style teams: an operator
//! uploads a spreadsheet of leads (CSV, XLSX or XLS), the service validates
//! its columns and splits the rows evenly across five agents, and the whole
//! upload is tracked as a *batch* through its lifecycle (active, completed,
//! archived).
//!
//! ## Overview
//!
//! Every upload becomes one batch. The rows are partitioned into contiguous,
//! order-preserving slices: with `N` rows, each agent receives `N / 5`, and
//! the first `N % 5` agents in directory order receive one extra. The batch
//! record stores the distribution parameters so the split stays auditable
//! after the fact.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum) and
//! PostgreSQL holds all persistence. Handlers talk to storage through the
//! [`db::store::Store`] trait: [`db::store::PgStore`] backs the running
//! service, while tests run against [`db::store::MemoryStore`] with the same
//! semantics.
//!
//! The ingest pipeline ([`ingest`]) is a plain function chain - parse,
//! validate, distribute - with no storage access; handlers wire its output
//! into the store. Parsing runs on a blocking worker since workbook decoding
//! is CPU-bound.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use leadctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = leadctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     leadctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingest;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::db::store::{PgStore, Store};
use crate::openapi::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post, put},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{AgentId, BatchId, ListItemId};

/// Slack on top of the configured file size for multipart framing and the
/// other form fields, so the body limit never rejects a file the size check
/// would accept
const UPLOAD_BODY_OVERHEAD: u64 = 64 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

/// Get the leadctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Build the application router with all endpoints and middleware.
///
/// The upload route carries its own body limit derived from the configured
/// maximum file size; everything else uses the axum default.
pub fn build_router(state: &AppState) -> Router {
    let body_limit = state.config.uploads.max_file_size + UPLOAD_BODY_OVERHEAD;

    let upload_router = Router::new().route(
        "/lists/upload",
        post(api::handlers::lists::upload_list).layer(DefaultBodyLimit::max(body_limit as usize)),
    );

    let api_routes = Router::new()
        .merge(upload_router)
        .route("/lists/batches", get(api::handlers::batches::list_batches))
        .route(
            "/lists/batch/{batch_id}",
            get(api::handlers::lists::get_batch_items).delete(api::handlers::batches::delete_batch),
        )
        .route("/lists/batch/{batch_id}/status", put(api::handlers::batches::update_batch_status))
        .route("/lists/agent/{agent_id}", get(api::handlers::lists::get_agent_items))
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The running service: a configured router plus its database pool.
///
/// 1. **Create**: [`Application::new`] connects to PostgreSQL, runs
///    migrations and builds the router
/// 2. **Serve**: [`Application::serve`] binds the TCP port and handles
///    requests until the shutdown signal resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting lead distribution service with configuration: {:#?}", config);

        errors::set_expose_error_detail(config.expose_error_detail);

        let database_url = config
            .database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No database configured: set DATABASE_URL or database_url in the config file"))?;

        let pool = PgPool::connect(&database_url).await?;
        migrator().run(&pool).await?;

        let state = AppState::builder()
            .store(Arc::new(PgStore::new(pool.clone())) as Arc<dyn Store>)
            .config(config.clone())
            .build();
        let router = build_router(&state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Lead distribution service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;

    #[test_log::test(tokio::test)]
    async fn healthz_responds_ok() {
        let (server, _store) = create_test_app().await;
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn unknown_route_is_not_found() {
        let (server, _store) = create_test_app().await;
        server.get("/api/lists/nope").await.assert_status_not_found();
    }
}
