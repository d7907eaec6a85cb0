use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::auth::{resolver_for, AuthResolver};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Store};
use crate::handlers::{protected, public};
use crate::services::ReviewerGenerator;

/// Everything a handler may touch, built once at start-up
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub auth: Arc<dyn AuthResolver>,
    pub reviewers: Arc<ReviewerGenerator>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let auth = resolver_for(&config.security);
        let reviewers = Arc::new(ReviewerGenerator::from_config(&config.gigachat));
        Self {
            config: Arc::new(config),
            store,
            auth,
            reviewers,
        }
    }

    pub fn with_reviewer_generator(mut self, generator: ReviewerGenerator) -> Self {
        self.reviewers = Arc::new(generator);
        self
    }
}

/// Install the global subscriber; `RUST_LOG` wins over the config default
pub fn init_tracing(config: &AppConfig) {
    let default = if config.debug {
        "daily_crm=debug,tower_http=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the store, bind and serve until Ctrl-C
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Starting {} in {:?} mode (auth: {:?})",
        config.app_name,
        config.environment,
        config.security.auth_mode
    );

    let store = DatabaseManager::open_store(&config.database)
        .await
        .context("failed to open store")?;

    let bind_addr = config.bind_addr();
    let app = router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Daily CRM listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(public::health::root))
        .route("/health", get(public::health::health))
        .route("/api/auth/login", post(public::auth::login))
        // Protected
        .merge(admin_routes())
        .merge(organization_routes())
        .merge(catalogue_routes())
        .merge(activity_routes())
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    use protected::admins;

    Router::new()
        .route("/api/admins", get(admins::list).post(admins::create))
        .route(
            "/api/admins/:id",
            get(admins::get).put(admins::update).delete(admins::delete),
        )
}

/// Departments, jobs and users: the owned part of the tree
fn organization_routes() -> Router<AppState> {
    use protected::{departments, jobs, users};

    Router::new()
        .route(
            "/api/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/api/departments/:id",
            get(departments::get)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route("/api/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/api/jobs/:id",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
}

/// Metrics and reviewers are shared by every admin
fn catalogue_routes() -> Router<AppState> {
    use protected::{metrics, reviewers};

    Router::new()
        .route("/api/metrics", get(metrics::list).post(metrics::create))
        .route(
            "/api/metrics/:id",
            get(metrics::get).put(metrics::update).delete(metrics::delete),
        )
        .route("/api/reviewers", get(reviewers::list).post(reviewers::create))
        .route("/api/reviewers/description", post(reviewers::describe))
        .route(
            "/api/reviewers/:id",
            get(reviewers::get)
                .put(reviewers::update)
                .delete(reviewers::delete),
        )
}

fn activity_routes() -> Router<AppState> {
    use protected::{statistics, tasks};

    Router::new()
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route(
            "/api/statistics",
            get(statistics::list).post(statistics::create),
        )
        .route(
            "/api/statistics/:id",
            get(statistics::get)
                .put(statistics::update)
                .delete(statistics::delete),
        )
}

/// Permissive in debug mode, otherwise limited to the configured origins
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.debug {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
