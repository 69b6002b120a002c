//! Plinth Server
//!
//! Production server for the institutional-website content APIs:
//! - Content APIs: schema-driven CRUD for every registered resource
//! - Auth APIs: register, login
//! - Newsletter APIs: subscribe, unsubscribe, subscriber list
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PLINTH_API_PORT` | `8080` | HTTP API port |
//! | `PLINTH_METRICS_PORT` | `9090` | Metrics/health port |
//! | `PLINTH_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `PLINTH_MONGO_DB` | `plinth` | MongoDB database name |
//! | `PLINTH_BASE_URL` | `http://localhost:3000` | Public site URL for notification links |
//! | `PLINTH_JWT_SECRET` | `dev-secret-change-me` | Credential-signing secret |
//! | `PLINTH_MAIL_ENDPOINT` | - | Mail API endpoint (log-only transport when unset) |
//! | `PLINTH_MAIL_API_KEY` | - | Bearer key for the mail API |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use axum::{response::Json, routing::get, Extension, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use anyhow::Result;

use plinth_common::AppConfig;
use plinth_content::api::{
    auth_router, content_router, newsletter_router, AppState, AuthState, ContentState,
    NewsletterState, PlinthApiDoc,
};
use plinth_content::repository::{SubscriberRepository, UserRepository};
use plinth_content::service::{AuthConfig, AuthService, PasswordService};
use plinth_content::{Gateway, LifecycleEngine};
use plinth_notify::{
    HttpMailTransport, HttpMailTransportConfig, LogMailTransport, MailTransport,
    NotificationWorker, SubscriberDirectory,
};

/// Adapter exposing the subscriber repository to the notification worker.
struct RepoSubscriberDirectory {
    repo: Arc<SubscriberRepository>,
}

#[async_trait::async_trait]
impl SubscriberDirectory for RepoSubscriberDirectory {
    async fn active_emails(&self) -> Result<Vec<String>> {
        let subscribers = self.repo.find_active().await?;
        Ok(subscribers.into_iter().map(|s| s.email).collect())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Starting Plinth Server");

    let config = AppConfig::from_env();

    // Connect to MongoDB once; the gateway hands the cached connection to
    // every request afterwards.
    let gateway = Arc::new(Gateway::new(&config.mongo_url, &config.mongo_db));
    let db = gateway.ensure_connected().await?;

    // Repositories
    let subscriber_repo = Arc::new(SubscriberRepository::new(&db));
    let user_repo = Arc::new(UserRepository::new(&db));
    info!("Repositories initialized");

    // Auth services
    let auth_service = Arc::new(AuthService::new(AuthConfig {
        secret: config.jwt_secret.clone(),
        ..AuthConfig::default()
    }));
    let password_service = Arc::new(PasswordService::new());
    let app_state = AppState {
        auth_service: auth_service.clone(),
    };

    // Notification pipeline: engine -> channel -> detached worker
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

    let transport: Arc<dyn MailTransport> = match &config.mail_endpoint {
        Some(endpoint) => {
            info!("Mail transport: HTTP API at {}", endpoint);
            Arc::new(HttpMailTransport::new(HttpMailTransportConfig {
                endpoint: endpoint.clone(),
                api_key: config.mail_api_key.clone(),
                ..HttpMailTransportConfig::default()
            })?)
        }
        None => {
            info!("Mail transport: log only (PLINTH_MAIL_ENDPOINT not set)");
            Arc::new(LogMailTransport)
        }
    };
    let directory = Arc::new(RepoSubscriberDirectory {
        repo: subscriber_repo.clone(),
    });
    let worker = NotificationWorker::new(directory, transport);
    let worker_task = tokio::spawn(worker.run(event_rx));

    // Lifecycle engine
    let engine = Arc::new(
        LifecycleEngine::new(gateway.clone(), config.base_url.clone()).with_events(event_tx),
    );

    // API states
    let auth_state = AuthState {
        auth_service,
        password_service,
        user_repo,
    };
    let newsletter_state = NewsletterState { subscriber_repo };
    let content_state = ContentState { engine };

    // Static /api/auth and /api/newsletter routes take precedence over
    // the /api/:resource capture; /api/content/:resource stays as an alias.
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api/newsletter", newsletter_router(newsletter_state))
        .nest("/api/content", content_router(content_state.clone()))
        .nest("/api", content_router(content_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", PlinthApiDoc::openapi()))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let api_addr = format!("0.0.0.0:{}", config.api_port);
    info!("API server listening on http://{}", api_addr);
    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(api_listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    let metrics_addr = format!("0.0.0.0:{}", config.metrics_port);
    info!("Metrics server listening on http://{}/metrics", metrics_addr);
    let metrics_app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler));
    let metrics_listener = TcpListener::bind(&metrics_addr).await?;
    let metrics_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, metrics_app).await {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    info!("Plinth Server started");
    info!("Press Ctrl+C to shutdown");

    shutdown_signal().await;
    info!("Shutdown signal received...");

    api_task.abort();
    metrics_task.abort();
    worker_task.abort();

    info!("Plinth Server shutdown complete");
    Ok(())
}

async fn metrics_handler() -> &'static str {
    "# HELP plinth_up Server is up\n# TYPE plinth_up gauge\nplinth_up 1\n"
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "READY"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
