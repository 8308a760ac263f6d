//! Document search API server implementation
//!
//! HTTP REST API server using Axum. Each client opens a session, uploads
//! Marathi workbooks for translation, downloads the `translated_` copies and
//! searches the translated property descriptions.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::{AppConfig, TranslationConfig};
use crate::error::DocSearchResult;
use crate::session::SessionStore;
use crate::translate::{GoogleTranslator, Translator};

/// Builds a translator for one translation request.
///
/// Called on a blocking worker thread.
pub type TranslatorFactory =
    Arc<dyn Fn(&TranslationConfig) -> DocSearchResult<Box<dyn Translator>> + Send + Sync>;

/// Factory backed by the Google web translation endpoint
pub fn google_translators() -> TranslatorFactory {
    Arc::new(|config: &TranslationConfig| {
        let translator = GoogleTranslator::new(config)?;
        Ok(Box::new(translator) as Box<dyn Translator>)
    })
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub translators: TranslatorFactory,
}

impl AppState {
    pub fn new(config: AppConfig, translators: TranslatorFactory) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            sessions: SessionStore::new(),
            translators,
        }
    }
}

/// Build the API router over `state`
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Sessions
        .route("/api/v1/sessions", post(handlers::create_session))
        .route("/api/v1/sessions/:id", delete(handlers::delete_session))
        .route("/api/v1/sessions/:id/translate", post(handlers::translate))
        .route(
            "/api/v1/sessions/:id/exports/:name",
            get(handlers::download_export),
        )
        .route("/api/v1/sessions/:id/search", post(handlers::property_search))
        // Stateless document search
        .route("/api/v1/search", post(handlers::document_search))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: AppConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "str_docsearch=info,docsearch_server=info,tower_http=info".into()),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let output_dir = config.export.output_dir.clone();
    let state = Arc::new(AppState::new(config, google_translators()));
    let app = build_router(state);

    info!("📄 STR Document Search API starting on http://{}", addr);
    info!("   Sessions: /api/v1/sessions, Search: /api/v1/search");
    info!("   Exports under {}", output_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("STR Document Search API shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocSearchError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Upper;

    impl Translator for Upper {
        fn translate(&self, text: &str, _source: &str, _target: &str) -> DocSearchResult<String> {
            Ok(text.to_uppercase())
        }
    }

    fn test_state() -> Arc<AppState> {
        let factory: TranslatorFactory =
            Arc::new(|_: &TranslationConfig| Ok(Box::new(Upper) as Box<dyn Translator>));
        Arc::new(AppState::new(AppConfig::default(), factory))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_state_defaults() {
        let state = test_state();
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(state.config.server.port, 8080);
    }

    #[test]
    fn test_factory_errors_propagate() {
        let factory: TranslatorFactory = Arc::new(|_: &TranslationConfig| {
            Err(DocSearchError::Translation("offline".to_string()))
        });
        let result = factory(&TranslationConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_reports_sessions() {
        let state = test_state();
        state.sessions.create().await;
        let app = build_router(Arc::clone(&state));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "healthy");
        assert_eq!(json["data"]["sessions"], 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = build_router(test_state());
        let id = uuid::Uuid::new_v4();

        let response = app
            .oneshot(
                Request::post(format!("/api/v1/sessions/{}/search", id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query":"flat"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Session not found"));
    }

    #[tokio::test]
    async fn test_empty_session_search_finds_nothing() {
        let state = test_state();
        let id = state.sessions.create().await;
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::post(format!("/api/v1/sessions/{}/search", id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query":"flat"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["has_results"], false);
        assert_eq!(
            json["data"]["summary"],
            "No results found for Property Description containing 'flat'."
        );
    }
}
