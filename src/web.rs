//! HTTP server: router assembly, TLS and graceful shutdown

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::WaveCastConfig;
use crate::predictor::WavePredictor;

/// Full application: `/api` routes, static files for everything else
pub fn app(config: &WaveCastConfig, predictor: Arc<WavePredictor>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        predictor,
        forecast: config.forecast.clone(),
    };

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

pub async fn run(config: &WaveCastConfig, predictor: Arc<WavePredictor>) -> Result<()> {
    let app = app(config, predictor);
    let addr = config.bind_address();

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (&config.server.tls_cert, &config.server.tls_key) {
        return serve_tls(app, &addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Web server terminated")?;

    tracing::info!("Web server stopped");
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(
    app: Router,
    addr: &str,
    cert: &std::path::Path,
    key: &std::path::Path,
) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| "Failed to load TLS certificate or key")?;
    let addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid bind address {addr}"))?;

    tracing::info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .with_context(|| "Web server terminated")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_api_is_nested() {
        let config = WaveCastConfig::default();
        let app = app(&config, Arc::new(WavePredictor::random(6)));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/variables")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_static_dir() {
        let mut config = WaveCastConfig::default();
        config.server.static_dir = "does-not-exist".to_string();
        let app = app(&config, Arc::new(WavePredictor::random(6)));
        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
