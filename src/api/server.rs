//! HTTP server implementation for the todo API

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::error::Result;
use crate::core::{AppState, ConfiguredAppState};
use crate::storage::StorageImpl;

/// Creates the application router with all routes and middleware
pub fn create_app<S: StorageImpl>(app_state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    let mut router = Router::new()
        // Todo routes
        .route(
            "/todos",
            get(handlers::list_todos::<S>)
                .post(handlers::create_todo::<S>)
                .delete(handlers::delete_todos::<S>),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo::<S>)
                .put(handlers::update_todo::<S>)
                .patch(handlers::update_todo::<S>)
                .delete(handlers::delete_todo::<S>),
        )
        // System routes
        .route("/health", get(handlers::health_check::<S>))
        .route("/info", get(handlers::system_info::<S>));

    if app_state.config.metrics.enabled {
        router = router.route("/metrics", get(handlers::metrics::<S>));
    }

    let request_timeout = app_state.config.server.request_timeout;

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(cors),
        )
        .with_state(app_state)
}

/// Serve `app` on `addr` until `shutdown` resolves
async fn serve_app<F>(addr: SocketAddr, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", listener.local_addr()?);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    info!("Server stopped");
    Ok(())
}

/// Start the HTTP server with the configured AppState
pub async fn start_api_server<F>(configured_app_state: ConfiguredAppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let http_addr = configured_app_state.http_addr();
    info!("Starting {} v{} on {}", crate::NAME, crate::VERSION, http_addr);

    match configured_app_state {
        ConfiguredAppState::Memory { app_state } => {
            info!("Starting server with MemoryStore backend");
            serve_app(http_addr, create_app(app_state), shutdown).await
        }
    }
}
