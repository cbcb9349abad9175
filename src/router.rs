use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::modules::health::init_health_router;
use crate::modules::schools::router::init_schools_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;
use anyhow::anyhow;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Json, Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use openschool_core::{AppError, codes};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

async fn fallback() -> AppError {
    AppError::not_found(anyhow!("The requested URL was not found on the server."))
}

async fn method_not_allowed() -> AppError {
    AppError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        codes::METHOD_NOT_ALLOWED,
        anyhow!("The method is not allowed for the requested URL."),
    )
}

/// Builds the application router.
///
/// `metrics` adds `/metrics` and the request metrics layer; pass `None` when
/// metrics are disabled.
pub fn init_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let cors = {
        let allowed_origins: Vec<HeaderValue> = state
            .cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
    };

    let mut router = Router::new()
        .nest("/schools", init_schools_router())
        .nest("/students", init_students_router())
        .nest("/health", init_health_router())
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()));

    if let Some(handle) = metrics {
        router = router
            .merge(metrics_app(handle))
            .layer(middleware::from_fn(metrics_middleware));
    }

    router
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
