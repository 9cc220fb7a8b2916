//! REST API Routes Module
//!
//! Route handlers organized by concern:
//! - Bug CRUD routes under /api/bugs
//! - Health endpoints under /api/health
//! - Root endpoint, OpenAPI document, and the catch-all 404 fallback
//!
//! The full router carries a CORS layer (configured from ApiConfig) and
//! per-request tracing.

pub mod bug;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::types::RootResponse;

// Re-export route creation functions for convenience
pub use bug::create_router as bug_router;
pub use health::create_router as health_router;

// ============================================================================
// ROOT / OPENAPI / FALLBACK HANDLERS
// ============================================================================

/// Handler for the API root.
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Bug Tracker API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/api/health".to_string(),
    })
}

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Catch-all 404 for unmatched routes.
///
/// Unlike handler errors (which serialize as `{code, message}`), the
/// fallback keeps the legacy `{success: false, error}` body shape.
async fn not_found(uri: Uri) -> impl IntoResponse {
    let err = ApiError::route_not_found(uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": err.message,
        })),
    )
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Build the complete API router.
pub fn create_api_router(db: DbClient, config: &ApiConfig) -> ApiResult<Router> {
    let cors = build_cors_layer(config)?;

    let router = Router::new()
        .route("/", get(root))
        .nest("/api/bugs", bug::create_router(db.clone()))
        .nest("/api/health", health::create_router(db))
        .route("/openapi.json", get(openapi_json))
        .fallback(not_found);

    // Add Swagger UI if the swagger-ui feature is enabled
    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    };

    Ok(router.layer(TraceLayer::new_for_http()).layer(cors))
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// With an empty origin list (dev mode), allows all origins. Credentials
/// are only honored together with a restricted origin list, since a
/// wildcard origin with credentials is rejected by browsers.
fn build_cors_layer(config: &ApiConfig) -> ApiResult<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| ApiError::internal_error(format!("Invalid CORS origin '{}': {}", o, e)))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let mut cors = cors.allow_origin(origins);
    if config.cors_allow_credentials {
        cors = cors.allow_credentials(true);
    }

    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_valid_origins() {
        let config = ApiConfig {
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            ..Default::default()
        };
        assert!(build_cors_layer(&config).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_unparseable_origin() {
        let config = ApiConfig {
            cors_origins: vec!["http://bad\norigin".to_string()],
            ..Default::default()
        };
        assert!(build_cors_layer(&config).is_err());
    }
}
