//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, auth_routes, doctor_routes, doctor_status_routes, upload_routes,
};
use super::middleware::{
    admin_middleware, auth_middleware, doctor_gate_middleware, rate_limit_auth_middleware,
    rate_limit_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{MAX_LICENSE_BYTES, UPLOADS_URL_PATH};

/// Multipart framing allowance on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        // Public license upload, sized for one document
        .nest(
            "/upload",
            upload_routes()
                .layer(DefaultBodyLimit::max(
                    MAX_LICENSE_BYTES + MULTIPART_OVERHEAD_BYTES,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        // Admin routes (JWT + admin role + general rate limiting)
        .nest(
            "/admin",
            admin_routes()
                .route_layer(middleware::from_fn(admin_middleware))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        )
        // Doctor routes: status lookup needs a JWT, the rest the doctor gate
        .nest(
            "/doctor",
            doctor_routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    doctor_gate_middleware,
                ))
                .merge(doctor_status_routes())
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_middleware,
                )),
        );

    let mut router = Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .nest_service(UPLOADS_URL_PATH, ServeDir::new(&state.config.upload_dir))
        // Global middleware
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.cors_allowed_origin) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

/// CORS for the SPA origin; `*` allows any origin.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origin.trim() == "*" {
        return Some(layer.allow_origin(Any));
    }

    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Invalid CORS origin, CORS disabled");
            None
        }
    }
}

/// Root endpoint
async fn root() -> &'static str {
    "HerCycle doctor verification service"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(service: &'static str, result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => {
                tracing::error!(service, error = %e, "Health check failed");
                Self {
                    status: "unhealthy",
                    error: Some("unreachable"),
                }
            }
        }
    }

    fn is_healthy(&self) -> bool {
        self.status != "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = ServiceStatus::from_result("database", state.database.ping().await);

    let redis_status = match &state.cache {
        Some(cache) => ServiceStatus::from_result("redis", cache.ping().await),
        None => ServiceStatus {
            status: "disabled",
            error: None,
        },
    };

    let all_healthy = db_status.is_healthy() && redis_status.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            redis: redis_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_wildcard_and_origin() {
        assert!(cors_layer("*").is_some());
        assert!(cors_layer("http://localhost:5173").is_some());
        assert!(cors_layer("bad\norigin").is_none());
    }

    #[test]
    fn test_unhealthy_service_hides_error_detail() {
        let status = ServiceStatus::from_result(
            "database",
            Err("connection refused: postgres://app:secret@db:5432/hercycle"),
        );
        assert!(!status.is_healthy());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["error"], "unreachable");
        assert!(!json.to_string().contains("secret"));

        let healthy = ServiceStatus::from_result::<&str>("redis", Ok(()));
        let json = serde_json::to_value(&healthy).unwrap();
        assert!(json.get("error").is_none());
    }
}
