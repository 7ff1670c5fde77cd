//! API handlers and router for the check-in and admin services

pub mod checkins;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod qr;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use validator::Validate;

use crate::{
    config::ServiceRole, error::AppError, models::visitor::MessageResponse, AppState,
};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// JSON body extractor that runs `validator` checks before the handler.
///
/// Both malformed bodies and failed checks become `AppError::Validation`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid request".to_string());
            AppError::Validation(message)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Answer every `OPTIONS` request with the same allow-all CORS headers
pub async fn cors_preflight(req: Request, next: Next) -> Response {
    if req.method() != Method::OPTIONS {
        return next.run(req).await;
    }

    let mut response = Json(MessageResponse::new("CORS preflight")).into_response();
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}

/// Create the application router for the configured service role
pub fn create_router(state: AppState) -> Router {
    let role = state.config.server.role;
    let static_dir = state.config.qr.static_dir.clone();

    // Routes shared by both services
    let mut routes = Router::new()
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/admin", get(pages::admin_dashboard))
        .route("/visitors", get(checkins::list_visitors))
        .route("/approve/:visitor_id", post(checkins::approve_visitor))
        .route("/reject/:visitor_id", post(checkins::reject_visitor));

    if role == ServiceRole::Checkin {
        routes = routes
            .route("/checkin", get(pages::checkin_form))
            .route("/submit_checkin", post(checkins::submit_checkin))
            .route("/update_status", post(checkins::update_status))
            .route("/generate_qr", post(qr::generate_qr));
    }

    let mut app: Router = routes.with_state(state);

    if role == ServiceRole::Checkin {
        app = app
            .nest_service("/static", ServeDir::new(static_dir))
            .merge(openapi::create_openapi_router());
    }

    // Regular responses carry Allow-Origin; OPTIONS never reaches the CorsLayer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(cors)
        .layer(middleware::from_fn(cors_preflight))
        .layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};

    use super::test_support::{body_json, build_app, send};
    use super::*;
    use crate::{config::QrConfig, repository::memory::MemoryVisitorStore};

    #[tokio::test]
    async fn test_options_on_any_path() {
        for path in ["/", "/submit_checkin", "/approve/123", "/no/such/route"] {
            let app = build_app(
                Arc::new(MemoryVisitorStore::default()),
                ServiceRole::Checkin,
                QrConfig::default(),
            );
            let response = send(app, Method::OPTIONS, path, None).await;

            assert_eq!(response.status(), StatusCode::OK, "path {}", path);
            let headers = response.headers();
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], CORS_ALLOW_ORIGIN);
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], CORS_ALLOW_METHODS);
            assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], CORS_ALLOW_HEADERS);
            assert_eq!(body_json(response).await["message"], "CORS preflight");
        }
    }

    #[tokio::test]
    async fn test_regular_responses_allow_any_origin() {
        let app = build_app(
            Arc::new(MemoryVisitorStore::default()),
            ServiceRole::Checkin,
            QrConfig::default(),
        );
        let response = send(app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_admin_role_omits_checkin_routes() {
        for (method, path) in [
            (Method::GET, "/checkin"),
            (Method::POST, "/submit_checkin"),
            (Method::POST, "/update_status"),
            (Method::POST, "/generate_qr"),
        ] {
            let app = build_app(
                Arc::new(MemoryVisitorStore::default()),
                ServiceRole::Admin,
                QrConfig::default(),
            );
            let response = send(app, method, path, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {}", path);
        }

        let app = build_app(
            Arc::new(MemoryVisitorStore::default()),
            ServiceRole::Admin,
            QrConfig::default(),
        );
        let response = send(app, Method::GET, "/admin", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
