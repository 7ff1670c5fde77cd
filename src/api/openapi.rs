//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{checkins, health, qr};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Check-In API",
        version = "0.1.0",
        description = "Visitor check-in submissions, admin approval and QR code links"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Check-ins
        checkins::submit_checkin,
        checkins::list_visitors,
        checkins::approve_visitor,
        checkins::reject_visitor,
        checkins::update_status,
        // QR
        qr::generate_qr,
    ),
    components(
        schemas(
            crate::models::visitor::Visitor,
            crate::models::visitor::VisitorStatus,
            crate::models::visitor::SubmitCheckin,
            crate::models::visitor::CheckinReceipt,
            crate::models::visitor::UpdateStatus,
            crate::models::visitor::MessageResponse,
            qr::QrCodeResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "checkins", description = "Visitor check-ins and admin decisions"),
        (name = "qr", description = "QR code links to the check-in form")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_endpoints() {
        let doc = ApiDoc::openapi();
        for path in ["/submit_checkin", "/update_status", "/approve/{visitor_id}", "/generate_qr"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
