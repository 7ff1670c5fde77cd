//! Visitor check-in and status transition endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::visitor::{
        CheckinReceipt, MessageResponse, SubmitCheckin, UpdateStatus, Visitor, VisitorStatus,
    },
    AppState,
};

use super::ValidatedJson;

/// Submit the public check-in form
#[utoipa::path(
    post,
    path = "/submit_checkin",
    tag = "checkins",
    request_body = SubmitCheckin,
    responses(
        (status = 200, description = "Check-in recorded as pending", body = CheckinReceipt),
        (status = 400, description = "Missing name or purpose", body = crate::error::ErrorResponse),
        (status = 500, description = "Record store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_checkin(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<SubmitCheckin>,
) -> AppResult<Json<CheckinReceipt>> {
    let visitor = state.services.visitors.submit(&data).await?;
    Ok(Json(CheckinReceipt {
        message: "Check-in submitted successfully".to_string(),
        status: visitor.status,
        id: visitor.id,
    }))
}

/// List all check-ins
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "checkins",
    responses(
        (status = 200, description = "All visitor records", body = Vec<Visitor>)
    )
)]
pub async fn list_visitors(State(state): State<AppState>) -> AppResult<Json<Vec<Visitor>>> {
    let visitors = state.services.visitors.list().await?;
    Ok(Json(visitors))
}

/// Approve a visitor
#[utoipa::path(
    post,
    path = "/approve/{visitor_id}",
    tag = "checkins",
    params(("visitor_id" = String, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor approved", body = MessageResponse),
        (status = 500, description = "Unknown visitor or store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_visitor(
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .visitors
        .set_status(&visitor_id, VisitorStatus::Approved)
        .await?;
    Ok(Json(MessageResponse::new("Visitor approved.")))
}

/// Reject a visitor
#[utoipa::path(
    post,
    path = "/reject/{visitor_id}",
    tag = "checkins",
    params(("visitor_id" = String, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor rejected", body = MessageResponse),
        (status = 500, description = "Unknown visitor or store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_visitor(
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .visitors
        .set_status(&visitor_id, VisitorStatus::Rejected)
        .await?;
    Ok(Json(MessageResponse::new("Visitor rejected.")))
}

/// Approve or reject a visitor, target status in the body
#[utoipa::path(
    post,
    path = "/update_status",
    tag = "checkins",
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Missing id or status not approved/rejected", body = crate::error::ErrorResponse),
        (status = 500, description = "Unknown visitor or store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<UpdateStatus>,
) -> AppResult<Json<MessageResponse>> {
    let status: VisitorStatus = data
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid request".to_string()))?;

    state
        .services
        .visitors
        .set_status(&data.visitor_id, status)
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "Visitor {} successfully",
        status
    ))))
}
