//! QR code endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QrCodeResponse {
    pub message: String,
    /// Public URL of the stored PNG
    pub qr_code_url: String,
}

/// Generate a QR code linking to the check-in form
#[utoipa::path(
    post,
    path = "/generate_qr",
    tag = "qr",
    responses(
        (status = 200, description = "QR code stored", body = QrCodeResponse),
        (status = 500, description = "Image could not be written", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_qr(State(state): State<AppState>) -> AppResult<Json<QrCodeResponse>> {
    let link = state.services.qr.generate().await?;
    Ok(Json(QrCodeResponse {
        message: "QR code generated".to_string(),
        qr_code_url: link.url,
    }))
}
