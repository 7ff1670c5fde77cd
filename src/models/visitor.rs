//! Visitor check-in record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Approval state of a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisitorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VisitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorStatus::Pending => "pending",
            VisitorStatus::Approved => "approved",
            VisitorStatus::Rejected => "rejected",
        }
    }

    /// Whether an admin may set this status. Any decision may replace any
    /// other; only `pending` is reserved for new records.
    pub fn is_admin_decision(&self) -> bool {
        matches!(self, VisitorStatus::Approved | VisitorStatus::Rejected)
    }
}

impl std::fmt::Display for VisitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VisitorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VisitorStatus::Pending),
            "approved" => Ok(VisitorStatus::Approved),
            "rejected" => Ok(VisitorStatus::Rejected),
            _ => Err(format!("Invalid visitor status: {}", s)),
        }
    }
}

// Stored as plain text
impl sqlx::Type<Postgres> for VisitorStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for VisitorStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for VisitorStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Visitor check-in record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visitor {
    /// Assigned by the store on insert
    pub id: Uuid,
    pub name: String,
    /// Reason for the visit
    pub purpose: String,
    pub time_in: DateTime<Utc>,
    pub status: VisitorStatus,
}

/// Record to insert; `id` is left to the store
#[derive(Debug, Clone)]
pub struct NewVisitor {
    pub name: String,
    pub purpose: String,
    pub time_in: DateTime<Utc>,
    pub status: VisitorStatus,
}

/// Public check-in form submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitCheckin {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub purpose: String,
}

/// Response to a successful check-in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckinReceipt {
    pub message: String,
    pub status: VisitorStatus,
    pub id: Uuid,
}

/// Admin status change with the target in the body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatus {
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid request"))]
    pub visitor_id: String,
    /// `approved` or `rejected`
    #[serde(default)]
    pub status: String,
}

/// Generic confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
