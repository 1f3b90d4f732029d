//! OpenAPI schema definitions for domain types.
//!
//! The domain error type does not derive `ToSchema`; these wrappers describe
//! its wire shape for the generated document. Request and response bodies
//! for individual endpoints live next to their handlers.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required field is missing or malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The referenced user, contact, location or trip does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Duplicate username, email or location, or a second active trip.
    #[schema(rename = "conflict")]
    Conflict,
    /// The trip is cancelled or complete and cannot change.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// The user has no emergency contacts to alert.
    #[schema(rename = "no_contacts")]
    NoContacts,
    /// Storage or another dependency is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "a trip is already in progress for this user")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
