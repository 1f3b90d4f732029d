//! Trip HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users/{userId}/trips
//! GET    /api/v1/trips/{tripId}
//! PATCH  /api/v1/trips/{tripId}
//! DELETE /api/v1/trips/{tripId}
//! POST   /api/v1/users/{userId}/trips/{tripId}/panic
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{DispatchReport, Error, Trip, TripId, TripPlan, TripProgress, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::USER_ID;
use crate::inbound::http::validation::{FieldName, coordinate_text, parse_id};

const TRIP_ID: FieldName = FieldName::new("tripId");

/// Trip start request. Destination address and coordinates are required;
/// the current position is optional but both axes come together.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartTripRequest {
    pub destination_name: Option<String>,
    pub destination_address: Option<String>,
    #[schema(value_type = Option<String>, example = "47.6062")]
    pub destination_latitude: Option<Value>,
    #[schema(value_type = Option<String>, example = "-122.3321")]
    pub destination_longitude: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub current_latitude: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub current_longitude: Option<Value>,
}

impl StartTripRequest {
    fn into_plan(self) -> Result<TripPlan, Error> {
        Ok(TripPlan {
            destination_name: self.destination_name,
            destination_address: self.destination_address,
            destination_latitude: coordinate_text(
                self.destination_latitude,
                FieldName::new("destinationLatitude"),
            )?,
            destination_longitude: coordinate_text(
                self.destination_longitude,
                FieldName::new("destinationLongitude"),
            )?,
            current_latitude: coordinate_text(
                self.current_latitude,
                FieldName::new("currentLatitude"),
            )?,
            current_longitude: coordinate_text(
                self.current_longitude,
                FieldName::new("currentLongitude"),
            )?,
        })
    }
}

/// Location report and/or status change for an active trip.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[schema(value_type = Option<String>)]
    pub current_latitude: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub current_longitude: Option<Value>,
    #[schema(example = "COMPLETE")]
    pub status: Option<String>,
}

impl UpdateTripRequest {
    fn into_progress(self) -> Result<TripProgress, Error> {
        Ok(TripProgress {
            current_latitude: coordinate_text(
                self.current_latitude,
                FieldName::new("currentLatitude"),
            )?,
            current_longitude: coordinate_text(
                self.current_longitude,
                FieldName::new("currentLongitude"),
            )?,
            status: self.status,
        })
    }
}

/// Trip as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub destination_name: Option<String>,
    pub destination_address: String,
    pub destination_latitude: String,
    pub destination_longitude: String,
    pub current_latitude: Option<String>,
    pub current_longitude: Option<String>,
    #[schema(example = "ONGOING")]
    pub status: String,
    pub is_tracking: bool,
    #[schema(format = "date-time")]
    pub last_update: String,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        let destination = trip.destination();
        let current = trip.current_location();
        Self {
            id: trip.id().to_string(),
            user_id: trip.user_id().to_string(),
            destination_name: destination.name.clone(),
            destination_address: destination.address.clone(),
            destination_latitude: destination.point.latitude.text().to_owned(),
            destination_longitude: destination.point.longitude.text().to_owned(),
            current_latitude: current.map(|point| point.latitude.text().to_owned()),
            current_longitude: current.map(|point| point.longitude.text().to_owned()),
            status: trip.status().to_string(),
            is_tracking: trip.is_tracking(),
            last_update: trip.last_update().to_rfc3339(),
        }
    }
}

/// A contact the panic alert could not reach.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailureBody {
    #[schema(format = "uuid")]
    pub contact_id: String,
    pub reason: String,
}

/// Per-contact outcome of a panic alert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReportBody {
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub sent: Vec<String>,
    pub failed: Vec<DeliveryFailureBody>,
}

impl From<DispatchReport> for DispatchReportBody {
    fn from(report: DispatchReport) -> Self {
        Self {
            sent: report.sent.iter().map(ToString::to_string).collect(),
            failed: report
                .failed
                .into_iter()
                .map(|failure| DeliveryFailureBody {
                    contact_id: failure.contact_id.to_string(),
                    reason: failure.reason,
                })
                .collect(),
        }
    }
}

/// Start a tracked trip. A user has at most one active trip.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/trips",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    request_body = StartTripRequest,
    responses(
        (status = 201, description = "Trip started", body = TripResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Another trip is active", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "startTrip"
)]
#[post("/users/{user_id}/trips")]
pub async fn start_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StartTripRequest>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let plan = payload.into_inner().into_plan()?;
    let trip = state.trips.create(user_id, plan).await?;
    Ok(HttpResponse::Created().json(TripResponse::from(&trip)))
}

#[utoipa::path(
    get,
    path = "/api/v1/trips/{tripId}",
    params(("tripId" = String, Path, format = "uuid", description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 404, description = "Unknown trip", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "getTrip"
)]
#[get("/trips/{trip_id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripResponse>> {
    let trip_id: TripId = parse_id(&path, TRIP_ID)?;
    let trip = state.trips.get(trip_id).await?;
    Ok(web::Json(TripResponse::from(&trip)))
}

/// Report a position and/or change status.
///
/// Cancelled and completed trips reject every update with 409.
#[utoipa::path(
    patch,
    path = "/api/v1/trips/{tripId}",
    params(("tripId" = String, Path, format = "uuid", description = "Trip identifier")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Updated trip", body = TripResponse),
        (status = 400, description = "Invalid field or status", body = ErrorSchema),
        (status = 404, description = "Unknown trip", body = ErrorSchema),
        (status = 409, description = "Trip already cancelled or complete", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "updateTrip"
)]
#[patch("/trips/{trip_id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let trip_id: TripId = parse_id(&path, TRIP_ID)?;
    let progress = payload.into_inner().into_progress()?;
    let trip = state.trips.update(trip_id, progress).await?;
    Ok(web::Json(TripResponse::from(&trip)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/trips/{tripId}",
    params(("tripId" = String, Path, format = "uuid", description = "Trip identifier")),
    responses(
        (status = 200, description = "Deleted trip", body = TripResponse),
        (status = 404, description = "Unknown trip", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip"
)]
#[delete("/trips/{trip_id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripResponse>> {
    let trip_id: TripId = parse_id(&path, TRIP_ID)?;
    let trip = state.trips.delete(trip_id).await?;
    Ok(web::Json(TripResponse::from(&trip)))
}

/// Alert every emergency contact that the user pressed the panic button.
///
/// Partial delivery still answers 200; the body lists who was missed.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/trips/{tripId}/panic",
    params(
        ("userId" = String, Path, format = "uuid", description = "User identifier"),
        ("tripId" = String, Path, format = "uuid", description = "Trip identifier")
    ),
    responses(
        (status = 200, description = "Dispatch report", body = DispatchReportBody),
        (status = 404, description = "Unknown user or trip", body = ErrorSchema),
        (status = 422, description = "User has no emergency contacts", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "panic"
)]
#[post("/users/{user_id}/trips/{trip_id}/panic")]
pub async fn panic(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<DispatchReportBody>> {
    let (user_id, trip_id) = path.into_inner();
    let user_id: UserId = parse_id(&user_id, USER_ID)?;
    let trip_id: TripId = parse_id(&trip_id, TRIP_ID)?;
    let report = state.alerts.panic(user_id, trip_id).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
#[path = "trips_tests.rs"]
mod tests;
