//! Significant location HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users/{userId}/slocations
//! POST   /api/v1/users/{userId}/slocations
//! GET    /api/v1/slocations/{locationId}
//! PATCH  /api/v1/slocations/{locationId}
//! DELETE /api/v1/slocations/{locationId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{LocationFields, LocationId, SignificantLocation, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::USER_ID;
use crate::inbound::http::validation::{FieldName, coordinate_text, parse_id};

const LOCATION_ID: FieldName = FieldName::new("locationId");

/// A place the user checks in from. Coordinates may be numbers or strings.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub address: Option<String>,
    #[schema(value_type = Option<String>, example = "47.6062")]
    pub latitude: Option<Value>,
    #[schema(value_type = Option<String>, example = "-122.3321")]
    pub longitude: Option<Value>,
}

impl LocationRequest {
    fn into_fields(self) -> Result<LocationFields, crate::domain::Error> {
        Ok(LocationFields {
            address: self.address,
            latitude: coordinate_text(self.latitude, FieldName::new("latitude"))?,
            longitude: coordinate_text(self.longitude, FieldName::new("longitude"))?,
        })
    }
}

/// Saved location as returned to clients; coordinates keep their text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl From<&SignificantLocation> for LocationResponse {
    fn from(location: &SignificantLocation) -> Self {
        Self {
            id: location.id().to_string(),
            user_id: location.user_id().to_string(),
            address: location.address().to_owned(),
            latitude: location.point().latitude.text().to_owned(),
            longitude: location.point().longitude.text().to_owned(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/slocations",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Saved locations", body = [LocationResponse]),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations"
)]
#[get("/users/{user_id}/slocations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let locations = state.locations.list(user_id).await?;
    Ok(web::Json(locations.iter().map(LocationResponse::from).collect()))
}

/// Save a check-in location. Rejects a repeat of an address or coordinate
/// pair the user already saved.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/slocations",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    request_body = LocationRequest,
    responses(
        (status = 201, description = "Location saved", body = LocationResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Location already saved", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "createLocation"
)]
#[post("/users/{user_id}/slocations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let fields = payload.into_inner().into_fields()?;
    let location = state.locations.create(user_id, fields).await?;
    Ok(HttpResponse::Created().json(LocationResponse::from(&location)))
}

#[utoipa::path(
    get,
    path = "/api/v1/slocations/{locationId}",
    params(("locationId" = String, Path, format = "uuid", description = "Location identifier")),
    responses(
        (status = 200, description = "Saved location", body = LocationResponse),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "getLocation"
)]
#[get("/slocations/{location_id}")]
pub async fn get_location(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<LocationResponse>> {
    let location_id: LocationId = parse_id(&path, LOCATION_ID)?;
    let location = state.locations.get(location_id).await?;
    Ok(web::Json(LocationResponse::from(&location)))
}

/// Edit the supplied fields; the result must still differ from the user's
/// other locations.
#[utoipa::path(
    patch,
    path = "/api/v1/slocations/{locationId}",
    params(("locationId" = String, Path, format = "uuid", description = "Location identifier")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Updated location", body = LocationResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema),
        (status = 409, description = "Location already saved", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "updateLocation"
)]
#[patch("/slocations/{location_id}")]
pub async fn update_location(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<LocationRequest>,
) -> ApiResult<web::Json<LocationResponse>> {
    let location_id: LocationId = parse_id(&path, LOCATION_ID)?;
    let fields = payload.into_inner().into_fields()?;
    let location = state.locations.update(location_id, fields).await?;
    Ok(web::Json(LocationResponse::from(&location)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/slocations/{locationId}",
    params(("locationId" = String, Path, format = "uuid", description = "Location identifier")),
    responses(
        (status = 200, description = "Deleted location", body = LocationResponse),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "deleteLocation"
)]
#[delete("/slocations/{location_id}")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<LocationResponse>> {
    let location_id: LocationId = parse_id(&path, LOCATION_ID)?;
    let location = state.locations.delete(location_id).await?;
    Ok(web::Json(LocationResponse::from(&location)))
}
