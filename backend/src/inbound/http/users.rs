//! Account HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users
//! GET    /api/v1/users/{userId}
//! PATCH  /api/v1/users/{userId}
//! DELETE /api/v1/users/{userId}
//! PATCH  /api/v1/users/{userId}/togglecheckin
//! POST   /api/v1/users/{userId}/checkin
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{DeletedAccount, ProfilePatch, Registration, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_optional_rfc3339_timestamp};

pub(crate) const USER_ID: FieldName = FieldName::new("userId");

/// Registration body. The password is checked for presence and discarded.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[schema(format = "password")]
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(value: RegisterRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password.map(Zeroizing::new),
        }
    }
}

/// Partial profile edit.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[schema(minimum = 24)]
    pub check_in_period_hours: Option<u32>,
    #[schema(format = "date-time")]
    pub last_check_in: Option<String>,
}

/// User as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub check_in_mode: bool,
    pub check_in_period_hours: u32,
    #[schema(format = "date-time")]
    pub last_check_in: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            check_in_mode: user.check_in_mode(),
            check_in_period_hours: user.check_in_period().hours(),
            last_check_in: user.last_check_in().map(|at| at.to_rfc3339()),
        }
    }
}

/// Summary of a cascading account delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedAccountResponse {
    #[schema(format = "uuid")]
    pub user_id: String,
    pub trips: usize,
    pub contacts: usize,
    pub locations: usize,
}

impl DeletedAccountResponse {
    fn new(user_id: UserId, deleted: DeletedAccount) -> Self {
        Self {
            user_id: user_id.to_string(),
            trips: deleted.trips,
            contacts: deleted.contacts,
            locations: deleted.locations,
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 409, description = "Username or email already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.accounts.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Fetch a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let user = state.accounts.get(user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Edit username, email, check-in period or last check-in.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Username or email already taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let UpdateProfileRequest {
        username,
        email,
        check_in_period_hours,
        last_check_in,
    } = payload.into_inner();
    let patch = ProfilePatch {
        username,
        email,
        check_in_period_hours,
        last_check_in: parse_optional_rfc3339_timestamp(
            last_check_in,
            FieldName::new("lastCheckIn"),
        )?,
    };
    let user = state.accounts.update_profile(user_id, patch).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Delete a user together with their trips, contacts and locations.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = DeletedAccountResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedAccountResponse>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let deleted = state.accounts.delete(user_id).await?;
    Ok(web::Json(DeletedAccountResponse::new(user_id, deleted)))
}

/// Flip check-in mode.
///
/// Enabling needs at least one contact and one saved location.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{userId}/togglecheckin",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "No contacts or no saved locations", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "toggleCheckIn"
)]
#[patch("/users/{user_id}/togglecheckin")]
pub async fn toggle_check_in(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let user = state.accounts.toggle_check_in(user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Record a check-in at the current time.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/checkin",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "checkIn"
)]
#[post("/users/{user_id}/checkin")]
pub async fn check_in(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let user = state.accounts.record_check_in(user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
