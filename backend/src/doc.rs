//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, and the
//! error schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI
//! serves it at `/docs` in debug builds and `openapi-dump` prints it.

use utoipa::OpenApi;

use crate::inbound::http::contacts::{ContactRequest, ContactResponse};
use crate::inbound::http::locations::{LocationRequest, LocationResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::trips::{
    DeliveryFailureBody, DispatchReportBody, StartTripRequest, TripResponse, UpdateTripRequest,
};
use crate::inbound::http::users::{
    DeletedAccountResponse, RegisterRequest, UpdateProfileRequest, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Buddy backend API",
        description = "Personal-safety backend: emergency contacts, check-in locations, \
                       tracked trips, panic alerts and overdue check-in monitoring."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::toggle_check_in,
        crate::inbound::http::users::check_in,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::create_location,
        crate::inbound::http::locations::get_location,
        crate::inbound::http::locations::update_location,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::trips::start_trip,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::trips::panic,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        UpdateProfileRequest,
        UserResponse,
        DeletedAccountResponse,
        ContactRequest,
        ContactResponse,
        LocationRequest,
        LocationResponse,
        StartTripRequest,
        UpdateTripRequest,
        TripResponse,
        DispatchReportBody,
        DeliveryFailureBody,
    )),
    tags(
        (name = "users", description = "Accounts and check-in mode"),
        (name = "contacts", description = "Emergency contacts"),
        (name = "locations", description = "Significant check-in locations"),
        (name = "trips", description = "Tracked trips and panic alerts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
