//! Emergency contact HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users/{userId}/contacts
//! POST   /api/v1/users/{userId}/contacts
//! GET    /api/v1/contacts/{contactId}
//! PATCH  /api/v1/contacts/{contactId}
//! DELETE /api/v1/contacts/{contactId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Contact, ContactFields, ContactId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::USER_ID;
use crate::inbound::http::validation::{FieldName, parse_id};

const CONTACT_ID: FieldName = FieldName::new("contactId");

/// Contact fields. All three are required on create; any subset on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: Option<String>,
    #[schema(example = "(206) 555-0100")]
    pub phone: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
}

impl From<ContactRequest> for ContactFields {
    fn from(value: ContactRequest) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            email: value.email,
        }
    }
}

/// Contact as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub name: String,
    /// Digits as stored, with a leading `+` when entered internationally.
    pub phone: String,
    pub email: String,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id().to_string(),
            user_id: contact.user_id().to_string(),
            name: contact.name().to_owned(),
            phone: contact.phone().to_string(),
            email: contact.email().to_owned(),
        }
    }
}

/// List a user's emergency contacts.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/contacts",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "Contacts", body = [ContactResponse]),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/users/{user_id}/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContactResponse>>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let contacts = state.contacts.list(user_id).await?;
    Ok(web::Json(contacts.iter().map(ContactResponse::from).collect()))
}

/// Add an emergency contact.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/contacts",
    params(("userId" = String, Path, format = "uuid", description = "User identifier")),
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("/users/{user_id}/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let contact = state
        .contacts
        .create(user_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ContactResponse::from(&contact)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contacts/{contactId}",
    params(("contactId" = String, Path, format = "uuid", description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 404, description = "Unknown contact", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
#[get("/contacts/{contact_id}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact_id: ContactId = parse_id(&path, CONTACT_ID)?;
    let contact = state.contacts.get(contact_id).await?;
    Ok(web::Json(ContactResponse::from(&contact)))
}

/// Change any subset of a contact's fields. Nothing changes if one is invalid.
#[utoipa::path(
    patch,
    path = "/api/v1/contacts/{contactId}",
    params(("contactId" = String, Path, format = "uuid", description = "Contact identifier")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ContactResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown contact", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[patch("/contacts/{contact_id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact_id: ContactId = parse_id(&path, CONTACT_ID)?;
    let contact = state
        .contacts
        .update(contact_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(ContactResponse::from(&contact)))
}

/// Remove a contact, returning what was deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{contactId}",
    params(("contactId" = String, Path, format = "uuid", description = "Contact identifier")),
    responses(
        (status = 200, description = "Deleted contact", body = ContactResponse),
        (status = 404, description = "Unknown contact", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
#[delete("/contacts/{contact_id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ContactResponse>> {
    let contact_id: ContactId = parse_id(&path, CONTACT_ID)?;
    let contact = state.contacts.delete(contact_id).await?;
    Ok(web::Json(ContactResponse::from(&contact)))
}
