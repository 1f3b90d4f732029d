//! HTTP inbound adapter exposing REST endpoints.

pub mod contacts;
pub mod error;
pub mod health;
pub mod locations;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler. Mount inside `web::scope("/api/v1")`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use buddy_backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::toggle_check_in)
        .service(users::check_in)
        .service(contacts::list_contacts)
        .service(contacts::create_contact)
        .service(contacts::get_contact)
        .service(contacts::update_contact)
        .service(contacts::delete_contact)
        .service(locations::list_locations)
        .service(locations::create_location)
        .service(locations::get_location)
        .service(locations::update_location)
        .service(locations::delete_location)
        .service(trips::start_trip)
        .service(trips::get_trip)
        .service(trips::update_trip)
        .service(trips::delete_trip)
        .service(trips::panic);
}
