//! Personal-safety backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, ports and services,
//! [`outbound`] implements the ports, and [`inbound::http`] exposes the REST
//! surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
