//! Inbound adapters translating external requests into domain service calls.
//!
//! The only transport is HTTP, under [`http`].

pub mod http;
