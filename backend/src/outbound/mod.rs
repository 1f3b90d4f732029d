//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process store backing every repository port
//! - **sms**: Twilio-backed and log-only notification channels
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod sms;
