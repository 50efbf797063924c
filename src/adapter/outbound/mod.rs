//! Outbound adapters (driven side).

pub mod contract;
pub mod secret;
