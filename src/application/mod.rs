//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod agent;
pub mod market;
pub mod protocol;
pub mod report;
pub mod response;
pub mod schema;
