//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - `ScriptedChain`, an in-memory [`ChainClient`](crate::port::ChainClient)
//!   serving market and vault reads and recording submitted reports.
//! - [`fixtures`] - Well-known keys, addresses, configuration and signed
//!   trade intents.

pub mod chain;
pub mod fixtures;
