//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading, validation and logging setup
//! - [`custody`] - Agent key generation and encryption at rest
//! - [`signing`] - Typed structured-data hashing, signing and recovery

pub mod config;
pub mod custody;
pub mod signing;
