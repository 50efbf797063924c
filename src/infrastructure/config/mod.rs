//! Infrastructure configuration modules.

pub mod chain;
pub mod logging;
pub mod pricing;
pub mod settings;
pub mod signing;
