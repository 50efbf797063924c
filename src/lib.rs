//! LMSR pricing, dual-signature trade authorization and settlement report
//! encoding for prediction markets.
//!
//! An off-chain authority prices trades with the logarithmic market scoring
//! rule, signs the priced terms as typed data and combines that signature
//! with the trader's own into a single action-prefixed report for the
//! settlement contracts. Ephemeral trading agents get keys that are only
//! ever held encrypted at rest.
//!
//! # Modules
//!
//! - [`domain`] - Identifiers, market snapshots, trade terms, unit parsing
//!   and the fixed-precision LMSR engine
//! - [`application`] - The authorization protocol, report encoding and
//!   submission, market writes, agent provisioning
//! - [`port`] - Collaborator traits: chain client and secret store
//! - [`adapter`] - Contract call encoding, secret stores and the CLI
//! - [`infrastructure`] - Configuration, logging, typed-data signing and key
//!   custody
//! - [`error`] - Crate-level error types
//!
//! # Example
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use lmsr_settlement::domain::lmsr;
//!
//! let q = vec![BigDecimal::from(0), BigDecimal::from(0)];
//! let b = BigDecimal::from(100);
//! let cost = lmsr::cost_to_buy(&q, 0, &BigDecimal::from(10), &b).unwrap();
//! assert!(cost > BigDecimal::from(5) && cost < BigDecimal::from(10));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
