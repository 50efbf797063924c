//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where external collaborators plug in: the chain
//! client that reads contract state and submits reports, and the secret
//! store that holds signing keys.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌─────────────┐                                     ┌─────────────┐
//! │ ChainClient │                                     │ SecretStore │
//! └─────────────┘                                     └─────────────┘
//! ```

pub mod outbound;

pub use outbound::chain::{ChainClient, ChainError, ReceiverStatus, SubmitReceipt, TxStatus};
pub use outbound::secret::SecretStore;
