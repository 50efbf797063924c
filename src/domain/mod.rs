//! Exchange-agnostic domain logic: identifiers, market snapshots, trade terms
//! and the pricing math.

pub mod decimal;
pub mod error;
pub mod id;
pub mod lmsr;
pub mod market;
pub mod quote;
pub mod units;

pub use error::DomainError;
pub use id::{ConditionId, QuestionId};
pub use market::MarketInfo;
pub use quote::{Quote, TradeIntent};
