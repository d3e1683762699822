pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "installments")]
pub mod installments;

pub use error::PayOrInvestError;
pub use types::*;

/// Standard result type for all pay-or-invest operations
pub type PayOrInvestResult<T> = Result<T, PayOrInvestError>;
