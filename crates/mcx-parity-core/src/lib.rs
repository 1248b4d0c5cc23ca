pub mod error;
pub mod rounding;
pub mod types;

#[cfg(feature = "quantity")]
pub mod quantity;

#[cfg(feature = "parity")]
pub mod parity;

pub use error::ParityDeskError;
pub use types::*;

/// Standard result type for all parity-desk operations
pub type ParityDeskResult<T> = Result<T, ParityDeskError>;
