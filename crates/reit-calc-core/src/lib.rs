pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "reit")]
pub mod reit;

#[cfg(feature = "development")]
pub mod development;

#[cfg(feature = "market")]
pub mod market;

pub use error::ReitCalcError;
pub use types::*;

/// Standard result type for all reit-calc operations
pub type ReitCalcResult<T> = Result<T, ReitCalcError>;
