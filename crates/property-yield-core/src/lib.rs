pub mod engine;
pub mod error;
pub mod sanitize;
pub mod types;

#[cfg(feature = "assessment")]
pub mod assessment;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "scenarios")]
pub mod analysis;

pub use engine::{
    breakeven_interest_pct, breakeven_rent_monthly, evaluate, InputParameters, InterestTarget,
    RentTarget, ValuationResult,
};
pub use error::PropertyYieldError;
pub use types::*;

/// Standard result type for all property-yield operations
pub type PropertyYieldResult<T> = Result<T, PropertyYieldError>;
