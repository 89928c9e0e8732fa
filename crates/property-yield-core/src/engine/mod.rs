pub mod breakeven;
pub mod inputs;
pub mod valuation;

pub use breakeven::{breakeven_interest_pct, breakeven_rent_monthly, InterestTarget, RentTarget};
pub use inputs::InputParameters;
pub use valuation::{annuity_monthly, evaluate, ValuationResult, DSCR_DEBT_FREE};
