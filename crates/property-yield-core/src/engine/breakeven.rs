use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::inputs::InputParameters;
use super::valuation::{evaluate, ValuationResult};
use crate::types::{Money, Percent, Ratio};

/// Bisection steps per search. 40 halvings of a bracket of a few thousand
/// currency units leave an interval far below one cent.
pub const BISECTION_ITERATIONS: u32 = 40;

/// Minimum upper bound of the rent bracket.
pub const RENT_BRACKET_FLOOR: Money = dec!(5000);

/// The rent bracket extends to this multiple of the current rent.
pub const RENT_BRACKET_MULTIPLE: Decimal = dec!(4);

/// Upper bound of the interest bracket in percent points.
pub const INTEREST_CEILING_PCT: Percent = dec!(15);

/// Minimum DSCR for the `dscr110` targets.
pub const MIN_DSCR: Ratio = dec!(1.10);

/// Minimum cash-on-cash return for the `coc6` target.
pub const MIN_CASH_ON_CASH: Ratio = dec!(0.06);

const TWO: Decimal = dec!(2);

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Condition the rent search must satisfy.
///
/// Every variant is non-decreasing in rent; bisection relies on that, so new
/// targets must keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentTarget {
    /// Monthly net cashflow >= 0
    #[serde(rename = "cashflow0")]
    CashflowNonNegative,
    /// DSCR >= 1.10
    #[serde(rename = "dscr110")]
    DscrAtLeast110,
    /// Cash-on-cash return >= 6%
    #[serde(rename = "coc6")]
    CashOnCashAtLeast6,
}

/// Condition the interest search must satisfy. Non-increasing in the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestTarget {
    /// DSCR >= 1.10
    #[serde(rename = "dscr110")]
    DscrAtLeast110,
    /// Monthly net cashflow >= 0
    #[serde(rename = "cashflow0")]
    CashflowNonNegative,
}

impl RentTarget {
    pub const ALL: [RentTarget; 3] = [
        RentTarget::CashflowNonNegative,
        RentTarget::DscrAtLeast110,
        RentTarget::CashOnCashAtLeast6,
    ];

    /// Whether a valuation satisfies this target.
    pub fn is_met(self, r: &ValuationResult) -> bool {
        match self {
            RentTarget::CashflowNonNegative => r.net_cashflow >= Decimal::ZERO,
            RentTarget::DscrAtLeast110 => r.dscr >= MIN_DSCR,
            RentTarget::CashOnCashAtLeast6 => r.cash_on_cash >= MIN_CASH_ON_CASH,
        }
    }

    /// Wire name ("cashflow0", "dscr110", "coc6").
    pub fn as_str(self) -> &'static str {
        match self {
            RentTarget::CashflowNonNegative => "cashflow0",
            RentTarget::DscrAtLeast110 => "dscr110",
            RentTarget::CashOnCashAtLeast6 => "coc6",
        }
    }
}

impl InterestTarget {
    pub const ALL: [InterestTarget; 2] = [
        InterestTarget::DscrAtLeast110,
        InterestTarget::CashflowNonNegative,
    ];

    /// Whether a valuation satisfies this target.
    pub fn is_met(self, r: &ValuationResult) -> bool {
        match self {
            InterestTarget::DscrAtLeast110 => r.dscr >= MIN_DSCR,
            InterestTarget::CashflowNonNegative => r.net_cashflow >= Decimal::ZERO,
        }
    }

    /// Wire name ("dscr110", "cashflow0").
    pub fn as_str(self) -> &'static str {
        match self {
            InterestTarget::DscrAtLeast110 => "dscr110",
            InterestTarget::CashflowNonNegative => "cashflow0",
        }
    }
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

/// Smallest monthly cold rent at which `target` holds, all else fixed.
///
/// Searches `[0, max(5000, 4 * current rent)]`. `None` means the target is
/// not reached even at the top of that bracket; the bracket is a heuristic,
/// so this is "not found within range" rather than "impossible".
///
/// The result is the upper end of the final bisection interval, so it always
/// satisfies the target.
pub fn breakeven_rent_monthly(base: &InputParameters, target: RentTarget) -> Option<Money> {
    let meets = |rent: Money| target.is_met(&evaluate(&base.with_cold_rent(rent)));

    let mut lo = Decimal::ZERO;
    let mut hi = RENT_BRACKET_FLOOR.max(
        base.cold_rent_monthly
            .checked_mul(RENT_BRACKET_MULTIPLE)
            .unwrap_or(Decimal::MAX),
    );

    if !meets(hi) {
        debug!(goal = target.as_str(), bracket_hi = %hi, "rent break-even unreachable");
        return None;
    }

    for _ in 0..BISECTION_ITERATIONS {
        let mid = midpoint(lo, hi);
        if meets(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    debug!(goal = target.as_str(), rent = %hi, "rent break-even found");
    Some(hi)
}

/// Largest annual interest rate (percent points) at which `target` holds.
///
/// Searches `[0, 15]`. `None` when even a zero rate misses the target, which
/// means costs and reserves alone exceed the effective rent. When the target
/// still holds at 15% the ceiling is returned as-is without bisecting.
pub fn breakeven_interest_pct(base: &InputParameters, target: InterestTarget) -> Option<Percent> {
    let meets = |rate: Percent| target.is_met(&evaluate(&base.with_interest_rate(rate)));

    let mut lo = Decimal::ZERO;
    let mut hi = INTEREST_CEILING_PCT;

    if !meets(lo) {
        debug!(goal = target.as_str(), "interest break-even unreachable at zero rate");
        return None;
    }
    if meets(hi) {
        debug!(goal = target.as_str(), "interest break-even holds at bracket ceiling");
        return Some(hi);
    }

    for _ in 0..BISECTION_ITERATIONS {
        let mid = midpoint(lo, hi);
        if meets(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    debug!(goal = target.as_str(), rate = %lo, "interest break-even found");
    Some(lo)
}

/// Midpoint of `[lo, hi]` for `lo <= hi` without forming `lo + hi`, which
/// overflows when the bracket reaches `Decimal::MAX`.
fn midpoint(lo: Decimal, hi: Decimal) -> Decimal {
    lo + (hi - lo) / TWO
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
