use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::traffic_light::TrafficLight;
use crate::engine::{breakeven_interest_pct, breakeven_rent_monthly, InputParameters};
use crate::engine::{InterestTarget, RentTarget};
use crate::types::{Money, Percent, Tone};

/// Rent gaps up to this amount (currency units per month) are rated yellow.
pub const RENT_GAP_TOLERANCE: Money = dec!(150);

/// Interest headroom of at least this many percent points is rated green.
pub const COMFORTABLE_HEADROOM_PCT: Percent = dec!(1);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// All five break-even thresholds for one set of inputs. `None` means the
/// target was not reachable within the solver bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenSummary {
    /// Minimum cold rent for non-negative cashflow
    pub cashflow0: Option<Money>,
    /// Minimum cold rent for DSCR >= 1.10
    pub dscr110: Option<Money>,
    /// Minimum cold rent for cash-on-cash >= 6%
    pub coc6: Option<Money>,
    /// Maximum interest rate for DSCR >= 1.10
    pub max_interest_dscr110: Option<Percent>,
    /// Maximum interest rate for non-negative cashflow
    pub max_interest_cashflow0: Option<Percent>,
}

/// Distance between a rent break-even and the current rent, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentGap {
    pub break_even_rounded: Money,
    pub current_rounded: Money,
    /// Additional rent needed; zero or negative means already met
    pub diff: Money,
    pub band: Tone,
}

/// Room between the current interest rate and the maximum tolerable rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestHeadroom {
    pub max_rate: Percent,
    pub current_rate: Percent,
    /// Positive when the current rate is below the maximum
    pub headroom: Percent,
    pub band: Tone,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every rent and interest break-even search on `inputs`.
pub fn compute_break_even(inputs: &InputParameters) -> BreakEvenSummary {
    BreakEvenSummary {
        cashflow0: breakeven_rent_monthly(inputs, RentTarget::CashflowNonNegative),
        dscr110: breakeven_rent_monthly(inputs, RentTarget::DscrAtLeast110),
        coc6: breakeven_rent_monthly(inputs, RentTarget::CashOnCashAtLeast6),
        max_interest_dscr110: breakeven_interest_pct(inputs, InterestTarget::DscrAtLeast110),
        max_interest_cashflow0: breakeven_interest_pct(
            inputs,
            InterestTarget::CashflowNonNegative,
        ),
    }
}

/// Compare a rent break-even with the current rent.
///
/// Green when no extra rent is needed, yellow up to 150 more, red beyond.
pub fn rent_gap(break_even: Money, current_rent: Money) -> RentGap {
    let break_even_rounded = round_half_up(break_even);
    let current_rounded = round_half_up(current_rent);
    let diff = break_even_rounded.saturating_sub(current_rounded);

    let band = if diff <= Decimal::ZERO {
        Tone::Green
    } else if diff <= RENT_GAP_TOLERANCE {
        Tone::Yellow
    } else {
        Tone::Red
    };

    RentGap {
        break_even_rounded,
        current_rounded,
        diff,
        band,
    }
}

/// Compare a maximum interest rate with the current one, both at 2 dp.
///
/// Green with at least one point of headroom, yellow with any non-negative
/// headroom, red when the current rate is already too high.
pub fn interest_headroom(max_rate: Percent, current_rate: Percent) -> InterestHeadroom {
    let max_rate = round_2dp(max_rate);
    let current_rate = round_2dp(current_rate);
    let headroom = max_rate.saturating_sub(current_rate);

    let band = if headroom >= COMFORTABLE_HEADROOM_PCT {
        Tone::Green
    } else if headroom >= Decimal::ZERO {
        Tone::Yellow
    } else {
        Tone::Red
    };

    InterestHeadroom {
        max_rate,
        current_rate,
        headroom,
        band,
    }
}

/// Plain-language recommendation lines for a rated property.
///
/// Green yields a single confirmation. Otherwise the rent needed for
/// non-negative cashflow and the rate needed for DSCR >= 1.10 are spelled
/// out when they differ from the current values, with a generic line as
/// fallback.
pub fn decision_summary(
    light: &TrafficLight,
    inputs: &InputParameters,
    break_even: &BreakEvenSummary,
) -> Vec<String> {
    if light.tone == Tone::Green {
        return vec![
            "Looks solid: cashflow, DSCR and return are all in the green range.".to_string(),
        ];
    }

    let mut lines = Vec::new();

    if let Some(rent) = break_even.cashflow0 {
        if rent > inputs.cold_rent_monthly {
            let diff = round_half_up(rent.saturating_sub(inputs.cold_rent_monthly));
            lines.push(format!(
                "Non-negative cashflow needs a cold rent of about {} (+{diff}).",
                round_half_up(rent)
            ));
        }
    }

    if let Some(rate) = break_even.max_interest_dscr110 {
        if rate < inputs.interest_rate_pct {
            let diff = round_2dp(inputs.interest_rate_pct.saturating_sub(rate));
            lines.push(format!(
                "DSCR >= 1.10 needs an interest rate of at most {:.2}% (-{diff:.2}%).",
                round_2dp(rate)
            ));
        }
    }

    if lines.is_empty() {
        lines.push(
            "Adjust interest, rent or vacancy: at least one metric is currently critical."
                .to_string(),
        );
    }

    lines
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Round to a whole unit with halves going up, as display rounding does.
fn round_half_up(x: Decimal) -> Decimal {
    x.saturating_add(dec!(0.5)).floor()
}

fn round_2dp(x: Decimal) -> Decimal {
    x.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
