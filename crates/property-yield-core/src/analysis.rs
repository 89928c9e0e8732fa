use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::{assess, compute_break_even, decision_summary, BreakEvenSummary};
use crate::assessment::{interest_headroom, rent_gap, InterestHeadroom, RentGap, TrafficLight};
use crate::engine::{evaluate, InputParameters, ValuationResult, DSCR_DEBT_FREE};
use crate::scenarios::compare::{waterfall, WaterfallStep};
use crate::scenarios::sensitivity::{apply_shift, SensitivityShift};
use crate::types::{with_metadata, ComputationOutput};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for a full property analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Entered property and financing parameters
    pub inputs: InputParameters,
    /// Optional what-if shift applied to the valuation (not the break-evens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<SensitivityShift>,
}

/// Rent break-evens compared against the current rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentGaps {
    pub cashflow0: Option<RentGap>,
    pub dscr110: Option<RentGap>,
    pub coc6: Option<RentGap>,
}

/// Interest break-evens compared against the current rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestHeadrooms {
    pub dscr110: Option<InterestHeadroom>,
    pub cashflow0: Option<InterestHeadroom>,
}

/// Everything shown for one property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    /// Inputs after the sensitivity shift (equal to the entered ones without a shift)
    pub simulated_inputs: InputParameters,
    pub valuation: ValuationResult,
    pub traffic_light: TrafficLight,
    pub break_even: BreakEvenSummary,
    pub rent_gaps: RentGaps,
    pub interest_headroom: InterestHeadrooms,
    pub waterfall: Vec<WaterfallStep>,
    pub summary: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate, rate and solve break-evens for one property.
///
/// The valuation, traffic light and waterfall use the shifted inputs; the
/// break-evens and the decision summary always refer to the entered inputs.
/// Never fails: unusual inputs only add warnings.
pub fn analyze_property(input: &AnalysisInput) -> ComputationOutput<PropertyAnalysis> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base = &input.inputs;
    let simulated_inputs = match &input.shift {
        Some(shift) => apply_shift(base, shift),
        None => *base,
    };

    let valuation = evaluate(&simulated_inputs);
    let traffic_light = assess(&valuation);
    let break_even = compute_break_even(base);

    collect_warnings(base, &valuation, &mut warnings);

    let gap = |be: Option<Decimal>| be.map(|r| rent_gap(r, base.cold_rent_monthly));
    let rent_gaps = RentGaps {
        cashflow0: gap(break_even.cashflow0),
        dscr110: gap(break_even.dscr110),
        coc6: gap(break_even.coc6),
    };

    let headroom = |be: Option<Decimal>| be.map(|r| interest_headroom(r, base.interest_rate_pct));
    let interest_headroom = InterestHeadrooms {
        dscr110: headroom(break_even.max_interest_dscr110),
        cashflow0: headroom(break_even.max_interest_cashflow0),
    };

    let summary = decision_summary(&traffic_light, base, &break_even);

    let output = PropertyAnalysis {
        simulated_inputs,
        waterfall: waterfall(&simulated_inputs, &valuation),
        valuation,
        traffic_light,
        break_even,
        rent_gaps,
        interest_headroom,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Rental Property Year-One Cashflow, DSCR and Break-even Analysis",
        input,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(inputs: &InputParameters, valuation: &ValuationResult, warnings: &mut Vec<String>) {
    if inputs.equity <= Decimal::ZERO {
        warnings.push("No equity invested: cash-on-cash is reported as 0".into());
    }

    if inputs.vacancy_pct > dec!(15) {
        warnings.push(format!(
            "Vacancy {}% exceeds 15%, above typical market norms",
            inputs.vacancy_pct
        ));
    }

    if inputs.cold_rent_monthly.is_zero() {
        warnings.push("Cold rent is zero: the property generates no income".into());
    }

    if valuation.dscr == DSCR_DEBT_FREE && valuation.debt_service.is_zero() {
        warnings.push("No debt service: DSCR is reported as the debt-free value 99".into());
    }
}
