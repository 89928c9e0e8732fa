use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::{evaluate, InputParameters};
use crate::error::PropertyYieldError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Ratio};
use crate::PropertyYieldResult;

/// Slider range for the interest shift, in percent points.
pub const INTEREST_DELTA_RANGE: (Percent, Percent) = (dec!(-2), dec!(2));

/// Slider range for the rent shift, in percent of the current rent.
pub const RENT_DELTA_RANGE: (Percent, Percent) = (dec!(-20), dec!(20));

/// What-if adjustment applied on top of the entered inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityShift {
    /// Added to the interest rate (percent points)
    #[serde(default, alias = "interestDeltaPct")]
    pub interest_delta_pct: Percent,
    /// Relative rent change in percent
    #[serde(default, alias = "rentDeltaPct")]
    pub rent_delta_pct: Percent,
}

impl SensitivityShift {
    /// Whether this shift leaves the inputs unchanged.
    pub fn is_neutral(&self) -> bool {
        self.interest_delta_pct.is_zero() && self.rent_delta_pct.is_zero()
    }

    /// Copy limited to the slider ranges.
    pub fn clamped(&self) -> Self {
        Self {
            interest_delta_pct: self
                .interest_delta_pct
                .clamp(INTEREST_DELTA_RANGE.0, INTEREST_DELTA_RANGE.1),
            rent_delta_pct: self
                .rent_delta_pct
                .clamp(RENT_DELTA_RANGE.0, RENT_DELTA_RANGE.1),
        }
    }
}

/// One cell of a sensitivity grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityCell {
    pub interest_delta_pct: Percent,
    pub rent_delta_pct: Percent,
    pub interest_rate_pct: Percent,
    pub cold_rent_monthly: Money,
    pub net_cashflow: Money,
    pub dscr: Ratio,
    pub cash_on_cash: Ratio,
}

/// Range of deltas to sweep, inclusive of both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSweep {
    pub min: Percent,
    pub max: Percent,
    pub step: Percent,
}

/// Input for a two-way interest/rent sensitivity grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub inputs: InputParameters,
    pub interest_deltas: DeltaSweep,
    pub rent_deltas: DeltaSweep,
}

/// Evaluated grid plus the unshifted base cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub interest_deltas: Vec<Percent>,
    pub rent_deltas: Vec<Percent>,
    /// Interest-major: `cells[i * rent_deltas.len() + j]`
    pub cells: Vec<SensitivityCell>,
    pub base_net_cashflow: Money,
}

/// Apply a shift: the interest delta is added, the rent is scaled by
/// `1 + delta/100` and floored at zero. The shift is used as given; call
/// [`SensitivityShift::clamped`] first to enforce the slider ranges.
pub fn apply_shift(inputs: &InputParameters, shift: &SensitivityShift) -> InputParameters {
    let rent_factor = Decimal::ONE.saturating_add(shift.rent_delta_pct / dec!(100));
    InputParameters {
        interest_rate_pct: inputs
            .interest_rate_pct
            .saturating_add(shift.interest_delta_pct),
        cold_rent_monthly: inputs
            .cold_rent_monthly
            .saturating_mul(rent_factor)
            .max(Decimal::ZERO),
        ..*inputs
    }
}

/// Evaluate every combination of interest and rent shifts, interest-major.
pub fn sensitivity_grid(
    inputs: &InputParameters,
    interest_deltas: &[Percent],
    rent_deltas: &[Percent],
) -> Vec<SensitivityCell> {
    let mut cells = Vec::with_capacity(interest_deltas.len() * rent_deltas.len());

    for &interest_delta_pct in interest_deltas {
        for &rent_delta_pct in rent_deltas {
            let shift = SensitivityShift {
                interest_delta_pct,
                rent_delta_pct,
            };
            let shifted = apply_shift(inputs, &shift);
            let r = evaluate(&shifted);
            cells.push(SensitivityCell {
                interest_delta_pct,
                rent_delta_pct,
                interest_rate_pct: shifted.interest_rate_pct,
                cold_rent_monthly: shifted.cold_rent_monthly,
                net_cashflow: r.net_cashflow,
                dscr: r.dscr,
                cash_on_cash: r.cash_on_cash,
            });
        }
    }

    cells
}

/// Expand a sweep into its values, always including `max`.
pub fn sweep_values(sweep: &DeltaSweep, field: &str) -> PropertyYieldResult<Vec<Percent>> {
    if sweep.step <= Decimal::ZERO {
        return Err(PropertyYieldError::InvalidInput {
            field: field.into(),
            reason: "Step must be positive".into(),
        });
    }
    if sweep.min > sweep.max {
        return Err(PropertyYieldError::InvalidInput {
            field: field.into(),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = sweep.min;
    while current <= sweep.max {
        values.push(current);
        match current.checked_add(sweep.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < sweep.max {
            values.push(sweep.max);
        }
    }

    Ok(values)
}

/// Sweep interest and rent shifts around a base case.
///
/// Deltas outside the slider ranges are evaluated as given but reported in
/// the warnings.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> PropertyYieldResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let interest_deltas = sweep_values(&input.interest_deltas, "interest_deltas")?;
    let rent_deltas = sweep_values(&input.rent_deltas, "rent_deltas")?;

    if input.interest_deltas.min < INTEREST_DELTA_RANGE.0
        || input.interest_deltas.max > INTEREST_DELTA_RANGE.1
    {
        warnings.push(format!(
            "Interest deltas exceed the usual range of {} to {} points",
            INTEREST_DELTA_RANGE.0, INTEREST_DELTA_RANGE.1
        ));
    }
    if input.rent_deltas.min < RENT_DELTA_RANGE.0 || input.rent_deltas.max > RENT_DELTA_RANGE.1 {
        warnings.push(format!(
            "Rent deltas exceed the usual range of {}% to {}%",
            RENT_DELTA_RANGE.0, RENT_DELTA_RANGE.1
        ));
    }

    let cells = sensitivity_grid(&input.inputs, &interest_deltas, &rent_deltas);
    let base_net_cashflow = evaluate(&input.inputs).net_cashflow;

    let output = SensitivityOutput {
        interest_deltas,
        rent_deltas,
        cells,
        base_net_cashflow,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest / Rent Sensitivity Grid",
        input,
        warnings,
        elapsed,
        output,
    ))
}
