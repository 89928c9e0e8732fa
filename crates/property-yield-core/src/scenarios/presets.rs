use rust_decimal_macros::dec;
use serde::Serialize;

use crate::engine::InputParameters;
use crate::error::PropertyYieldError;
use crate::PropertyYieldResult;

/// Starting inputs: a 320k flat at 1,100 cold rent with 60k equity.
pub const DEFAULT_INPUTS: InputParameters = InputParameters {
    purchase_price: dec!(320000),
    cold_rent_monthly: dec!(1100),
    non_alloc_costs_monthly: dec!(120),
    equity: dec!(60000),
    interest_rate_pct: dec!(3.8),
    initial_repayment_pct: dec!(2.0),
    vacancy_pct: dec!(4),
    closing_costs_pct: dec!(10),
    capex: dec!(0),
    reserves_monthly: dec!(0),
};

/// A named, ready-made set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    pub inputs: InputParameters,
}

pub static PRESETS: [Preset; 3] = [
    Preset {
        id: "berlin-etw-starter",
        label: "Berlin flat (starter)",
        inputs: InputParameters {
            purchase_price: dec!(380000),
            cold_rent_monthly: dec!(1350),
            non_alloc_costs_monthly: dec!(160),
            equity: dec!(80000),
            interest_rate_pct: dec!(3.9),
            initial_repayment_pct: dec!(2.0),
            vacancy_pct: dec!(3),
            closing_costs_pct: dec!(10),
            capex: dec!(8000),
            reserves_monthly: dec!(60),
        },
    },
    Preset {
        id: "leipzig-etw-yield",
        label: "Leipzig flat (yield)",
        inputs: InputParameters {
            purchase_price: dec!(220000),
            cold_rent_monthly: dec!(950),
            non_alloc_costs_monthly: dec!(140),
            equity: dec!(50000),
            interest_rate_pct: dec!(3.8),
            initial_repayment_pct: dec!(2.2),
            vacancy_pct: dec!(5),
            closing_costs_pct: dec!(10),
            capex: dec!(5000),
            reserves_monthly: dec!(70),
        },
    },
    Preset {
        id: "mfh-semi-pro",
        label: "Multi-family house (semi-pro)",
        inputs: InputParameters {
            purchase_price: dec!(950000),
            cold_rent_monthly: dec!(5200),
            non_alloc_costs_monthly: dec!(650),
            equity: dec!(220000),
            interest_rate_pct: dec!(4.0),
            initial_repayment_pct: dec!(2.0),
            vacancy_pct: dec!(6),
            closing_costs_pct: dec!(10),
            capex: dec!(35000),
            reserves_monthly: dec!(220),
        },
    },
];

/// Look up a preset by id.
pub fn find_preset(id: &str) -> PropertyYieldResult<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| PropertyYieldError::UnknownPreset(id.to_string()))
}

/// Look up a preset by id, falling back to the first preset for unknown ids
/// (a stale id from persisted state, for instance).
pub fn preset_or_default(id: &str) -> &'static Preset {
    find_preset(id).unwrap_or(&PRESETS[0])
}
