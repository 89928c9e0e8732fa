//! Boundary between untrusted `f64` numbers (form fields, persisted browser
//! state, JavaScript callers) and the engine's `Decimal` inputs.
//!
//! The engine itself never validates. Anything that may be missing, NaN,
//! infinite or out of the form's range is coerced here first.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::InputParameters;
use crate::error::PropertyYieldError;
use crate::PropertyYieldResult;

/// Largest accepted monetary amount. Keeps every product in the engine far
/// inside `Decimal`'s range.
pub const MONEY_CEILING: Decimal = dec!(1000000000000);

/// Raw numeric form state. Every field is optional so that partially
/// persisted or drifted documents still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Option<f64>,
    #[serde(alias = "coldRentMonthly")]
    pub cold_rent_monthly: Option<f64>,
    #[serde(alias = "nonAllocCostsMonthly")]
    pub non_alloc_costs_monthly: Option<f64>,
    pub equity: Option<f64>,
    #[serde(alias = "interestRatePct")]
    pub interest_rate_pct: Option<f64>,
    #[serde(alias = "initialRepaymentPct")]
    pub initial_repayment_pct: Option<f64>,
    #[serde(alias = "vacancyPct")]
    pub vacancy_pct: Option<f64>,
    #[serde(alias = "closingCostsPct")]
    pub closing_costs_pct: Option<f64>,
    pub capex: Option<f64>,
    #[serde(alias = "reservesMonthly")]
    pub reserves_monthly: Option<f64>,
}

/// Engine-ready inputs and a note for every field that had to be replaced
/// or clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sanitized {
    pub inputs: InputParameters,
    pub warnings: Vec<String>,
}

/// Inclusive range a form field is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub min: Decimal,
    pub max: Decimal,
}

const MONEY: FieldBounds = FieldBounds {
    min: Decimal::ZERO,
    max: MONEY_CEILING,
};
const FINANCING_RATE: FieldBounds = FieldBounds {
    min: Decimal::ZERO,
    max: dec!(15),
};
const VACANCY: FieldBounds = FieldBounds {
    min: Decimal::ZERO,
    max: dec!(30),
};
const CLOSING_COSTS: FieldBounds = FieldBounds {
    min: Decimal::ZERO,
    max: dec!(20),
};

/// `Some(x)` for finite numbers, `None` for NaN and infinities.
pub fn finite_or_none(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Coerce raw form numbers into engine inputs.
///
/// Missing, non-finite or unrepresentable fields take the value from
/// `fallback`; finite values are clamped to the form bounds. Never fails.
pub fn sanitize(raw: &RawInputs, fallback: &InputParameters) -> Sanitized {
    let mut warnings = Vec::new();
    let mut field = |name: &str, value: Option<f64>, fallback: Decimal, bounds: FieldBounds| {
        coerce(name, value, fallback, bounds, &mut warnings)
    };

    let inputs = InputParameters {
        purchase_price: field("purchase_price", raw.purchase_price, fallback.purchase_price, MONEY),
        cold_rent_monthly: field(
            "cold_rent_monthly",
            raw.cold_rent_monthly,
            fallback.cold_rent_monthly,
            MONEY,
        ),
        non_alloc_costs_monthly: field(
            "non_alloc_costs_monthly",
            raw.non_alloc_costs_monthly,
            fallback.non_alloc_costs_monthly,
            MONEY,
        ),
        equity: field("equity", raw.equity, fallback.equity, MONEY),
        interest_rate_pct: field(
            "interest_rate_pct",
            raw.interest_rate_pct,
            fallback.interest_rate_pct,
            FINANCING_RATE,
        ),
        initial_repayment_pct: field(
            "initial_repayment_pct",
            raw.initial_repayment_pct,
            fallback.initial_repayment_pct,
            FINANCING_RATE,
        ),
        vacancy_pct: field("vacancy_pct", raw.vacancy_pct, fallback.vacancy_pct, VACANCY),
        closing_costs_pct: field(
            "closing_costs_pct",
            raw.closing_costs_pct,
            fallback.closing_costs_pct,
            CLOSING_COSTS,
        ),
        capex: field("capex", raw.capex, fallback.capex, MONEY),
        reserves_monthly: field(
            "reserves_monthly",
            raw.reserves_monthly,
            fallback.reserves_monthly,
            MONEY,
        ),
    };

    Sanitized { inputs, warnings }
}

/// Like [`sanitize`], but a present non-finite field is an error instead of
/// being replaced. Missing fields still take the fallback.
pub fn sanitize_strict(
    raw: &RawInputs,
    fallback: &InputParameters,
) -> PropertyYieldResult<Sanitized> {
    let fields = [
        ("purchase_price", raw.purchase_price),
        ("cold_rent_monthly", raw.cold_rent_monthly),
        ("non_alloc_costs_monthly", raw.non_alloc_costs_monthly),
        ("equity", raw.equity),
        ("interest_rate_pct", raw.interest_rate_pct),
        ("initial_repayment_pct", raw.initial_repayment_pct),
        ("vacancy_pct", raw.vacancy_pct),
        ("closing_costs_pct", raw.closing_costs_pct),
        ("capex", raw.capex),
        ("reserves_monthly", raw.reserves_monthly),
    ];

    if let Some((name, _)) = fields
        .iter()
        .find(|(_, v)| v.is_some_and(|x| !x.is_finite()))
    {
        return Err(PropertyYieldError::NonFiniteInput {
            field: (*name).to_string(),
        });
    }

    Ok(sanitize(raw, fallback))
}

fn coerce(
    name: &str,
    value: Option<f64>,
    fallback: Decimal,
    bounds: FieldBounds,
    warnings: &mut Vec<String>,
) -> Decimal {
    let Some(raw) = value else {
        return fallback;
    };

    let Some(parsed) = finite_or_none(raw).and_then(Decimal::from_f64) else {
        warn!(field = name, value = raw, "non-finite input replaced by fallback");
        warnings.push(format!("{name}: {raw} is not a usable number, using {fallback}"));
        return fallback;
    };

    let clamped = parsed.clamp(bounds.min, bounds.max);
    if clamped != parsed {
        warn!(field = name, value = %parsed, clamped = %clamped, "input clamped to form bounds");
        warnings.push(format!(
            "{name}: {parsed} is outside [{}, {}], clamped to {clamped}",
            bounds.min, bounds.max
        ));
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> InputParameters {
        InputParameters {
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
        }
    }

    #[test]
    fn test_empty_raw_is_fallback() {
        let out = sanitize(&RawInputs::default(), &fallback());
        assert_eq!(out.inputs, fallback());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_finite_values_pass_through() {
        let raw = RawInputs {
            cold_rent_monthly: Some(1350.0),
            interest_rate_pct: Some(3.9),
            ..Default::default()
        };
        let out = sanitize(&raw, &fallback());
        assert_eq!(out.inputs.cold_rent_monthly, dec!(1350));
        assert_eq!(out.inputs.interest_rate_pct, dec!(3.9));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_non_finite_uses_fallback() {
        let raw = RawInputs {
            equity: Some(f64::NAN),
            capex: Some(f64::INFINITY),
            ..Default::default()
        };
        let out = sanitize(&raw, &fallback());
        assert_eq!(out.inputs.equity, dec!(60000));
        assert_eq!(out.inputs.capex, dec!(0));
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let raw = RawInputs {
            vacancy_pct: Some(45.0),
            interest_rate_pct: Some(-1.0),
            purchase_price: Some(1e15),
            ..Default::default()
        };
        let out = sanitize(&raw, &fallback());
        assert_eq!(out.inputs.vacancy_pct, dec!(30));
        assert_eq!(out.inputs.interest_rate_pct, Decimal::ZERO);
        assert_eq!(out.inputs.purchase_price, MONEY_CEILING);
        assert_eq!(out.warnings.len(), 3);
    }

    #[test]
    fn test_strict_rejects_nan() {
        let raw = RawInputs {
            vacancy_pct: Some(f64::NAN),
            ..Default::default()
        };
        let err = sanitize_strict(&raw, &fallback()).unwrap_err();
        assert!(matches!(err, PropertyYieldError::NonFiniteInput { ref field } if field == "vacancy_pct"));
    }

    #[test]
    fn test_strict_accepts_missing_fields() {
        let raw = RawInputs {
            equity: Some(80000.0),
            ..Default::default()
        };
        let out = sanitize_strict(&raw, &fallback()).unwrap();
        assert_eq!(out.inputs.equity, dec!(80000));
    }

    #[test]
    fn test_deserialize_partial_camel_case_document() {
        let json = r#"{ "coldRentMonthly": 950, "vacancyPct": null, "unknownField": 1 }"#;
        let raw: RawInputs = serde_json::from_str(json).unwrap();
        assert_eq!(raw.cold_rent_monthly, Some(950.0));
        assert_eq!(raw.vacancy_pct, None);

        let out = sanitize(&raw, &fallback());
        assert_eq!(out.inputs.cold_rent_monthly, dec!(950));
        assert_eq!(out.inputs.vacancy_pct, dec!(4));
    }

    #[test]
    fn test_finite_or_none() {
        assert_eq!(finite_or_none(1.5), Some(1.5));
        assert_eq!(finite_or_none(f64::NAN), None);
        assert_eq!(finite_or_none(f64::NEG_INFINITY), None);
    }
}
