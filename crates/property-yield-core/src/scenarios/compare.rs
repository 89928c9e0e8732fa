use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::{assess, TrafficLight};
use crate::engine::{evaluate, InputParameters, ValuationResult};
use crate::types::{with_metadata, ComputationOutput, Money};

pub const STEP_EFFECTIVE_RENT: &str = "Effective rent";
pub const STEP_COSTS: &str = "Costs";
pub const STEP_FINANCING: &str = "Financing";
pub const STEP_CASHFLOW: &str = "Cashflow";

/// One bar of the monthly cashflow waterfall. Outflows are negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub name: String,
    pub value: Money,
}

/// One waterfall bar for two properties side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub a: Money,
    pub b: Money,
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedProperty {
    pub inputs: InputParameters,
    pub result: ValuationResult,
    pub light: TrafficLight,
}

/// Two properties evaluated and rated with the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub a: ComparedProperty,
    pub b: ComparedProperty,
    pub rows: Vec<ComparisonRow>,
    /// Monthly net cashflow of B minus A
    pub net_cashflow_difference: Money,
}

/// Break the monthly cashflow down into rent, costs, financing and result.
///
/// Costs and financing are negated so the first three bars sum to the last.
pub fn waterfall(inputs: &InputParameters, result: &ValuationResult) -> Vec<WaterfallStep> {
    vec![
        WaterfallStep {
            name: STEP_EFFECTIVE_RENT.into(),
            value: result.effective_rent,
        },
        WaterfallStep {
            name: STEP_COSTS.into(),
            value: -inputs
                .non_alloc_costs_monthly
                .saturating_add(inputs.reserves_monthly),
        },
        WaterfallStep {
            name: STEP_FINANCING.into(),
            value: -result.debt_service,
        },
        WaterfallStep {
            name: STEP_CASHFLOW.into(),
            value: result.net_cashflow,
        },
    ]
}

/// Evaluate and rate two properties and line up their waterfalls.
pub fn compare(a: &InputParameters, b: &InputParameters) -> Comparison {
    let side = |inputs: &InputParameters| {
        let result = evaluate(inputs);
        ComparedProperty {
            inputs: *inputs,
            result,
            light: assess(&result),
        }
    };
    let a = side(a);
    let b = side(b);

    let rows = waterfall(&a.inputs, &a.result)
        .into_iter()
        .zip(waterfall(&b.inputs, &b.result))
        .map(|(sa, sb)| ComparisonRow {
            name: sa.name,
            a: sa.value,
            b: sb.value,
        })
        .collect();

    let net_cashflow_difference = b
        .result
        .net_cashflow
        .saturating_sub(a.result.net_cashflow);

    Comparison {
        a,
        b,
        rows,
        net_cashflow_difference,
    }
}

/// [`compare`] wrapped in the standard output envelope.
pub fn compare_properties(a: &InputParameters, b: &InputParameters) -> ComputationOutput<Comparison> {
    let start = Instant::now();
    let comparison = compare(a, b);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "A/B Property Comparison (Year-One Snapshot)",
        &serde_json::json!({ "a": a, "b": b }),
        Vec::new(),
        elapsed,
        comparison,
    )
}
