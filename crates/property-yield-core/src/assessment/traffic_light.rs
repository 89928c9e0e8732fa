use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::breakeven::{MIN_CASH_ON_CASH, MIN_DSCR};
use crate::engine::ValuationResult;
use crate::types::Tone;

pub const REASON_NEGATIVE_CASHFLOW: &str = "Negative cashflow";
pub const REASON_LOW_DSCR: &str = "DSCR < 1.10";
pub const REASON_LOW_CASH_ON_CASH: &str = "Cash-on-cash < 6%";

/// Overall rating of a valuation against the three minimum thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub tone: Tone,
    pub label: String,
    pub hint: String,
    /// Failed checks in fixed order: cashflow, DSCR, cash-on-cash. Empty when green.
    pub reasons: Vec<String>,
}

impl TrafficLight {
    /// Number of checks passed (0 to 3).
    pub fn score(&self) -> usize {
        3 - self.reasons.len()
    }
}

/// Rate a valuation: all three checks passed is green, one failure is
/// yellow, two or more is red.
///
/// A debt-free property carries the DSCR sentinel of 99 and therefore always
/// passes the DSCR check.
pub fn assess(result: &ValuationResult) -> TrafficLight {
    let mut reasons: Vec<String> = Vec::new();

    if result.net_cashflow < Decimal::ZERO {
        reasons.push(REASON_NEGATIVE_CASHFLOW.into());
    }
    if result.dscr < MIN_DSCR {
        reasons.push(REASON_LOW_DSCR.into());
    }
    if result.cash_on_cash < MIN_CASH_ON_CASH {
        reasons.push(REASON_LOW_CASH_ON_CASH.into());
    }

    match reasons.len() {
        0 => TrafficLight {
            tone: Tone::Green,
            label: "Green".into(),
            hint: "Solid basis: cashflow, DSCR and return are all in the green range.".into(),
            reasons,
        },
        1 => TrafficLight {
            tone: Tone::Yellow,
            label: "Yellow".into(),
            hint: "Almost there: one metric is critical. Adjust interest, rent or vacancy."
                .into(),
            reasons,
        },
        _ => TrafficLight {
            tone: Tone::Red,
            label: "Red".into(),
            hint: "Risky: at least two metrics are weak.".into(),
            reasons,
        },
    }
}
