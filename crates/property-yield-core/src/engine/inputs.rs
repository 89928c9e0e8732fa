use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Property and financing parameters for a single snapshot calculation.
///
/// The engine takes these as-is: nothing is clamped or validated, so negative
/// or absurd values propagate through the formulas. Callers holding untrusted
/// numbers (form fields, persisted state) should go through
/// [`crate::sanitize`] first.
///
/// Field names serialise in snake_case; the camelCase spellings used by the
/// browser form state are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputParameters {
    /// Purchase price of the property
    #[serde(alias = "purchasePrice")]
    pub purchase_price: Money,
    /// Nominal monthly rent before vacancy
    #[serde(alias = "coldRentMonthly")]
    pub cold_rent_monthly: Money,
    /// Monthly costs that cannot be passed on to the tenant
    #[serde(alias = "nonAllocCostsMonthly")]
    pub non_alloc_costs_monthly: Money,
    /// Equity invested
    pub equity: Money,
    /// Annual nominal interest rate in percent points
    #[serde(alias = "interestRatePct")]
    pub interest_rate_pct: Percent,
    /// Initial annual repayment (amortisation) rate in percent points
    #[serde(alias = "initialRepaymentPct")]
    pub initial_repayment_pct: Percent,
    /// Assumed vacancy in percent points
    #[serde(alias = "vacancyPct")]
    pub vacancy_pct: Percent,
    /// Closing costs (transfer tax, notary, broker) in percent of the price
    #[serde(alias = "closingCostsPct")]
    pub closing_costs_pct: Percent,
    /// One-time capital expenditure added to the total cost
    pub capex: Money,
    /// Monthly maintenance reserve
    #[serde(alias = "reservesMonthly")]
    pub reserves_monthly: Money,
}

impl InputParameters {
    /// Copy of these inputs with a different monthly cold rent.
    pub fn with_cold_rent(&self, cold_rent_monthly: Money) -> Self {
        Self {
            cold_rent_monthly,
            ..*self
        }
    }

    /// Copy of these inputs with a different annual interest rate.
    pub fn with_interest_rate(&self, interest_rate_pct: Percent) -> Self {
        Self {
            interest_rate_pct,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> InputParameters {
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
    fn test_with_cold_rent_only_touches_rent() {
        let base = sample();
        let changed = base.with_cold_rent(dec!(1500));
        assert_eq!(changed.cold_rent_monthly, dec!(1500));
        assert_eq!(changed.with_cold_rent(dec!(1100)), base);
    }

    #[test]
    fn test_with_interest_rate_only_touches_rate() {
        let base = sample();
        let changed = base.with_interest_rate(dec!(5.1));
        assert_eq!(changed.interest_rate_pct, dec!(5.1));
        assert_eq!(changed.purchase_price, base.purchase_price);
        assert_eq!(changed.with_interest_rate(dec!(3.8)), base);
    }

    #[test]
    fn test_deserialize_camel_case_form_state() {
        let json = r#"{
            "purchasePrice": "320000",
            "coldRentMonthly": "1100",
            "nonAllocCostsMonthly": "120",
            "equity": "60000",
            "interestRatePct": "3.8",
            "initialRepaymentPct": "2.0",
            "vacancyPct": "4",
            "closingCostsPct": "10",
            "capex": "0",
            "reservesMonthly": "0"
        }"#;
        let parsed: InputParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_deserialize_snake_case_numbers() {
        let json = r#"{
            "purchase_price": 320000,
            "cold_rent_monthly": 1100,
            "non_alloc_costs_monthly": 120,
            "equity": 60000,
            "interest_rate_pct": 3.8,
            "initial_repayment_pct": 2.0,
            "vacancy_pct": 4,
            "closing_costs_pct": 10,
            "capex": 0,
            "reserves_monthly": 0
        }"#;
        let parsed: InputParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.interest_rate_pct, dec!(3.8));
        assert_eq!(parsed.cold_rent_monthly, dec!(1100));
    }
}
