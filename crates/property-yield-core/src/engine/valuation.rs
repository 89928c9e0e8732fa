use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::InputParameters;
use crate::types::{Money, Percent, Ratio};

/// DSCR reported when there is no debt service (all-cash purchase).
///
/// Downstream threshold checks such as `dscr < 1.10` compare against this
/// exact value, so it must stay finite and fixed.
pub const DSCR_DEBT_FREE: Ratio = dec!(99);

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Financial metrics for one point in time (year one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Purchase price plus closing costs plus capex
    pub total_cost: Money,
    /// Financed amount, never negative
    pub loan: Money,
    /// Cold rent after vacancy
    pub effective_rent: Money,
    /// Monthly annuity payment (interest plus initial repayment)
    pub debt_service: Money,
    /// Monthly cashflow after costs, reserves and debt service
    pub net_cashflow: Money,
    /// `net_cashflow * 12`
    pub annual_net_cashflow: Money,
    /// Annual net cashflow over equity; 0 without positive equity
    pub cash_on_cash: Ratio,
    /// Operating income over debt service; [`DSCR_DEBT_FREE`] without debt
    pub dscr: Ratio,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly debt service on `loan` for the given interest and repayment rates.
///
/// Flat annuity approximation: the combined annual rate is applied to the
/// original loan and split over twelve months. Principal reduction over time
/// is not modelled.
pub fn annuity_monthly(loan: Money, interest_pct: Percent, repayment_pct: Percent) -> Money {
    let annual_rate = interest_pct.saturating_add(repayment_pct) / HUNDRED;
    loan.saturating_mul(annual_rate) / MONTHS_PER_YEAR
}

/// `a / b` clamped to `Decimal::MAX` / `Decimal::MIN` when the quotient does
/// not fit. `b` must be non-zero.
pub(crate) fn saturating_div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(if a.is_sign_negative() == b.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

/// Compute the year-one metrics for a property.
///
/// Total over every input `Decimal` can hold: never fails, never panics and
/// never validates. Intermediate values saturate at `Decimal::MAX` /
/// `Decimal::MIN` instead of overflowing. The two divisions are guarded by
/// sentinels (cash-on-cash 0 at non-positive equity, DSCR 99 at zero debt
/// service); a debt service so small that the DSCR overflows saturates too.
pub fn evaluate(inputs: &InputParameters) -> ValuationResult {
    let total_cost = inputs
        .purchase_price
        .saturating_mul(Decimal::ONE + inputs.closing_costs_pct / HUNDRED)
        .saturating_add(inputs.capex);

    let loan = total_cost.saturating_sub(inputs.equity).max(Decimal::ZERO);

    let effective_rent = inputs
        .cold_rent_monthly
        .saturating_mul(Decimal::ONE - inputs.vacancy_pct / HUNDRED);

    let debt_service = annuity_monthly(
        loan,
        inputs.interest_rate_pct,
        inputs.initial_repayment_pct,
    );

    let operating_income = effective_rent
        .saturating_sub(inputs.non_alloc_costs_monthly)
        .saturating_sub(inputs.reserves_monthly);
    let net_cashflow = operating_income.saturating_sub(debt_service);
    let annual_net_cashflow = net_cashflow.saturating_mul(MONTHS_PER_YEAR);

    let cash_on_cash = if inputs.equity > Decimal::ZERO {
        saturating_div(annual_net_cashflow, inputs.equity)
    } else {
        Decimal::ZERO
    };

    let dscr = if debt_service > Decimal::ZERO {
        saturating_div(operating_income, debt_service)
    } else {
        DSCR_DEBT_FREE
    };

    ValuationResult {
        total_cost,
        loan,
        effective_rent,
        debt_service,
        net_cashflow,
        annual_net_cashflow,
        cash_on_cash,
        dscr,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> InputParameters {
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

    fn approx(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_reference_scenario() {
        let r = evaluate(&sample_input());

        // 320000 * 1.10 + 0 = 352000
        assert_eq!(r.total_cost, dec!(352000));
        // 352000 - 60000
        assert_eq!(r.loan, dec!(292000));
        // 1100 * 0.96
        assert_eq!(r.effective_rent, dec!(1056));
        // 292000 * 0.058 / 12 = 1411.666...
        assert!(approx(r.debt_service, dec!(1411.67), dec!(0.01)));
        // 1056 - 120 - 1411.67
        assert!(approx(r.net_cashflow, dec!(-475.67), dec!(0.01)));
        assert_eq!(r.annual_net_cashflow, r.net_cashflow * dec!(12));
    }

    #[test]
    fn test_reference_scenario_ratios() {
        let r = evaluate(&sample_input());

        // 936 / 1411.67 ≈ 0.663
        assert!(approx(r.dscr, dec!(0.663), dec!(0.001)), "dscr {}", r.dscr);
        // -5708 / 60000 ≈ -0.0951
        assert!(
            approx(r.cash_on_cash, dec!(-0.0951), dec!(0.0001)),
            "coc {}",
            r.cash_on_cash
        );
    }

    #[test]
    fn test_fully_funded_uses_sentinels() {
        let mut input = sample_input();
        input.equity = dec!(352000);
        let r = evaluate(&input);

        assert_eq!(r.loan, Decimal::ZERO);
        assert_eq!(r.debt_service, Decimal::ZERO);
        assert_eq!(r.dscr, DSCR_DEBT_FREE);
        assert_eq!(r.net_cashflow, dec!(936));
        // equity is positive, so cash-on-cash is still 936 * 12 / 352000
        assert_eq!(r.cash_on_cash, dec!(11232) / dec!(352000));
    }

    #[test]
    fn test_equity_above_total_cost_clamps_loan() {
        let mut input = sample_input();
        input.equity = dec!(500000);
        let r = evaluate(&input);

        assert_eq!(r.loan, Decimal::ZERO);
        assert_eq!(r.dscr, dec!(99));
    }

    #[test]
    fn test_zero_equity_cash_on_cash_is_zero() {
        let mut input = sample_input();
        input.equity = Decimal::ZERO;
        let r = evaluate(&input);

        assert_eq!(r.cash_on_cash, Decimal::ZERO);
        assert_eq!(r.loan, dec!(352000));
    }

    #[test]
    fn test_negative_equity_still_zero_cash_on_cash() {
        let mut input = sample_input();
        input.equity = dec!(-1000);
        let r = evaluate(&input);

        assert_eq!(r.cash_on_cash, Decimal::ZERO);
        assert_eq!(r.loan, dec!(353000));
    }

    #[test]
    fn test_zero_rates_mean_no_debt_service() {
        let mut input = sample_input();
        input.interest_rate_pct = Decimal::ZERO;
        input.initial_repayment_pct = Decimal::ZERO;
        let r = evaluate(&input);

        assert_eq!(r.loan, dec!(292000));
        assert_eq!(r.debt_service, Decimal::ZERO);
        assert_eq!(r.dscr, DSCR_DEBT_FREE);
        assert_eq!(r.net_cashflow, dec!(936));
    }

    #[test]
    fn test_capex_and_reserves() {
        let mut input = sample_input();
        input.capex = dec!(8000);
        input.reserves_monthly = dec!(60);
        let r = evaluate(&input);

        assert_eq!(r.total_cost, dec!(360000));
        assert_eq!(r.loan, dec!(300000));
        // 300000 * 0.058 / 12 = 1450
        assert_eq!(r.debt_service, dec!(1450));
        // 1056 - 120 - 60 - 1450
        assert_eq!(r.net_cashflow, dec!(-574));
        // (1056 - 180) / 1450
        assert_eq!(r.dscr, dec!(876) / dec!(1450));
    }

    #[test]
    fn test_annuity_monthly() {
        // 300000 * 0.06 / 12
        assert_eq!(annuity_monthly(dec!(300000), dec!(4), dec!(2)), dec!(1500));
        assert_eq!(annuity_monthly(Decimal::ZERO, dec!(4), dec!(2)), Decimal::ZERO);
    }

    #[test]
    fn test_full_vacancy() {
        let mut input = sample_input();
        input.vacancy_pct = dec!(100);
        let r = evaluate(&input);

        assert_eq!(r.effective_rent, Decimal::ZERO);
        assert!(r.net_cashflow < Decimal::ZERO);
        assert!(r.dscr < Decimal::ZERO);
    }

    #[test]
    fn test_vanishing_debt_service_saturates_dscr() {
        // Loan of 1 at a rate of 2e-25 %: debt service is positive but so
        // small that the DSCR quotient does not fit in a Decimal.
        let mut input = sample_input();
        input.equity = dec!(351999);
        input.interest_rate_pct = dec!(0.0000000000000000000000002);
        input.initial_repayment_pct = Decimal::ZERO;
        let r = evaluate(&input);

        assert_eq!(r.loan, dec!(1));
        assert!(r.debt_service > Decimal::ZERO);
        assert_eq!(r.dscr, Decimal::MAX);
        assert_eq!(r.net_cashflow, dec!(936) - r.debt_service);
    }

    #[test]
    fn test_vanishing_debt_service_negative_income_saturates_low() {
        let mut input = sample_input();
        input.equity = dec!(351999);
        input.interest_rate_pct = dec!(0.0000000000000000000000002);
        input.initial_repayment_pct = Decimal::ZERO;
        input.non_alloc_costs_monthly = dec!(5000);
        let r = evaluate(&input);

        assert_eq!(r.dscr, Decimal::MIN);
    }

    #[test]
    fn test_huge_purchase_price_saturates() {
        let mut input = sample_input();
        input.purchase_price = dec!(75000000000000000000000000000);
        let r = evaluate(&input);

        assert_eq!(r.total_cost, Decimal::MAX);
        assert_eq!(r.loan, Decimal::MAX - dec!(60000));
        assert!(r.debt_service > Decimal::ZERO);
        assert!(r.net_cashflow < Decimal::ZERO);
        // 936 of income against ~3.8e26 of monthly debt service
        assert!(r.dscr > Decimal::ZERO && r.dscr < dec!(0.000001));
    }

    #[test]
    fn test_huge_rent_saturates_cashflow() {
        let mut input = sample_input();
        input.cold_rent_monthly = Decimal::MAX;
        input.vacancy_pct = Decimal::ZERO;
        let r = evaluate(&input);

        assert_eq!(r.effective_rent, Decimal::MAX);
        assert_eq!(r.annual_net_cashflow, Decimal::MAX);
        assert!(r.cash_on_cash > Decimal::ZERO);
    }

    #[test]
    fn test_tiny_equity_saturates_cash_on_cash() {
        let mut input = sample_input();
        input.equity = dec!(0.0000000000000000000000000001);
        let r = evaluate(&input);

        assert_eq!(r.cash_on_cash, Decimal::MIN);
    }

    #[test]
    fn test_sentinels_survive_extreme_inputs() {
        let mut input = sample_input();
        input.purchase_price = Decimal::MAX;
        input.equity = Decimal::MAX;
        input.closing_costs_pct = Decimal::ZERO;
        let r = evaluate(&input);
        assert_eq!(r.loan, Decimal::ZERO);
        assert_eq!(r.dscr, DSCR_DEBT_FREE);

        input.equity = Decimal::ZERO;
        let r = evaluate(&input);
        assert_eq!(r.cash_on_cash, Decimal::ZERO);
    }

    #[test]
    fn test_saturating_div_signs() {
        let tiny = dec!(0.0000000000000000000000000001);
        assert_eq!(saturating_div(dec!(1000), tiny), Decimal::MAX);
        assert_eq!(saturating_div(dec!(-1000), tiny), Decimal::MIN);
        assert_eq!(saturating_div(dec!(-1000), -tiny), Decimal::MAX);
        assert_eq!(saturating_div(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let input = sample_input();
        assert_eq!(evaluate(&input), evaluate(&input));
    }
}
