use pretty_assertions::assert_eq;
use property_yield_core::analysis::{analyze_property, AnalysisInput};
use property_yield_core::assessment::{assess, compute_break_even};
use property_yield_core::engine::{breakeven, valuation};
use property_yield_core::sanitize::{sanitize, RawInputs};
use property_yield_core::scenarios::presets::{find_preset, DEFAULT_INPUTS, PRESETS};
use property_yield_core::scenarios::sensitivity::SensitivityShift;
use property_yield_core::{InputParameters, InterestTarget, RentTarget, Tone};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference() -> InputParameters {
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

// ===========================================================================
// Valuation
// ===========================================================================

#[test]
fn test_reference_flat_year_one() {
    let r = valuation::evaluate(&reference());

    assert_eq!(r.total_cost, dec!(352000));
    assert_eq!(r.loan, dec!(292000));
    assert_eq!(r.effective_rent, dec!(1056));
    // 292000 * 0.058 / 12 = 1411.666...
    assert!((r.debt_service - dec!(1411.6667)).abs() < dec!(0.0001));
    assert!(
        (r.net_cashflow - dec!(-475.67)).abs() < dec!(0.01),
        "Expected cashflow ~-475.67, got {}",
        r.net_cashflow
    );
}

#[test]
fn test_reference_flat_fully_funded() {
    let mut input = reference();
    input.equity = dec!(352000);
    let r = valuation::evaluate(&input);

    assert_eq!(r.loan, Decimal::ZERO);
    assert_eq!(r.debt_service, Decimal::ZERO);
    assert_eq!(r.dscr, dec!(99));
    // Equity is still positive, so cash-on-cash is the unlevered yield
    // 936 * 12 / 352000 ≈ 3.19%
    assert!((r.cash_on_cash - dec!(0.0319)).abs() < dec!(0.0001));
}

#[test]
fn test_defaults_match_reference() {
    assert_eq!(DEFAULT_INPUTS, reference());
}

// ===========================================================================
// Break-even
// ===========================================================================

#[test]
fn test_break_even_round_trip_all_presets() {
    for preset in PRESETS.iter() {
        let base = preset.inputs;
        let rent = breakeven::breakeven_rent_monthly(&base, RentTarget::CashflowNonNegative)
            .unwrap_or_else(|| panic!("{} should have a rent break-even", preset.id));
        let r = valuation::evaluate(&base.with_cold_rent(rent));
        assert!(r.net_cashflow >= Decimal::ZERO, "{}: {}", preset.id, r.net_cashflow);
        assert!(r.net_cashflow < dec!(0.001), "{}: {}", preset.id, r.net_cashflow);
    }
}

#[test]
fn test_coc_target_unreachable_with_huge_costs() {
    let mut base = reference();
    base.non_alloc_costs_monthly = dec!(50000);
    assert_eq!(
        breakeven::breakeven_rent_monthly(&base, RentTarget::CashOnCashAtLeast6),
        None
    );
}

#[test]
fn test_interest_solver_ceiling_and_floor() {
    let mut rich = reference();
    rich.cold_rent_monthly = dec!(6000);
    assert_eq!(
        breakeven::breakeven_interest_pct(&rich, InterestTarget::DscrAtLeast110),
        Some(dec!(15))
    );

    let mut poor = reference();
    poor.cold_rent_monthly = dec!(100);
    assert_eq!(
        breakeven::breakeven_interest_pct(&poor, InterestTarget::CashflowNonNegative),
        None
    );
}

#[test]
fn test_summary_is_monotone_in_strictness() {
    let be = compute_break_even(&find_preset("mfh-semi-pro").unwrap().inputs);
    let cf = be.cashflow0.unwrap();
    let coc = be.coc6.unwrap();
    assert!(cf <= coc);
}

// ===========================================================================
// Full analysis
// ===========================================================================

#[test]
fn test_analysis_from_persisted_form_state() {
    // Browser state with a corrupted field and one missing field
    let json = r#"{
        "purchasePrice": 220000,
        "coldRentMonthly": 950,
        "nonAllocCostsMonthly": 140,
        "equity": null,
        "interestRatePct": 3.8,
        "initialRepaymentPct": 2.2,
        "vacancyPct": 5,
        "closingCostsPct": 10,
        "capex": 5000
    }"#;
    let raw: RawInputs = serde_json::from_str(json).unwrap();
    let fallback = find_preset("leipzig-etw-yield").unwrap().inputs;
    let clean = sanitize(&raw, &fallback);
    assert_eq!(clean.inputs, fallback);

    let out = analyze_property(&AnalysisInput {
        inputs: clean.inputs,
        shift: None,
    });
    assert_eq!(
        out.result.traffic_light,
        assess(&valuation::evaluate(&fallback))
    );
}

#[test]
fn test_analysis_with_optimistic_shift_improves_light() {
    let mut inputs = reference();
    inputs.cold_rent_monthly = dec!(1600);

    let plain = analyze_property(&AnalysisInput {
        inputs,
        shift: None,
    });
    let shifted = analyze_property(&AnalysisInput {
        inputs,
        shift: Some(SensitivityShift {
            interest_delta_pct: dec!(-2),
            rent_delta_pct: dec!(20),
        }),
    });

    assert_eq!(plain.result.traffic_light.tone, Tone::Red);
    assert_eq!(shifted.result.traffic_light.tone, Tone::Green);
    assert_eq!(
        shifted.result.simulated_inputs.interest_rate_pct,
        dec!(1.8)
    );
}

#[test]
fn test_analysis_serializes_unreachable_as_null() {
    let mut inputs = reference();
    inputs.non_alloc_costs_monthly = dec!(50000);
    let out = analyze_property(&AnalysisInput {
        inputs,
        shift: None,
    });
    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["break_even"]["coc6"].is_null());
    assert!(json["result"]["rent_gaps"]["coc6"].is_null());
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
}
