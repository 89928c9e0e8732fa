use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

use property_yield_core::analysis::{analyze_property, AnalysisInput};
use property_yield_core::assessment::{interest_headroom, rent_gap, InterestHeadroom, RentGap};
use property_yield_core::sanitize::{sanitize, RawInputs};
use property_yield_core::scenarios::presets::{find_preset, DEFAULT_INPUTS};
use property_yield_core::scenarios::sensitivity::SensitivityShift;
use property_yield_core::{
    breakeven_interest_pct, breakeven_rent_monthly, evaluate, with_metadata, InputParameters,
    InterestTarget, RentTarget,
};

use crate::input;

/// Where the property inputs come from, plus per-field overrides.
///
/// Precedence: `--input` file, then `--preset`, then piped stdin, then the
/// built-in default flat. Individual flags are applied last.
#[derive(Args, Debug, Clone)]
pub struct PropertyArgs {
    /// Path to JSON input file (snake_case or camelCase field names)
    #[arg(long)]
    pub input: Option<String>,

    /// Start from a built-in preset (see `pyield presets`)
    #[arg(long, conflicts_with = "input")]
    pub preset: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Monthly cold rent before vacancy
    #[arg(long, alias = "rent")]
    pub cold_rent_monthly: Option<Decimal>,

    /// Monthly costs that cannot be passed on to the tenant
    #[arg(long)]
    pub non_alloc_costs_monthly: Option<Decimal>,

    /// Equity invested
    #[arg(long)]
    pub equity: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 3.8)
    #[arg(long, alias = "interest")]
    pub interest_rate_pct: Option<Decimal>,

    /// Initial annual repayment in percent (e.g. 2.0)
    #[arg(long)]
    pub initial_repayment_pct: Option<Decimal>,

    /// Vacancy in percent
    #[arg(long)]
    pub vacancy_pct: Option<Decimal>,

    /// Closing costs in percent of the purchase price
    #[arg(long)]
    pub closing_costs_pct: Option<Decimal>,

    /// One-time capital expenditure
    #[arg(long)]
    pub capex: Option<Decimal>,

    /// Monthly maintenance reserve
    #[arg(long)]
    pub reserves_monthly: Option<Decimal>,
}

/// Rent break-even goals
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RentGoal {
    /// Monthly cashflow >= 0
    Cashflow0,
    /// DSCR >= 1.10
    Dscr110,
    /// Cash-on-cash >= 6%
    Coc6,
}

impl From<RentGoal> for RentTarget {
    fn from(goal: RentGoal) -> Self {
        match goal {
            RentGoal::Cashflow0 => RentTarget::CashflowNonNegative,
            RentGoal::Dscr110 => RentTarget::DscrAtLeast110,
            RentGoal::Coc6 => RentTarget::CashOnCashAtLeast6,
        }
    }
}

/// Interest break-even goals
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InterestGoal {
    /// DSCR >= 1.10
    Dscr110,
    /// Monthly cashflow >= 0
    Cashflow0,
}

impl From<InterestGoal> for InterestTarget {
    fn from(goal: InterestGoal) -> Self {
        match goal {
            InterestGoal::Dscr110 => InterestTarget::DscrAtLeast110,
            InterestGoal::Cashflow0 => InterestTarget::CashflowNonNegative,
        }
    }
}

/// Arguments for the rent break-even search
#[derive(Args)]
pub struct BreakevenRentArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Goal the rent has to reach
    #[arg(long, value_enum, default_value = "cashflow0")]
    pub target: RentGoal,
}

/// Arguments for the interest break-even search
#[derive(Args)]
pub struct BreakevenInterestArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Goal that must still hold at the maximum rate
    #[arg(long, value_enum, default_value = "dscr110")]
    pub target: InterestGoal,
}

/// Arguments for a full analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// What-if interest shift in percent points, -2 to 2
    #[arg(long, allow_hyphen_values = true)]
    pub interest_delta: Option<Decimal>,

    /// What-if rent shift in percent, -20 to 20
    #[arg(long, allow_hyphen_values = true)]
    pub rent_delta: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct RentBreakEvenOutput {
    target: &'static str,
    break_even_rent_monthly: Option<Decimal>,
    cold_rent_monthly: Decimal,
    gap: Option<RentGap>,
}

#[derive(Debug, Serialize)]
struct InterestBreakEvenOutput {
    target: &'static str,
    break_even_interest_pct: Option<Decimal>,
    interest_rate_pct: Decimal,
    headroom: Option<InterestHeadroom>,
}

/// Inputs ready for the engine plus any sanitisation notes.
pub struct LoadedInputs {
    pub inputs: InputParameters,
    pub warnings: Vec<String>,
}

pub fn load_inputs(args: &PropertyArgs) -> Result<LoadedInputs, Box<dyn std::error::Error>> {
    let mut warnings = Vec::new();

    let mut inputs = if let Some(ref path) = args.input {
        debug!(path = %path, "loading inputs from file");
        from_document(input::file::read_json_value(path)?, &mut warnings)?
    } else if let Some(ref id) = args.preset {
        debug!(preset = %id, "loading inputs from preset");
        find_preset(id)?.inputs
    } else if let Some(data) = input::stdin::read_stdin()? {
        debug!("loading inputs from stdin");
        from_document(data, &mut warnings)?
    } else {
        debug!("no input given, using the default flat");
        DEFAULT_INPUTS
    };

    apply_overrides(&mut inputs, args);
    Ok(LoadedInputs { inputs, warnings })
}

/// A complete document is taken as-is. Anything partial or drifted goes
/// through the form sanitiser with the default flat as fallback.
pub fn from_document(
    value: Value,
    warnings: &mut Vec<String>,
) -> Result<InputParameters, Box<dyn std::error::Error>> {
    if let Ok(inputs) = serde_json::from_value::<InputParameters>(value.clone()) {
        return Ok(inputs);
    }

    let raw: RawInputs = serde_json::from_value(value)
        .map_err(|e| format!("Not a property input document: {}", e))?;
    let clean = sanitize(&raw, &DEFAULT_INPUTS);
    warnings.extend(clean.warnings);
    Ok(clean.inputs)
}

fn apply_overrides(inputs: &mut InputParameters, args: &PropertyArgs) {
    let overrides = [
        (&mut inputs.purchase_price, args.purchase_price),
        (&mut inputs.cold_rent_monthly, args.cold_rent_monthly),
        (&mut inputs.non_alloc_costs_monthly, args.non_alloc_costs_monthly),
        (&mut inputs.equity, args.equity),
        (&mut inputs.interest_rate_pct, args.interest_rate_pct),
        (&mut inputs.initial_repayment_pct, args.initial_repayment_pct),
        (&mut inputs.vacancy_pct, args.vacancy_pct),
        (&mut inputs.closing_costs_pct, args.closing_costs_pct),
        (&mut inputs.capex, args.capex),
        (&mut inputs.reserves_monthly, args.reserves_monthly),
    ];
    for (field, value) in overrides {
        if let Some(v) = value {
            *field = v;
        }
    }
}

pub fn run_evaluate(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loaded = load_inputs(&args)?;
    let result = evaluate(&loaded.inputs);
    let output = with_metadata(
        "Rental Property Year-One Valuation",
        &loaded.inputs,
        loaded.warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_breakeven_rent(args: BreakevenRentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loaded = load_inputs(&args.property)?;
    let target = RentTarget::from(args.target);
    let current = loaded.inputs.cold_rent_monthly;

    let break_even = breakeven_rent_monthly(&loaded.inputs, target);
    let mut warnings = loaded.warnings;
    if break_even.is_none() {
        warnings.push(format!(
            "Target {} not reachable with any rent in the search range",
            target.as_str()
        ));
    }

    let output = RentBreakEvenOutput {
        target: target.as_str(),
        break_even_rent_monthly: break_even,
        cold_rent_monthly: current,
        gap: break_even.map(|r| rent_gap(r, current)),
    };
    Ok(serde_json::to_value(with_metadata(
        "Break-even Cold Rent (bisection)",
        &loaded.inputs,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))?)
}

pub fn run_breakeven_interest(
    args: BreakevenInterestArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loaded = load_inputs(&args.property)?;
    let target = InterestTarget::from(args.target);
    let current = loaded.inputs.interest_rate_pct;

    let break_even = breakeven_interest_pct(&loaded.inputs, target);
    let mut warnings = loaded.warnings;
    if break_even.is_none() {
        warnings.push(format!(
            "Target {} not met even at 0% interest",
            target.as_str()
        ));
    }

    let output = InterestBreakEvenOutput {
        target: target.as_str(),
        break_even_interest_pct: break_even,
        interest_rate_pct: current,
        headroom: break_even.map(|r| interest_headroom(r, current)),
    };
    Ok(serde_json::to_value(with_metadata(
        "Maximum Interest Rate (bisection)",
        &loaded.inputs,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loaded = load_inputs(&args.property)?;
    let mut warnings = loaded.warnings;

    let shift = if args.interest_delta.is_some() || args.rent_delta.is_some() {
        let requested = SensitivityShift {
            interest_delta_pct: args.interest_delta.unwrap_or(Decimal::ZERO),
            rent_delta_pct: args.rent_delta.unwrap_or(Decimal::ZERO),
        };
        let clamped = requested.clamped();
        if clamped != requested {
            warnings.push(format!(
                "Shift clamped to interest {:+} points, rent {:+}%",
                clamped.interest_delta_pct, clamped.rent_delta_pct
            ));
        }
        Some(clamped)
    } else {
        None
    };

    let mut output = analyze_property(&AnalysisInput {
        inputs: loaded.inputs,
        shift,
    });
    output.warnings.splice(0..0, warnings);
    Ok(serde_json::to_value(output)?)
}
