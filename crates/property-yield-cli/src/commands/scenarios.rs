use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::path::Path;

use property_yield_core::scenarios::compare::compare_properties;
use property_yield_core::scenarios::presets::{find_preset, PRESETS};
use property_yield_core::scenarios::sensitivity::{self, DeltaSweep, SensitivityInput};
use property_yield_core::InputParameters;

use super::property::{from_document, load_inputs, PropertyArgs};
use crate::input;

/// Arguments for an A/B comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Property A: path to a JSON input file or a preset id
    #[arg(long)]
    pub a: String,

    /// Property B: path to a JSON input file or a preset id
    #[arg(long)]
    pub b: String,
}

/// Arguments for the interest / rent sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub property: PropertyArgs,

    /// Interest shifts in percent points, as min:max:step
    #[arg(long, default_value = "-2:2:1", allow_hyphen_values = true)]
    pub interest_deltas: String,

    /// Rent shifts in percent, as min:max:step
    #[arg(long, default_value = "-20:20:10", allow_hyphen_values = true)]
    pub rent_deltas: String,
}

fn parse_sweep(spec: &str) -> Result<DeltaSweep, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Delta range must be min:max:step, got '{}'", spec).into());
    }
    Ok(DeltaSweep {
        min: parts[0].parse::<Decimal>()?,
        max: parts[1].parse::<Decimal>()?,
        step: parts[2].parse::<Decimal>()?,
    })
}

/// A comparison side is a file when one exists at that path, otherwise a
/// preset id.
fn load_side(
    source: &str,
    warnings: &mut Vec<String>,
) -> Result<InputParameters, Box<dyn std::error::Error>> {
    if Path::new(source).is_file() {
        from_document(input::file::read_json_value(source)?, warnings)
    } else {
        Ok(find_preset(source)?.inputs)
    }
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut warnings = Vec::new();
    let a = load_side(&args.a, &mut warnings)?;
    let b = load_side(&args.b, &mut warnings)?;

    let mut output = compare_properties(&a, &b);
    output.warnings.splice(0..0, warnings);
    Ok(serde_json::to_value(output)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loaded = load_inputs(&args.property)?;
    let input = SensitivityInput {
        inputs: loaded.inputs,
        interest_deltas: parse_sweep(&args.interest_deltas)?,
        rent_deltas: parse_sweep(&args.rent_deltas)?,
    };

    let mut output = sensitivity::run_sensitivity(&input)?;
    output.warnings.splice(0..0, loaded.warnings);
    Ok(serde_json::to_value(output)?)
}

/// One flat row per preset so tables and CSV stay readable.
pub fn run_presets() -> Result<Value, Box<dyn std::error::Error>> {
    let mut rows = Vec::with_capacity(PRESETS.len());
    for preset in PRESETS.iter() {
        let mut row = Map::new();
        row.insert("id".into(), Value::String(preset.id.into()));
        row.insert("label".into(), Value::String(preset.label.into()));
        if let Value::Object(fields) = serde_json::to_value(preset.inputs)? {
            row.extend(fields);
        }
        rows.push(Value::Object(row));
    }
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sweep() {
        let sweep = parse_sweep("-2:2:0.5").unwrap();
        assert_eq!(sweep.min, Decimal::from(-2));
        assert_eq!(sweep.step, Decimal::new(5, 1));
        assert!(parse_sweep("-2:2").is_err());
        assert!(parse_sweep("a:2:1").is_err());
    }

    #[test]
    fn test_compare_presets() {
        let value = run_compare(CompareArgs {
            a: "berlin-etw-starter".into(),
            b: "leipzig-etw-yield".into(),
        })
        .unwrap();
        assert_eq!(value["result"]["rows"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_compare_unknown_side() {
        let result = run_compare(CompareArgs {
            a: "berlin-etw-starter".into(),
            b: "no-such-preset".into(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_presets_rows_are_flat() {
        let value = run_presets().unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], "berlin-etw-starter");
        assert!(rows[0]["cold_rent_monthly"].is_string());
    }
}
