use clap::Args;
use serde_json::Value;
use std::collections::BTreeMap;

use mcx_parity_core::quantity::converter::{self, QuantityInput};
use mcx_parity_core::quantity::profiles::{self, InstrumentProfile};

use crate::input;

/// Arguments for the quantity table
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct QuantityArgs {
    /// Instrument profile: goldOpt, goldFut, silverOpt or silverFut
    #[arg(long, default_value = "goldOpt")]
    pub profile: InstrumentProfile,

    /// CME reference price
    #[arg(long, alias = "cme")]
    pub reference: Option<String>,

    /// Observed value for one column, e.g. --observed CE=-5800 (repeatable)
    #[arg(long, value_name = "COLUMN=VALUE")]
    pub observed: Vec<String>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_observed(pairs: &[String]) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    pairs
        .iter()
        .map(|pair| -> Result<(String, String), Box<dyn std::error::Error>> {
            let (column, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("--observed expects COLUMN=VALUE, got '{pair}'"))?;
            Ok((column.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

pub fn run_quantity(args: QuantityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let q_input: QuantityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        QuantityInput {
            profile: args.profile,
            reference: args.reference,
            observed: parse_observed(&args.observed)?,
        }
    };
    let result = converter::analyze_quantities(&q_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_profiles() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(profiles::list_profiles())?)
}
