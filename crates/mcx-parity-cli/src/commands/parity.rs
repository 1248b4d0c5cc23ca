use clap::Args;
use serde_json::Value;

use mcx_parity_core::parity::commodity::{Commodity, Instrument};
use mcx_parity_core::parity::engine::{self, ParityInput};

use crate::input;

/// Arguments for parity calculation
#[derive(Args)]
pub struct ParityArgs {
    /// Commodity: gold, silver, crude or natgas
    #[arg(long)]
    pub commodity: Option<Commodity>,

    /// Local instrument: futures or options
    #[arg(long)]
    pub instrument: Option<Instrument>,

    /// CME benchmark price
    #[arg(long, alias = "cme")]
    pub benchmark: Option<String>,

    /// IU price used for unit/currency conversion
    #[arg(long, alias = "iu")]
    pub unit_price: Option<String>,

    /// MCX futures price (futures only)
    #[arg(long, alias = "mcx-fut")]
    pub local_futures: Option<String>,

    /// MCX call premium (options only)
    #[arg(long, alias = "ce")]
    pub call: Option<String>,

    /// MCX put premium (options only)
    #[arg(long, alias = "pe")]
    pub put: Option<String>,

    /// Option strike (options only)
    #[arg(long)]
    pub strike: Option<String>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_parity(args: ParityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let p_input: ParityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ParityInput {
            commodity: Some(args.commodity.ok_or("--commodity is required (or provide --input)")?),
            instrument: Some(
                args.instrument
                    .ok_or("--instrument is required (or provide --input)")?,
            ),
            benchmark: args.benchmark,
            unit_price: args.unit_price,
            local_futures: args.local_futures,
            call: args.call,
            put: args.put,
            strike: args.strike,
        }
    };
    let result = engine::analyze_parity(&p_input)?;
    Ok(serde_json::to_value(result)?)
}
