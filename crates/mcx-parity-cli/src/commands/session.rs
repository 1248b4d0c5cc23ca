use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use mcx_parity_core::parity::sheet::{self as parity_sheet, ParityEvent, ParitySheet};
use mcx_parity_core::quantity::sheet::{self as quantity_sheet, QuantityEvent, QuantitySheet};

use crate::input;

/// Arguments for replaying calculator events
#[derive(Args)]
pub struct SessionArgs {
    /// Path to JSON/YAML session file
    #[arg(long)]
    pub input: Option<String>,
}

/// A recorded session: which calculator, its starting state, and the events.
#[derive(Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
enum SessionScript {
    Quantity {
        #[serde(default)]
        sheet: QuantitySheet,
        events: Vec<QuantityEvent>,
    },
    Parity {
        #[serde(default)]
        sheet: ParitySheet,
        events: Vec<ParityEvent>,
    },
}

pub fn run_session(args: SessionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let script: SessionScript = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <session.json> or stdin required for session replay".into());
    };

    let value = match script {
        SessionScript::Quantity { sheet, events } => {
            serde_json::to_value(quantity_sheet::replay_quantity(sheet, &events))?
        }
        SessionScript::Parity { sheet, events } => {
            serde_json::to_value(parity_sheet::replay_parity(sheet, &events))?
        }
    };
    Ok(value)
}
