use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::rounding::parse_price;
use crate::types::{with_metadata, ComputationOutput};

use super::converter::{compute_result_row, derive_quantities, AutoValues, ResultRow, UserValues};
use super::profiles::{Column, InstrumentProfile};

/// Quantity calculator state: the active profile plus both rows of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantitySheet {
    pub profile: InstrumentProfile,
    #[serde(default)]
    pub auto: AutoValues,
    #[serde(default)]
    pub user: UserValues,
}

/// One UI interaction with the quantity calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuantityEvent {
    SelectProfile { profile: InstrumentProfile },
    SetReference { text: String },
    SetObserved { column: Column, text: String },
    Reset,
}

impl QuantitySheet {
    pub fn new(profile: InstrumentProfile) -> Self {
        QuantitySheet {
            profile,
            ..Default::default()
        }
    }

    /// Switch instrument class. Values never carry over, even when the same
    /// profile is picked again.
    pub fn select_profile(&mut self, profile: InstrumentProfile) {
        self.profile = profile;
        self.reset();
    }

    /// Recompute every derived column from the reference text.
    pub fn set_reference(&mut self, text: &str) {
        self.auto = derive_quantities(parse_price(text), self.profile);
    }

    /// Record an observed value. Blank or non-numeric text unsets the column.
    /// Columns outside the active profile are ignored.
    pub fn set_observed(&mut self, column: Column, text: &str) {
        if !self.profile.has_column(column) {
            return;
        }
        match parse_price(text) {
            Some(value) => {
                self.user.insert(column, value);
            }
            None => {
                self.user.remove(&column);
            }
        }
    }

    pub fn reset(&mut self) {
        self.auto.clear();
        self.user.clear();
    }

    pub fn result_row(&self) -> ResultRow {
        compute_result_row(&self.auto, &self.user)
    }

    pub fn apply(&mut self, event: &QuantityEvent) {
        match event {
            QuantityEvent::SelectProfile { profile } => self.select_profile(*profile),
            QuantityEvent::SetReference { text } => self.set_reference(text),
            QuantityEvent::SetObserved { column, text } => self.set_observed(*column, text),
            QuantityEvent::Reset => self.reset(),
        }
    }
}

/// Sheet after a replayed session, with the result row it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySessionOutput {
    pub sheet: QuantitySheet,
    pub result_row: ResultRow,
}

/// Apply `events` in order to `sheet` and report the final state.
pub fn replay_quantity(
    mut sheet: QuantitySheet,
    events: &[QuantityEvent],
) -> ComputationOutput<QuantitySessionOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (i, event) in events.iter().enumerate() {
        if let QuantityEvent::SetObserved { column, .. } = event {
            if !sheet.profile.has_column(*column) {
                warnings.push(format!(
                    "event {i}: column {column} is not part of {}; ignored",
                    sheet.profile.label()
                ));
            }
        }
        sheet.apply(event);
    }

    let result_row = sheet.result_row();
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Quantity sheet replay",
        &serde_json::json!({ "events": events.len() }),
        warnings,
        elapsed,
        QuantitySessionOutput { sheet, result_row },
    )
}
