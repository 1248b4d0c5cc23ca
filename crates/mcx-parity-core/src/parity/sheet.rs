use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::error::ParityDeskError;
use crate::rounding::{parse_price, sanitize};
use crate::types::{with_metadata, ComputationOutput, Money, PLACEHOLDER};
use crate::ParityDeskResult;

use super::commodity::{Commodity, Instrument};
use super::engine::{compute_parity, ParityInputs, ParitySelection};

/// Price boxes on the parity sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParityField {
    Benchmark,
    UnitPrice,
    LocalFutures,
    Call,
    Put,
    Strike,
}

impl FromStr for ParityField {
    type Err = ParityDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "benchmark" | "cme" => Ok(ParityField::Benchmark),
            "unit_price" | "iu" => Ok(ParityField::UnitPrice),
            "local_futures" | "mcx_fut" => Ok(ParityField::LocalFutures),
            "call" | "ce" => Ok(ParityField::Call),
            "put" | "pe" => Ok(ParityField::Put),
            "strike" => Ok(ParityField::Strike),
            _ => Err(ParityDeskError::InvalidInput {
                field: "field".into(),
                reason: format!("unknown parity field '{s}'"),
            }),
        }
    }
}

/// Raw text held in each price box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityFields {
    pub benchmark: String,
    pub unit_price: String,
    pub local_futures: String,
    pub call: String,
    pub put: String,
    pub strike: String,
}

impl ParityFields {
    fn slot(&mut self, field: ParityField) -> &mut String {
        match field {
            ParityField::Benchmark => &mut self.benchmark,
            ParityField::UnitPrice => &mut self.unit_price,
            ParityField::LocalFutures => &mut self.local_futures,
            ParityField::Call => &mut self.call,
            ParityField::Put => &mut self.put,
            ParityField::Strike => &mut self.strike,
        }
    }

    pub fn parsed(&self) -> ParityInputs {
        ParityInputs {
            benchmark: parse_price(&self.benchmark),
            unit_price: parse_price(&self.unit_price),
            local_futures: parse_price(&self.local_futures),
            call: parse_price(&self.call),
            put: parse_price(&self.put),
            strike: parse_price(&self.strike),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ParityFields::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    NoCommodity,
    CommodityOnly,
    FullSelection,
}

/// Parity calculator state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParitySheet {
    pub commodity: Option<Commodity>,
    pub instrument: Option<Instrument>,
    #[serde(default)]
    pub fields: ParityFields,
}

/// One UI interaction with the parity calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParityEvent {
    SelectCommodity { commodity: Commodity },
    SelectInstrument { instrument: Instrument },
    SetField { field: ParityField, text: String },
    Reset,
}

impl ParitySheet {
    pub fn state(&self) -> SelectionState {
        match (self.commodity, self.instrument) {
            (None, _) => SelectionState::NoCommodity,
            (Some(_), None) => SelectionState::CommodityOnly,
            (Some(_), Some(_)) => SelectionState::FullSelection,
        }
    }

    pub fn selection(&self) -> ParitySelection {
        ParitySelection {
            commodity: self.commodity,
            instrument: self.instrument,
        }
    }

    /// Picking a commodity, even the current one, drops the instrument and
    /// every price.
    pub fn select_commodity(&mut self, commodity: Commodity) {
        self.commodity = Some(commodity);
        self.instrument = None;
        self.reset();
    }

    /// Only available once a commodity is chosen; clears every price.
    pub fn select_instrument(&mut self, instrument: Instrument) {
        if self.commodity.is_none() {
            return;
        }
        self.instrument = Some(instrument);
        self.reset();
    }

    /// Store sanitized text in a price box.
    pub fn set_field(&mut self, field: ParityField, text: &str) {
        *self.fields.slot(field) = sanitize(text);
    }

    /// Clear prices, keep the selection.
    pub fn reset(&mut self) {
        self.fields = ParityFields::default();
    }

    pub fn parity(&self) -> ParityDeskResult<Money> {
        compute_parity(&self.selection(), &self.fields.parsed())
    }

    /// Text for the result line: the parity or the placeholder.
    pub fn display(&self) -> String {
        match self.parity() {
            Ok(value) => value.to_string(),
            Err(_) => PLACEHOLDER.to_string(),
        }
    }

    pub fn apply(&mut self, event: &ParityEvent) {
        match event {
            ParityEvent::SelectCommodity { commodity } => self.select_commodity(*commodity),
            ParityEvent::SelectInstrument { instrument } => self.select_instrument(*instrument),
            ParityEvent::SetField { field, text } => self.set_field(*field, text),
            ParityEvent::Reset => self.reset(),
        }
    }
}

/// Sheet after a replayed session, with what its result line shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParitySessionOutput {
    pub sheet: ParitySheet,
    pub state: SelectionState,
    pub parity: Option<Money>,
    pub display: String,
}

/// Apply `events` in order to `sheet` and report the final state.
pub fn replay_parity(
    mut sheet: ParitySheet,
    events: &[ParityEvent],
) -> ComputationOutput<ParitySessionOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (i, event) in events.iter().enumerate() {
        if let ParityEvent::SelectInstrument { instrument } = event {
            if sheet.commodity.is_none() {
                warnings.push(format!(
                    "event {i}: {instrument} selected before a commodity; ignored"
                ));
            }
        }
        sheet.apply(event);
    }

    let parity = match sheet.parity() {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(e.to_string());
            None
        }
    };
    let display = parity.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string());

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Parity sheet replay",
        &serde_json::json!({ "events": events.len() }),
        warnings,
        elapsed,
        ParitySessionOutput {
            state: sheet.state(),
            sheet,
            parity,
            display,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gold_futures_sheet() -> ParitySheet {
        let mut sheet = ParitySheet::default();
        sheet.select_commodity(Commodity::Gold);
        sheet.select_instrument(Instrument::Futures);
        sheet.set_field(ParityField::Benchmark, "1950");
        sheet.set_field(ParityField::UnitPrice, "83");
        sheet.set_field(ParityField::LocalFutures, "58,000");
        sheet
    }

    #[test]
    fn test_state_transitions() {
        let mut sheet = ParitySheet::default();
        assert_eq!(sheet.state(), SelectionState::NoCommodity);

        sheet.select_instrument(Instrument::Options);
        assert_eq!(sheet.state(), SelectionState::NoCommodity);
        assert_eq!(sheet.instrument, None);

        sheet.select_commodity(Commodity::Silver);
        assert_eq!(sheet.state(), SelectionState::CommodityOnly);

        sheet.select_instrument(Instrument::Options);
        assert_eq!(sheet.state(), SelectionState::FullSelection);

        sheet.select_commodity(Commodity::Crude);
        assert_eq!(sheet.state(), SelectionState::CommodityOnly);
        assert_eq!(sheet.instrument, None);
    }

    #[test]
    fn test_sanitized_fields_compute() {
        let sheet = gold_futures_sheet();
        assert_eq!(sheet.fields.local_futures, "58000");
        assert_eq!(sheet.parity().unwrap(), dec!(50484.28));
        assert_eq!(sheet.display(), "50484.28");
    }

    #[test]
    fn test_commodity_change_clears_everything() {
        let mut sheet = gold_futures_sheet();
        sheet.select_commodity(Commodity::Gold);
        assert_eq!(sheet.instrument, None);
        assert!(sheet.fields.is_empty());
        assert_eq!(sheet.display(), PLACEHOLDER);
    }

    #[test]
    fn test_instrument_change_keeps_commodity() {
        let mut sheet = gold_futures_sheet();
        sheet.select_instrument(Instrument::Options);
        assert_eq!(sheet.commodity, Some(Commodity::Gold));
        assert!(sheet.fields.is_empty());
    }

    #[test]
    fn test_reset_keeps_selection() {
        let mut sheet = gold_futures_sheet();
        sheet.reset();
        assert_eq!(sheet.state(), SelectionState::FullSelection);
        assert!(sheet.fields.is_empty());
        assert!(sheet.parity().is_err());
    }

    #[test]
    fn test_zero_unit_price_shows_placeholder() {
        let mut sheet = gold_futures_sheet();
        sheet.set_field(ParityField::UnitPrice, "0");
        assert_eq!(sheet.display(), PLACEHOLDER);
    }

    #[test]
    fn test_apply_option_events() {
        let events: Vec<ParityEvent> = serde_json::from_str(
            r#"[
                {"type": "select_commodity", "commodity": "silver"},
                {"type": "select_instrument", "instrument": "Opt"},
                {"type": "set_field", "field": "benchmark", "text": "24"},
                {"type": "set_field", "field": "unit_price", "text": "83"},
                {"type": "set_field", "field": "strike", "text": "70000"},
                {"type": "set_field", "field": "call", "text": "2000"},
                {"type": "set_field", "field": "put", "text": "1500"}
            ]"#,
        )
        .unwrap();
        let mut sheet = ParitySheet::default();
        for e in &events {
            sheet.apply(e);
        }
        assert_eq!(sheet.parity().unwrap(), dec!(70410.06));
    }

    #[test]
    fn test_replay_parity_placeholder() {
        let events = [
            ParityEvent::SelectInstrument {
                instrument: Instrument::Futures,
            },
            ParityEvent::SelectCommodity {
                commodity: Commodity::Gold,
            },
        ];
        let out = replay_parity(ParitySheet::default(), &events);
        assert_eq!(out.result.state, SelectionState::CommodityOnly);
        assert_eq!(out.result.parity, None);
        assert_eq!(out.result.display, PLACEHOLDER);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[1].starts_with("Incomplete selection"));
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("IU".parse::<ParityField>().unwrap(), ParityField::UnitPrice);
        assert_eq!("mcx-fut".parse::<ParityField>().unwrap(), ParityField::LocalFutures);
        assert!("delta".parse::<ParityField>().is_err());
    }
}
