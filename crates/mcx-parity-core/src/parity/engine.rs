use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ParityDeskError;
use crate::rounding::{parse_price, round2, to_float};
use crate::types::{with_metadata, ComputationOutput, Money, PLACEHOLDER};
use crate::ParityDeskResult;

use super::commodity::{Commodity, Instrument};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Commodity and instrument chosen on the sheet. Either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParitySelection {
    pub commodity: Option<Commodity>,
    pub instrument: Option<Instrument>,
}

impl ParitySelection {
    pub fn new(commodity: Commodity, instrument: Instrument) -> Self {
        ParitySelection {
            commodity: Some(commodity),
            instrument: Some(instrument),
        }
    }

    /// Both halves, or the reason the selection cannot be priced.
    pub fn complete(&self) -> ParityDeskResult<(Commodity, Instrument)> {
        match (self.commodity, self.instrument) {
            (Some(c), Some(i)) => Ok((c, i)),
            (None, _) => Err(ParityDeskError::IncompleteSelection(
                "choose a commodity".into(),
            )),
            (Some(_), None) => Err(ParityDeskError::IncompleteSelection(
                "choose futures or options".into(),
            )),
        }
    }
}

/// Parsed prices. Unset fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParityInputs {
    /// CME price.
    pub benchmark: Option<Money>,
    /// IU price used for the currency/unit conversion.
    pub unit_price: Option<Money>,
    /// MCX futures price.
    pub local_futures: Option<Money>,
    /// MCX call premium (CE).
    pub call: Option<Money>,
    /// MCX put premium (PE).
    pub put: Option<Money>,
    pub strike: Option<Money>,
}

fn required(value: Option<Money>, field: &str) -> ParityDeskResult<f64> {
    value
        .map(to_float)
        .filter(|v| !v.is_nan())
        .ok_or_else(|| ParityDeskError::missing(field))
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Intermediate values behind a parity figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityBreakdown {
    pub commodity: Commodity,
    pub instrument: Instrument,
    /// CME price converted into MCX terms, rounded for display.
    pub cme_rate: Money,
    /// MCX futures price, or call - put + strike for options.
    pub local_rate: Money,
    /// local_rate - cme_rate, computed before rounding either side.
    pub parity: Money,
}

/// Compute parity along with the converted CME rate and the local rate.
///
/// Step 1 checks the CME and IU prices; a zero CME price counts as not
/// entered and a zero IU price is refused before it reaches the division.
/// Step 2 converts the CME price with the commodity's scale. Step 3 takes the
/// local rate from the futures quote or, for options, from put-call parity.
pub fn parity_breakdown(
    selection: &ParitySelection,
    inputs: &ParityInputs,
) -> ParityDeskResult<ParityBreakdown> {
    let (commodity, instrument) = selection.complete()?;

    let benchmark = required(inputs.benchmark, "benchmark")?;
    if benchmark == 0.0 {
        return Err(ParityDeskError::missing("benchmark"));
    }
    let unit_price = required(inputs.unit_price, "unit_price")?;
    if unit_price == 0.0 {
        return Err(ParityDeskError::DivisionByZero {
            context: "unit conversion (10000 / unit_price)".into(),
        });
    }

    let cme_rate = commodity.benchmark_rate(benchmark, unit_price);

    let local_rate = match instrument {
        Instrument::Futures => required(inputs.local_futures, "local_futures")?,
        Instrument::Options => {
            let call = required(inputs.call, "call")?;
            let put = required(inputs.put, "put")?;
            let strike = required(inputs.strike, "strike")?;
            call - put + strike
        }
    };

    let not_finite = |field: &str| ParityDeskError::InvalidInput {
        field: field.into(),
        reason: "result is outside the representable range".into(),
    };

    Ok(ParityBreakdown {
        commodity,
        instrument,
        cme_rate: round2(cme_rate).ok_or_else(|| not_finite("cme_rate"))?,
        local_rate: round2(local_rate).ok_or_else(|| not_finite("local_rate"))?,
        parity: round2(local_rate - cme_rate).ok_or_else(|| not_finite("parity"))?,
    })
}

/// Parity between the local market and the converted CME price, rounded to
/// two places. Every `Err` means "not yet computable"; hosts render it as a
/// placeholder rather than a fault.
pub fn compute_parity(selection: &ParitySelection, inputs: &ParityInputs) -> ParityDeskResult<Money> {
    parity_breakdown(selection, inputs).map(|b| b.parity)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Input for a one-shot parity calculation. Prices are given as typed text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParityInput {
    pub commodity: Option<Commodity>,
    pub instrument: Option<Instrument>,
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub unit_price: Option<String>,
    #[serde(default)]
    pub local_futures: Option<String>,
    #[serde(default)]
    pub call: Option<String>,
    #[serde(default)]
    pub put: Option<String>,
    #[serde(default)]
    pub strike: Option<String>,
}

impl ParityInput {
    pub fn selection(&self) -> ParitySelection {
        ParitySelection {
            commodity: self.commodity,
            instrument: self.instrument,
        }
    }

    pub fn parsed(&self) -> ParityInputs {
        let p = |v: &Option<String>| v.as_deref().and_then(parse_price);
        ParityInputs {
            benchmark: p(&self.benchmark),
            unit_price: p(&self.unit_price),
            local_futures: p(&self.local_futures),
            call: p(&self.call),
            put: p(&self.put),
            strike: p(&self.strike),
        }
    }
}

/// Output of a parity calculation. `parity` is `None` when inputs are
/// incomplete; `display` then carries the placeholder text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityOutput {
    pub commodity: Commodity,
    pub instrument: Instrument,
    pub cme_rate: Option<Money>,
    pub local_rate: Option<Money>,
    pub parity: Option<Money>,
    pub display: String,
}

/// Run the parity calculation and wrap it in the standard envelope.
///
/// An incomplete selection is an error: there is nothing to show. Missing or
/// zero prices produce a successful output with a blank parity and the
/// reason in `warnings`.
pub fn analyze_parity(input: &ParityInput) -> ParityDeskResult<ComputationOutput<ParityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let selection = input.selection();
    let (commodity, instrument) = selection.complete()?;
    let inputs = input.parsed();

    let ignored: &[(&str, &Option<String>)] = match instrument {
        Instrument::Futures => &[
            ("call", &input.call),
            ("put", &input.put),
            ("strike", &input.strike),
        ],
        Instrument::Options => &[("local_futures", &input.local_futures)],
    };
    for (field, value) in ignored {
        if value.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            warnings.push(format!("{field} is not used for {instrument}; ignored"));
        }
    }

    let output = match parity_breakdown(&selection, &inputs) {
        Ok(b) => ParityOutput {
            commodity,
            instrument,
            cme_rate: Some(b.cme_rate),
            local_rate: Some(b.local_rate),
            parity: Some(b.parity),
            display: b.parity.to_string(),
        },
        Err(e) => {
            warnings.push(e.to_string());
            ParityOutput {
                commodity,
                instrument,
                cme_rate: None,
                local_rate: None,
                parity: None,
                display: PLACEHOLDER.to_string(),
            }
        }
    };

    let scale = commodity.scale();
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match instrument {
            Instrument::Futures => "Parity = MCX futures - (CME / divisor) * factor * (10000 / IU)",
            Instrument::Options => {
                "Parity = (CE - PE + strike) - (CME / divisor) * factor * (10000 / IU)"
            }
        },
        &serde_json::json!({
            "commodity": commodity,
            "instrument": instrument,
            "divisor": scale.divisor,
            "unit_factor": scale.unit_factor,
            "benchmark": inputs.benchmark.map(|v| v.to_string()),
            "unit_price": inputs.unit_price.map(|v| v.to_string()),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn futures_inputs(benchmark: Money, unit: Money, local: Money) -> ParityInputs {
        ParityInputs {
            benchmark: Some(benchmark),
            unit_price: Some(unit),
            local_futures: Some(local),
            ..Default::default()
        }
    }

    fn options_inputs(benchmark: Money, unit: Money, call: Money, put: Money, strike: Money) -> ParityInputs {
        ParityInputs {
            benchmark: Some(benchmark),
            unit_price: Some(unit),
            call: Some(call),
            put: Some(put),
            strike: Some(strike),
            ..Default::default()
        }
    }

    #[test]
    fn test_gold_futures() {
        let sel = ParitySelection::new(Commodity::Gold, Instrument::Futures);
        let b = parity_breakdown(&sel, &futures_inputs(dec!(1950), dec!(83), dec!(58000))).unwrap();
        assert_eq!(b.cme_rate, dec!(7515.72));
        assert_eq!(b.local_rate, dec!(58000));
        assert_eq!(b.parity, dec!(50484.28));
    }

    #[test]
    fn test_silver_options_put_call_parity() {
        let sel = ParitySelection::new(Commodity::Silver, Instrument::Options);
        let inputs = options_inputs(dec!(24), dec!(83), dec!(2000), dec!(1500), dec!(70000));
        let b = parity_breakdown(&sel, &inputs).unwrap();
        assert_eq!(b.local_rate, dec!(70500));
        assert_eq!(b.cme_rate, dec!(89.94));
        assert_eq!(b.parity, dec!(70410.06));
    }

    #[test]
    fn test_crude_and_natgas_futures() {
        let crude = ParitySelection::new(Commodity::Crude, Instrument::Futures);
        // 78.5 / 100 * 10000 / 83.5 = 94.0119...
        let p = compute_parity(&crude, &futures_inputs(dec!(78.5), dec!(83.5), dec!(6600))).unwrap();
        assert_eq!(p, dec!(6505.99));

        let gas = ParitySelection::new(Commodity::Natgas, Instrument::Futures);
        // 2750 / 1000 * 10000 / 83 = 331.3253...
        let p = compute_parity(&gas, &futures_inputs(dec!(2750), dec!(83), dec!(330))).unwrap();
        assert_eq!(p, dec!(-1.33));
    }

    #[test]
    fn test_zero_unit_price_is_guarded() {
        for commodity in Commodity::ALL {
            for instrument in [Instrument::Futures, Instrument::Options] {
                let sel = ParitySelection::new(commodity, instrument);
                let inputs = ParityInputs {
                    benchmark: Some(dec!(100)),
                    unit_price: Some(Decimal::ZERO),
                    local_futures: Some(dec!(1)),
                    call: Some(dec!(1)),
                    put: Some(dec!(1)),
                    strike: Some(dec!(1)),
                };
                match compute_parity(&sel, &inputs).unwrap_err() {
                    ParityDeskError::DivisionByZero { .. } => {}
                    e => panic!("Expected DivisionByZero for {commodity} {instrument}, got {e:?}"),
                }
            }
        }
    }

    #[test]
    fn test_missing_benchmark_or_unit() {
        let sel = ParitySelection::new(Commodity::Gold, Instrument::Futures);
        let mut inputs = futures_inputs(dec!(1950), dec!(83), dec!(58000));
        inputs.benchmark = None;
        assert_eq!(
            compute_parity(&sel, &inputs).unwrap_err(),
            ParityDeskError::missing("benchmark")
        );

        let mut inputs = futures_inputs(dec!(1950), dec!(83), dec!(58000));
        inputs.unit_price = None;
        assert_eq!(
            compute_parity(&sel, &inputs).unwrap_err(),
            ParityDeskError::missing("unit_price")
        );
    }

    #[test]
    fn test_zero_benchmark_counts_as_unset() {
        let sel = ParitySelection::new(Commodity::Gold, Instrument::Futures);
        let inputs = futures_inputs(Decimal::ZERO, dec!(83), dec!(58000));
        assert!(compute_parity(&sel, &inputs).is_err());
    }

    #[test]
    fn test_zero_local_futures_is_a_quote() {
        let sel = ParitySelection::new(Commodity::Crude, Instrument::Futures);
        let p = compute_parity(&sel, &futures_inputs(dec!(80), dec!(80), Decimal::ZERO)).unwrap();
        assert_eq!(p, dec!(-100));
    }

    #[test]
    fn test_options_need_all_three_legs() {
        let sel = ParitySelection::new(Commodity::Gold, Instrument::Options);
        let full = options_inputs(dec!(2300), dec!(83.2), dec!(1200), dec!(900), dec!(72000));
        assert!(compute_parity(&sel, &full).is_ok());

        for field in ["call", "put", "strike"] {
            let mut inputs = full.clone();
            match field {
                "call" => inputs.call = None,
                "put" => inputs.put = None,
                _ => inputs.strike = None,
            }
            assert_eq!(
                compute_parity(&sel, &inputs).unwrap_err(),
                ParityDeskError::missing(field)
            );
        }
    }

    #[test]
    fn test_futures_ignore_option_legs() {
        let sel = ParitySelection::new(Commodity::Gold, Instrument::Futures);
        let inputs = options_inputs(dec!(1950), dec!(83), dec!(1), dec!(1), dec!(1));
        assert_eq!(
            compute_parity(&sel, &inputs).unwrap_err(),
            ParityDeskError::missing("local_futures")
        );
    }

    #[test]
    fn test_incomplete_selection() {
        let inputs = futures_inputs(dec!(1950), dec!(83), dec!(58000));
        let only_commodity = ParitySelection {
            commodity: Some(Commodity::Gold),
            instrument: None,
        };
        let only_instrument = ParitySelection {
            commodity: None,
            instrument: Some(Instrument::Futures),
        };
        for sel in [only_commodity, only_instrument, ParitySelection::default()] {
            assert!(matches!(
                compute_parity(&sel, &inputs),
                Err(ParityDeskError::IncompleteSelection(_))
            ));
        }
    }

    #[test]
    fn test_analyze_parity_success() {
        let input = ParityInput {
            commodity: Some(Commodity::Gold),
            instrument: Some(Instrument::Futures),
            benchmark: Some("1950".into()),
            unit_price: Some("83".into()),
            local_futures: Some("58000".into()),
            ..Default::default()
        };
        let out = analyze_parity(&input).unwrap();
        assert_eq!(out.result.parity, Some(dec!(50484.28)));
        assert_eq!(out.result.display, "50484.28");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_parity_placeholder() {
        let input = ParityInput {
            commodity: Some(Commodity::Silver),
            instrument: Some(Instrument::Options),
            benchmark: Some("24".into()),
            unit_price: Some("0".into()),
            local_futures: Some("70000".into()),
            ..Default::default()
        };
        let out = analyze_parity(&input).unwrap();
        assert_eq!(out.result.parity, None);
        assert_eq!(out.result.display, PLACEHOLDER);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("local_futures"));
        assert!(out.warnings[1].contains("Division by zero"));
    }

    #[test]
    fn test_analyze_parity_requires_selection() {
        let input = ParityInput {
            commodity: Some(Commodity::Crude),
            ..Default::default()
        };
        assert!(matches!(
            analyze_parity(&input),
            Err(ParityDeskError::IncompleteSelection(_))
        ));
    }
}
