use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::rounding::{parse_price, round2, to_float};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ParityDeskResult;

use super::profiles::{Column, InstrumentProfile};

/// Values derived from the reference price. `CME` holds the reference itself.
pub type AutoValues = BTreeMap<Column, Money>;

/// Values observed by the trader, keyed by column. Unset columns are absent.
pub type UserValues = BTreeMap<Column, Money>;

/// Derived minus observed, for each column where both are present.
pub type ResultRow = BTreeMap<Column, Money>;

// ---------------------------------------------------------------------------
// Pure conversion
// ---------------------------------------------------------------------------

/// Derive the quantity table for `profile` from a reference price.
///
/// An unset reference clears every column. Otherwise each derived column is
/// `round2(reference * multiplier)`.
pub fn derive_quantities(reference: Option<Money>, profile: InstrumentProfile) -> AutoValues {
    let mut auto = AutoValues::new();
    let Some(reference) = reference else {
        return auto;
    };

    auto.insert(Column::Cme, reference);
    let r = to_float(reference);
    for &(column, multiplier) in profile.table().multipliers {
        if let Some(value) = round2(r * multiplier) {
            auto.insert(column, value);
        }
    }
    auto
}

/// Compare derived against observed values column by column.
pub fn compute_result_row(auto: &AutoValues, user: &UserValues) -> ResultRow {
    auto.iter()
        .filter_map(|(column, derived)| {
            let observed = user.get(column)?;
            let diff = round2(to_float(*derived) - to_float(*observed))?;
            Some((*column, diff))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Input for a one-shot quantity comparison. Prices are given as typed text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuantityInput {
    #[serde(default)]
    pub profile: InstrumentProfile,
    /// Reference (CME) price.
    #[serde(default)]
    pub reference: Option<String>,
    /// Observed values keyed by column label.
    #[serde(default)]
    pub observed: BTreeMap<String, String>,
}

/// Output of a quantity comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityOutput {
    pub profile: InstrumentProfile,
    pub label: String,
    pub columns: Vec<Column>,
    pub auto_values: AutoValues,
    pub user_values: UserValues,
    pub result_row: ResultRow,
}

/// Derive the table, read the observed values, and compute the result row.
///
/// Column names that are not columns at all are rejected. Columns that exist
/// but do not belong to the chosen profile are dropped with a warning, as are
/// observed values that do not parse.
pub fn analyze_quantities(
    input: &QuantityInput,
) -> ParityDeskResult<ComputationOutput<QuantityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let profile = input.profile;

    let reference = input.reference.as_deref().and_then(parse_price);
    if reference.is_none() {
        warnings.push("Reference (CME) price not entered; derived columns are blank".into());
    }
    let auto_values = derive_quantities(reference, profile);

    let mut user_values = UserValues::new();
    for (name, text) in &input.observed {
        let column: Column = name.parse()?;
        if !profile.has_column(column) {
            warnings.push(format!(
                "Column {column} is not part of {}; observed value ignored",
                profile.label()
            ));
            continue;
        }
        match parse_price(text) {
            Some(value) => {
                user_values.insert(column, value);
            }
            None if text.trim().is_empty() => {}
            None => warnings.push(format!(
                "Observed {column} value '{text}' is not a number; treated as blank"
            )),
        }
    }

    let result_row = compute_result_row(&auto_values, &user_values);

    let output = QuantityOutput {
        profile,
        label: profile.label().to_string(),
        columns: profile.columns().to_vec(),
        auto_values,
        user_values,
        result_row,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reference price times fixed per-profile multipliers, rounded to 2 dp",
        &serde_json::json!({
            "profile": profile.tag(),
            "reference": reference.map(|r| r.to_string()),
            "multipliers": profile
                .table()
                .multipliers
                .iter()
                .map(|(c, m)| (c.label().to_string(), *m))
                .collect::<BTreeMap<_, _>>(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
