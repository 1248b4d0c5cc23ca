use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParityDeskError;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// A column of the quantity table. `Cme` is the reference column every
/// profile starts with; the rest are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "CME")]
    Cme,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "PE")]
    Pe,
    #[serde(rename = "Fut")]
    Fut,
    #[serde(rename = "IU")]
    Iu,
    #[serde(rename = "Mini")]
    Mini,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Cme,
        Column::Ce,
        Column::Pe,
        Column::Fut,
        Column::Iu,
        Column::Mini,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Cme => "CME",
            Column::Ce => "CE",
            Column::Pe => "PE",
            Column::Fut => "Fut",
            Column::Iu => "IU",
            Column::Mini => "Mini",
        }
    }

    pub fn is_reference(self) -> bool {
        self == Column::Cme
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = ParityDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParityDeskError::InvalidInput {
                field: "column".into(),
                reason: format!("unknown column '{s}' (expected one of CME, CE, PE, Fut, IU, Mini)"),
            })
    }
}

// ---------------------------------------------------------------------------
// Profile tables
// ---------------------------------------------------------------------------

/// Fixed layout of one instrument class.
#[derive(Debug)]
pub struct ProfileTable {
    pub label: &'static str,
    pub columns: &'static [Column],
    /// Signed multiplier applied to the reference price, one per derived column.
    pub multipliers: &'static [(Column, f64)],
}

const OPTION_COLUMNS: &[Column] = &[Column::Cme, Column::Ce, Column::Pe, Column::Iu, Column::Mini];
const FUTURE_COLUMNS: &[Column] = &[Column::Cme, Column::Fut, Column::Iu, Column::Mini];

const GOLD_OPTIONS: ProfileTable = ProfileTable {
    label: "Gold Options",
    columns: OPTION_COLUMNS,
    multipliers: &[
        (Column::Ce, -3.0),
        (Column::Pe, 3.0),
        (Column::Iu, -15.0),
        (Column::Mini, -2.0),
    ],
};

const GOLD_FUTURES: ProfileTable = ProfileTable {
    label: "Gold Future",
    columns: FUTURE_COLUMNS,
    multipliers: &[(Column::Fut, -3.0), (Column::Iu, -15.0), (Column::Mini, -2.0)],
};

const SILVER_OPTIONS: ProfileTable = ProfileTable {
    label: "Silver Options",
    columns: OPTION_COLUMNS,
    multipliers: &[
        (Column::Ce, -5.0),
        (Column::Pe, 5.0),
        (Column::Iu, -8.0),
        (Column::Mini, -2.0),
    ],
};

const SILVER_FUTURES: ProfileTable = ProfileTable {
    label: "Silver Future",
    columns: FUTURE_COLUMNS,
    multipliers: &[(Column::Fut, -5.0), (Column::Iu, -8.0), (Column::Mini, -2.0)],
};

/// Instrument class selected on the quantity sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentProfile {
    #[default]
    #[serde(rename = "goldOpt", alias = "gold-options")]
    GoldOptions,
    #[serde(rename = "goldFut", alias = "gold-futures")]
    GoldFutures,
    #[serde(rename = "silverOpt", alias = "silver-options")]
    SilverOptions,
    #[serde(rename = "silverFut", alias = "silver-futures")]
    SilverFutures,
}

impl InstrumentProfile {
    pub const ALL: [InstrumentProfile; 4] = [
        InstrumentProfile::GoldOptions,
        InstrumentProfile::GoldFutures,
        InstrumentProfile::SilverOptions,
        InstrumentProfile::SilverFutures,
    ];

    pub fn table(self) -> &'static ProfileTable {
        match self {
            InstrumentProfile::GoldOptions => &GOLD_OPTIONS,
            InstrumentProfile::GoldFutures => &GOLD_FUTURES,
            InstrumentProfile::SilverOptions => &SILVER_OPTIONS,
            InstrumentProfile::SilverFutures => &SILVER_FUTURES,
        }
    }

    /// Wire tag, as used in JSON input.
    pub fn tag(self) -> &'static str {
        match self {
            InstrumentProfile::GoldOptions => "goldOpt",
            InstrumentProfile::GoldFutures => "goldFut",
            InstrumentProfile::SilverOptions => "silverOpt",
            InstrumentProfile::SilverFutures => "silverFut",
        }
    }

    pub fn label(self) -> &'static str {
        self.table().label
    }

    pub fn columns(self) -> &'static [Column] {
        self.table().columns
    }

    pub fn has_column(self, column: Column) -> bool {
        self.columns().contains(&column)
    }

    /// Multiplier for a derived column; `None` for `CME` and for columns the
    /// profile does not have.
    pub fn multiplier(self, column: Column) -> Option<f64> {
        self.table()
            .multipliers
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, m)| *m)
    }
}

impl fmt::Display for InstrumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InstrumentProfile {
    type Err = ParityDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        let profile = match key.as_str() {
            "goldopt" | "goldoptions" => InstrumentProfile::GoldOptions,
            "goldfut" | "goldfuture" | "goldfutures" => InstrumentProfile::GoldFutures,
            "silveropt" | "silveroptions" => InstrumentProfile::SilverOptions,
            "silverfut" | "silverfuture" | "silverfutures" => InstrumentProfile::SilverFutures,
            _ => {
                return Err(ParityDeskError::InvalidInput {
                    field: "profile".into(),
                    reason: format!(
                        "unknown profile '{s}' (expected goldOpt, goldFut, silverOpt or silverFut)"
                    ),
                })
            }
        };
        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Serializable view of a profile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub tag: String,
    pub label: String,
    pub columns: Vec<Column>,
    pub multipliers: BTreeMap<Column, Decimal>,
}

impl From<InstrumentProfile> for ProfileSummary {
    fn from(profile: InstrumentProfile) -> Self {
        ProfileSummary {
            tag: profile.tag().to_string(),
            label: profile.label().to_string(),
            columns: profile.columns().to_vec(),
            multipliers: profile
                .table()
                .multipliers
                .iter()
                .filter_map(|(c, m)| Decimal::from_f64_retain(*m).map(|d| (*c, d.normalize())))
                .collect(),
        }
    }
}

/// Every profile in selector order.
pub fn list_profiles() -> Vec<ProfileSummary> {
    InstrumentProfile::ALL
        .into_iter()
        .map(ProfileSummary::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_column_leads_every_profile() {
        for profile in InstrumentProfile::ALL {
            assert_eq!(profile.columns()[0], Column::Cme, "{profile}");
            assert_eq!(profile.multiplier(Column::Cme), None, "{profile}");
        }
    }

    #[test]
    fn test_every_derived_column_has_a_multiplier() {
        for profile in InstrumentProfile::ALL {
            let table = profile.table();
            assert_eq!(table.multipliers.len(), table.columns.len() - 1, "{profile}");
            for column in table.columns.iter().filter(|c| !c.is_reference()) {
                assert!(profile.multiplier(*column).is_some(), "{profile} {column}");
            }
        }
    }

    #[test]
    fn test_gold_option_multipliers() {
        let p = InstrumentProfile::GoldOptions;
        assert_eq!(p.multiplier(Column::Ce), Some(-3.0));
        assert_eq!(p.multiplier(Column::Pe), Some(3.0));
        assert_eq!(p.multiplier(Column::Iu), Some(-15.0));
        assert_eq!(p.multiplier(Column::Mini), Some(-2.0));
        assert_eq!(p.multiplier(Column::Fut), None);
    }

    #[test]
    fn test_silver_future_multipliers() {
        let p = InstrumentProfile::SilverFutures;
        assert_eq!(p.columns(), &[Column::Cme, Column::Fut, Column::Iu, Column::Mini]);
        assert_eq!(p.multiplier(Column::Fut), Some(-5.0));
        assert_eq!(p.multiplier(Column::Iu), Some(-8.0));
        assert!(!p.has_column(Column::Ce));
    }

    #[test]
    fn test_profile_parsing_accepts_tags_and_names() {
        assert_eq!("goldOpt".parse::<InstrumentProfile>().unwrap(), InstrumentProfile::GoldOptions);
        assert_eq!("silver-futures".parse::<InstrumentProfile>().unwrap(), InstrumentProfile::SilverFutures);
        assert_eq!("Gold Future".parse::<InstrumentProfile>().unwrap(), InstrumentProfile::GoldFutures);
        assert!("copperOpt".parse::<InstrumentProfile>().is_err());
    }

    #[test]
    fn test_column_parsing_is_case_insensitive() {
        assert_eq!("ce".parse::<Column>().unwrap(), Column::Ce);
        assert_eq!("MINI".parse::<Column>().unwrap(), Column::Mini);
        assert!("XX".parse::<Column>().is_err());
    }

    #[test]
    fn test_profile_serde_tags() {
        let json = serde_json::to_string(&InstrumentProfile::SilverOptions).unwrap();
        assert_eq!(json, "\"silverOpt\"");
        let back: InstrumentProfile = serde_json::from_str("\"gold-futures\"").unwrap();
        assert_eq!(back, InstrumentProfile::GoldFutures);
    }

    #[test]
    fn test_list_profiles() {
        let all = list_profiles();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].tag, "goldOpt");
        assert_eq!(all[0].multipliers.get(&Column::Iu), Some(&dec!(-15)));
        assert_eq!(all[3].label, "Silver Future");
    }
}
