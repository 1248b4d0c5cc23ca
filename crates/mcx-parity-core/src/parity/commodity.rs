use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParityDeskError;

/// Numerator of the unit-conversion factor `10000 / unit_price`.
pub const UNIT_CONVERSION_BASE: f64 = 10_000.0;

/// Commodity on the parity sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Gold,
    Silver,
    Crude,
    #[serde(alias = "natural_gas", alias = "natural-gas")]
    Natgas,
}

/// How a CME quote is brought into MCX contract terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommodityScale {
    /// CME quote is divided by this first.
    pub divisor: f64,
    /// Then multiplied by this (troy ounce / kilogram style ratios).
    pub unit_factor: f64,
}

const GOLD_SCALE: CommodityScale = CommodityScale {
    divisor: 10.0,
    unit_factor: 0.3199,
};
const SILVER_SCALE: CommodityScale = CommodityScale {
    divisor: 1000.0,
    unit_factor: 31.1035,
};
const CRUDE_SCALE: CommodityScale = CommodityScale {
    divisor: 100.0,
    unit_factor: 1.0,
};
const NATGAS_SCALE: CommodityScale = CommodityScale {
    divisor: 1000.0,
    unit_factor: 1.0,
};

impl Commodity {
    pub const ALL: [Commodity; 4] = [
        Commodity::Gold,
        Commodity::Silver,
        Commodity::Crude,
        Commodity::Natgas,
    ];

    pub fn scale(self) -> CommodityScale {
        match self {
            Commodity::Gold => GOLD_SCALE,
            Commodity::Silver => SILVER_SCALE,
            Commodity::Crude => CRUDE_SCALE,
            Commodity::Natgas => NATGAS_SCALE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Commodity::Gold => "Gold",
            Commodity::Silver => "Silver",
            Commodity::Crude => "Crude Oil",
            Commodity::Natgas => "Natural Gas",
        }
    }

    /// CME price converted into MCX terms:
    /// `(benchmark / divisor) * unit_factor * (10000 / unit_price)`.
    ///
    /// Evaluated left to right; the caller guards against a zero unit price.
    pub fn benchmark_rate(self, benchmark: f64, unit_price: f64) -> f64 {
        let s = self.scale();
        benchmark / s.divisor * s.unit_factor * (UNIT_CONVERSION_BASE / unit_price)
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Commodity {
    type Err = ParityDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "gold" => Ok(Commodity::Gold),
            "silver" => Ok(Commodity::Silver),
            "crude" | "crudeoil" => Ok(Commodity::Crude),
            "natgas" | "naturalgas" => Ok(Commodity::Natgas),
            _ => Err(ParityDeskError::InvalidInput {
                field: "commodity".into(),
                reason: format!("unknown commodity '{s}' (expected gold, silver, crude or natgas)"),
            }),
        }
    }
}

/// Local instrument the benchmark is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    #[serde(rename = "Futures", alias = "Fut", alias = "futures")]
    Futures,
    #[serde(rename = "Options", alias = "Opt", alias = "options")]
    Options,
}

impl Instrument {
    pub fn label(self) -> &'static str {
        match self {
            Instrument::Futures => "Futures",
            Instrument::Options => "Options",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Instrument {
    type Err = ParityDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fut" | "future" | "futures" => Ok(Instrument::Futures),
            "opt" | "option" | "options" => Ok(Instrument::Options),
            _ => Err(ParityDeskError::InvalidInput {
                field: "instrument".into(),
                reason: format!("unknown instrument '{s}' (expected futures or options)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64, label: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{label}: expected ~{expected}, got {actual} (diff={diff}, tol={tol})"
        );
    }

    #[test]
    fn test_gold_rate() {
        // (1950 / 10) * 0.3199 * (10000 / 83)
        assert_close(Commodity::Gold.benchmark_rate(1950.0, 83.0), 7515.7229, 1e-3, "gold");
    }

    #[test]
    fn test_silver_rate() {
        // (24 / 1000) * 31.1035 * (10000 / 83)
        assert_close(Commodity::Silver.benchmark_rate(24.0, 83.0), 89.9378, 1e-3, "silver");
    }

    #[test]
    fn test_crude_rate() {
        // (78.5 / 100) * (10000 / 83.5)
        assert_close(Commodity::Crude.benchmark_rate(78.5, 83.5), 94.0120, 1e-3, "crude");
    }

    #[test]
    fn test_natgas_rate() {
        // (2750 / 1000) * (10000 / 83)
        assert_close(Commodity::Natgas.benchmark_rate(2750.0, 83.0), 331.3253, 1e-3, "natgas");
    }

    #[test]
    fn test_parse_commodity_and_instrument() {
        assert_eq!("Crude Oil".parse::<Commodity>().unwrap(), Commodity::Crude);
        assert_eq!("natural-gas".parse::<Commodity>().unwrap(), Commodity::Natgas);
        assert!("copper".parse::<Commodity>().is_err());
        assert_eq!("Opt".parse::<Instrument>().unwrap(), Instrument::Options);
        assert_eq!("futures".parse::<Instrument>().unwrap(), Instrument::Futures);
        assert!("swap".parse::<Instrument>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Commodity::Natgas).unwrap(), "\"natgas\"");
        assert_eq!(serde_json::to_string(&Instrument::Options).unwrap(), "\"Options\"");
        let i: Instrument = serde_json::from_str("\"Fut\"").unwrap();
        assert_eq!(i, Instrument::Futures);
    }
}
