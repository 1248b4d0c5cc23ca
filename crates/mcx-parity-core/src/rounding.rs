//! Numeric text handling shared by both calculators.
//!
//! Prices arrive as text typed into a form. They are sanitized, parsed into
//! [`Money`], and converted to `f64` for arithmetic so results match plain
//! double-precision evaluation digit for digit. Results are rounded back to two
//! places with [`round2`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::Money;

/// Keep only ASCII digits and `.`; everything else typed into a price box is dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse the leading numeric part of `text`.
///
/// Accepts an optional sign, digits, and at most one decimal point. Anything
/// after the numeric prefix is ignored, so `"12.5.3"` reads as `12.5`. Text
/// with no leading digit (empty, `"."`, `"abc"`) is unset, and so is a
/// magnitude beyond what [`Money`] holds (about 7.9e28).
pub fn parse_price(text: &str) -> Option<Money> {
    let trimmed = text.trim_start();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let int_len = body.bytes().take_while(u8::is_ascii_digit).count();
    let int_part = &body[..int_len];
    let rest = &body[int_len..];
    let frac_part = match rest.strip_prefix('.') {
        Some(after) => {
            let frac_len = after.bytes().take_while(u8::is_ascii_digit).count();
            &after[..frac_len]
        }
        None => "",
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut literal = String::with_capacity(int_len + frac_part.len() + 3);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    Decimal::from_str(&literal).ok()
}

/// `f64` view of a price for arithmetic.
pub fn to_float(value: Money) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Round to two decimal places.
///
/// Rounds the exact binary value of `x` half away from zero, which is what a
/// double formatted with two fixed decimals does: `1.005` is stored just
/// below the half and rounds down, `0.125` is an exact tie and rounds up.
/// Whole numbers drop the `.00` (`5.0` renders as `5`); anything else keeps
/// both places (`5.2` renders as `5.20`). Non-finite input yields `None`.
pub fn round2(x: f64) -> Option<Money> {
    if !x.is_finite() {
        return None;
    }
    let mut rounded = Decimal::from_f64_retain(x)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.fract().is_zero() {
        rounded = rounded.normalize();
    } else {
        rounded.rescale(2);
    }
    Some(rounded)
}
