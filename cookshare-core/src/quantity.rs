//! Combining the quantities of two matched ingredients.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::units::{convert_from_base_unit, convert_to_base_unit, normalize_unit};

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("number pattern is valid")
});

/// A display amount and unit, both kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: String,
    pub unit: String,
}

impl Quantity {
    pub fn new(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.amount)
        } else {
            write!(f, "{} {}", self.amount, self.unit)
        }
    }
}

/// Read the leading number of a free-form amount.
///
/// Mirrors how browsers read amounts typed into recipe forms: leading
/// whitespace is skipped and trailing text ignored, so `"2 cups"` is `2`
/// and `"1/2"` is `1`. Text with no leading number gives `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Render an amount for display.
///
/// Whole numbers have no decimals, values below one keep up to two
/// decimals and everything else keeps one, with trailing zeros dropped.
pub fn format_amount(value: f64) -> String {
    let rounded = if value.fract() == 0.0 {
        value
    } else if value < 1.0 {
        round_to(value, 2)
    } else {
        round_to(value, 1)
    };
    // Avoid rendering "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Merge two amounts of the same ingredient into one.
///
/// The first pair is the existing shopping list line; its unit wins when
/// a display unit has to be picked. When the units can not be reconciled
/// the result keeps both quantities as text with an empty unit.
pub fn combine(amount1: &str, unit1: &str, amount2: &str, unit2: &str) -> Quantity {
    let value1 = parse_amount(amount1).unwrap_or(0.0);
    let value2 = parse_amount(amount2).unwrap_or(0.0);

    // Keeps amounts like "a pinch" verbatim.
    if value1 == 0.0 {
        return Quantity::new(amount2, unit2);
    }
    if value2 == 0.0 {
        return Quantity::new(amount1, unit1);
    }

    if let (Some(base1), Some(base2)) = (
        convert_to_base_unit(value1, unit1),
        convert_to_base_unit(value2, unit2),
    ) {
        if base1.unit == base2.unit {
            let total = base1.amount + base2.amount;
            let preferred = match base1.unit.as_str() {
                "g" if total >= 1000.0 => "kg",
                "ml" if total >= 1000.0 => "l",
                _ => unit1,
            };
            let display = convert_from_base_unit(total, &base1.unit, preferred);
            return Quantity::new(format_amount(display.amount), display.unit);
        }
    }

    if normalize_unit(unit1) == normalize_unit(unit2) {
        return Quantity::new(format_amount(value1 + value2), unit1);
    }

    Quantity::new(
        format!("{} {} + {} {}", amount1, unit1, amount2, unit2),
        "",
    )
}
