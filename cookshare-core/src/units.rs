//! Unit normalization and conversion.
//!
//! Free-form unit text from recipes ("Tablespoons", " tbs ", "") is mapped
//! onto a closed set of canonical units. Mass and volume units convert
//! through a base unit (grams and milliliters); count units are
//! dimensionless and share the base unit `piece`.

use std::fmt;

/// The physical dimension a canonical unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

impl Dimension {
    /// Base unit every unit of this dimension converts through.
    pub fn base_unit(&self) -> &'static str {
        match self {
            Dimension::Mass => "g",
            Dimension::Volume => "ml",
            Dimension::Count => "piece",
        }
    }

    /// Parse a base unit token back into its dimension.
    pub fn from_base_unit(base_unit: &str) -> Option<Self> {
        match base_unit {
            "g" => Some(Dimension::Mass),
            "ml" => Some(Dimension::Volume),
            "piece" => Some(Dimension::Count),
            _ => None,
        }
    }
}

/// One of the fixed canonical unit tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalUnit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Cup,
    Tablespoon,
    Teaspoon,
    FluidOunce,
    Piece,
    Item,
}

impl CanonicalUnit {
    pub const ALL: [CanonicalUnit; 12] = [
        CanonicalUnit::Gram,
        CanonicalUnit::Kilogram,
        CanonicalUnit::Ounce,
        CanonicalUnit::Pound,
        CanonicalUnit::Milliliter,
        CanonicalUnit::Liter,
        CanonicalUnit::Cup,
        CanonicalUnit::Tablespoon,
        CanonicalUnit::Teaspoon,
        CanonicalUnit::FluidOunce,
        CanonicalUnit::Piece,
        CanonicalUnit::Item,
    ];

    /// The canonical token, e.g. `"tbsp"` or `"fl oz"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalUnit::Gram => "g",
            CanonicalUnit::Kilogram => "kg",
            CanonicalUnit::Ounce => "oz",
            CanonicalUnit::Pound => "lb",
            CanonicalUnit::Milliliter => "ml",
            CanonicalUnit::Liter => "l",
            CanonicalUnit::Cup => "cup",
            CanonicalUnit::Tablespoon => "tbsp",
            CanonicalUnit::Teaspoon => "tsp",
            CanonicalUnit::FluidOunce => "fl oz",
            CanonicalUnit::Piece => "piece",
            CanonicalUnit::Item => "item",
        }
    }

    /// Look up a raw unit string (case and surrounding whitespace ignored).
    ///
    /// The empty string is a count of pieces.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" | "gr" => Some(CanonicalUnit::Gram),
            "kg" | "kilogram" | "kilograms" | "kilo" => Some(CanonicalUnit::Kilogram),
            "oz" | "ounce" | "ounces" => Some(CanonicalUnit::Ounce),
            "lb" | "pound" | "pounds" | "lbs" => Some(CanonicalUnit::Pound),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(CanonicalUnit::Milliliter)
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Some(CanonicalUnit::Liter),
            "cup" | "cups" | "c" => Some(CanonicalUnit::Cup),
            "tbsp" | "tablespoon" | "tablespoons" | "tbs" => Some(CanonicalUnit::Tablespoon),
            "tsp" | "teaspoon" | "teaspoons" | "ts" => Some(CanonicalUnit::Teaspoon),
            "fl oz" | "fluid ounce" | "fluid ounces" | "floz" => Some(CanonicalUnit::FluidOunce),
            "" | "piece" | "pieces" | "pc" | "pcs" => Some(CanonicalUnit::Piece),
            "item" | "items" => Some(CanonicalUnit::Item),
            _ => None,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            CanonicalUnit::Gram
            | CanonicalUnit::Kilogram
            | CanonicalUnit::Ounce
            | CanonicalUnit::Pound => Dimension::Mass,
            CanonicalUnit::Milliliter
            | CanonicalUnit::Liter
            | CanonicalUnit::Cup
            | CanonicalUnit::Tablespoon
            | CanonicalUnit::Teaspoon
            | CanonicalUnit::FluidOunce => Dimension::Volume,
            CanonicalUnit::Piece | CanonicalUnit::Item => Dimension::Count,
        }
    }

    /// Multiplier from this unit to its dimension's base unit.
    pub fn factor(&self) -> f64 {
        match self {
            CanonicalUnit::Gram => 1.0,
            CanonicalUnit::Kilogram => 1000.0,
            CanonicalUnit::Ounce => 28.35,
            CanonicalUnit::Pound => 453.59,
            CanonicalUnit::Milliliter => 1.0,
            CanonicalUnit::Liter => 1000.0,
            CanonicalUnit::Cup => 240.0,
            CanonicalUnit::Tablespoon => 15.0,
            CanonicalUnit::Teaspoon => 5.0,
            CanonicalUnit::FluidOunce => 29.57,
            CanonicalUnit::Piece | CanonicalUnit::Item => 1.0,
        }
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric amount tagged with a unit token.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub amount: f64,
    pub unit: String,
}

impl Measure {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }
}

/// Map a raw unit onto its canonical token.
///
/// Unknown units come back lowercased and trimmed; this never fails.
pub fn normalize_unit(raw: &str) -> String {
    match CanonicalUnit::parse(raw) {
        Some(unit) => unit.as_str().to_string(),
        None => raw.trim().to_lowercase(),
    }
}

/// Convert an amount into grams, milliliters or pieces.
///
/// Returns `None` when the unit is not one of the canonical units, which
/// means "not convertible" rather than an error.
pub fn convert_to_base_unit(amount: f64, unit: &str) -> Option<Measure> {
    let unit = CanonicalUnit::parse(unit)?;
    Some(Measure::new(
        amount * unit.factor(),
        unit.dimension().base_unit(),
    ))
}

/// Convert a base-unit amount into `preferred_unit` when it measures the
/// same dimension; otherwise keep the amount in the base unit.
pub fn convert_from_base_unit(amount: f64, base_unit: &str, preferred_unit: &str) -> Measure {
    let dimension = Dimension::from_base_unit(base_unit);
    match CanonicalUnit::parse(preferred_unit) {
        Some(unit) if Some(unit.dimension()) == dimension => {
            Measure::new(amount / unit.factor(), unit.as_str())
        }
        _ => Measure::new(amount, base_unit),
    }
}
