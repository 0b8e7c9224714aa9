use serde::{Deserialize, Serialize};
use std::fmt;

/// One ingredient line of a recipe.
///
/// Amount and unit are free text: `"2"`, `"1.5"`, `"a pinch"`, `""`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }

    /// True when the name is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount.is_empty(), self.unit.is_empty()) {
            (true, _) => write!(f, "{}", self.name),
            (false, true) => write!(f, "{} {}", self.amount, self.name),
            (false, false) => write!(f, "{} {} {}", self.amount, self.unit, self.name),
        }
    }
}
