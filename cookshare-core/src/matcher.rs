//! Ingredient name matching.
//!
//! Two names are "similar" when, after stripping preparation descriptors,
//! they are equal, one contains the other, or both fall into the same
//! synonym family. There is no edit-distance matching: names with no
//! lexical overlap are always distinct.

use regex::Regex;
use std::sync::LazyLock;

static DESCRIPTOR_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:fresh|dried|ground|chopped|diced|sliced|whole|organic)\b")
        .expect("descriptor pattern is valid")
});

/// Known ingredient families: the family key and its surface variants.
///
/// Hand-curated. Extending it changes which shopping list lines merge.
const SYNONYM_FAMILIES: &[(&str, &[&str])] = &[
    (
        "onion",
        &["onions", "yellow onion", "white onion", "red onion", "sweet onion"],
    ),
    (
        "tomato",
        &["tomatoes", "cherry tomato", "roma tomato", "plum tomato", "grape tomato"],
    ),
    ("garlic", &["garlic clove", "garlic cloves", "minced garlic"]),
    ("butter", &["unsalted butter", "salted butter"]),
    (
        "oil",
        &["olive oil", "vegetable oil", "canola oil", "extra virgin olive oil"],
    ),
    ("salt", &["sea salt", "kosher salt", "table salt"]),
    ("pepper", &["black pepper", "white pepper", "peppercorns"]),
];

/// Lowercase, drop descriptor words and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let stripped = DESCRIPTOR_WORDS.replace_all(&lower, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_family(name: &str, key: &str, variants: &[&str]) -> bool {
    name.contains(key) || variants.iter().any(|variant| name.contains(variant))
}

/// Decide whether two ingredient names refer to the same ingredient.
pub fn are_similar(name1: &str, name2: &str) -> bool {
    let a = normalize_name(name1);
    let b = normalize_name(name2);

    // An empty name would be contained in everything.
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    SYNONYM_FAMILIES
        .iter()
        .any(|(key, variants)| in_family(&a, key, variants) && in_family(&b, key, variants))
}
