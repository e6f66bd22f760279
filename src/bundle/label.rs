//! Card labels and stat annotations

use std::fmt;

use serde::Serialize;
use serde_json::Number;

/// `"final_objective"` -> `"Final Objective"`
///
/// Each underscore-separated segment gets its first character uppercased;
/// the rest of the segment is left as is.
pub fn snake_to_title(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Optional stat line shown under a card label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Annotation {
    Rarity(Number),
    Threat(Number),
    Weight(Number),
    ManaCost(Number),
    WeaponType(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Rarity(n) => write!(f, "Rarity: {}", n),
            Annotation::Threat(n) => write!(f, "Threat: {}", n),
            Annotation::Weight(n) => write!(f, "Weight: {}", n),
            Annotation::ManaCost(n) => write!(f, "Mana Cost: {}", n),
            Annotation::WeaponType(t) => write!(f, "Type: {}", snake_to_title(t)),
        }
    }
}
