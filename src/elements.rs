//! Five Elements and their cycles
//!
//! Productive cycle: Wood → Fire → Earth → Metal → Water → Wood.
//! Controlling cycle: Wood → Earth → Water → Fire → Metal → Wood.
//!
//! Both cycles are offsets over the declaration order, so every relation is a
//! table-free index computation.

use crate::error::UnknownName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five elements. Declaration order is the canonical tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// Yang/yin variant of a stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yang,
    Yin,
}

/// How a candidate element relates to a reference (dominant) element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRelation {
    /// Same element
    Same,
    /// Candidate produces the reference (Wood → Fire)
    Produces,
    /// Candidate controls the reference (Water → Fire)
    Controls,
    /// Reference controls the candidate (Fire → Metal)
    ControlledBy,
    /// Reference produces the candidate (Fire → Earth)
    ProducedBy,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Element {
        Self::ALL[index % 5]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        }
    }

    /// Element this one feeds
    pub const fn produces(self) -> Element {
        Self::from_index(self.index() + 1)
    }

    /// Element that feeds this one
    pub const fn produced_by(self) -> Element {
        Self::from_index(self.index() + 4)
    }

    /// Element this one suppresses
    pub const fn controls(self) -> Element {
        Self::from_index(self.index() + 2)
    }

    /// Element that suppresses this one
    pub const fn controlled_by(self) -> Element {
        Self::from_index(self.index() + 3)
    }

    /// Relation of `self` (candidate) to `reference`
    pub fn relation_to(self, reference: Element) -> ElementRelation {
        match (reference.index() + 5 - self.index()) % 5 {
            0 => ElementRelation::Same,
            1 => ElementRelation::Produces,
            2 => ElementRelation::Controls,
            3 => ElementRelation::ControlledBy,
            _ => ElementRelation::ProducedBy,
        }
    }

    /// Verb for "{self} {verb} {self.produces()}"
    pub const fn nourish_verb(self) -> &'static str {
        match self {
            Element::Wood => "nourishes",
            Element::Fire => "creates",
            Element::Earth => "bears",
            Element::Metal => "collects",
            Element::Water => "nourishes",
        }
    }

    /// Verb for "{self} {verb} {self.controls()}"
    pub const fn control_verb(self) -> &'static str {
        match self {
            Element::Wood => "penetrates",
            Element::Fire => "melts",
            Element::Earth => "dams",
            Element::Metal => "cuts",
            Element::Water => "extinguishes",
        }
    }

    /// What a person dominated by this element risks losing when it is suppressed
    pub const fn vitality(self) -> &'static str {
        match self {
            Element::Wood => "growth and flexibility",
            Element::Fire => "passion and vitality",
            Element::Earth => "stability and grounding",
            Element::Metal => "clarity and resolve",
            Element::Water => "intuition and flow",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownName {
                kind: "element",
                value: trimmed.to_string(),
            })
    }
}

/// Join element names as "A and B" / "A, B and C"
pub fn join_names(elements: &[Element]) -> String {
    match elements {
        [] => String::new(),
        [only] => only.name().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|e| e.name()).collect();
            format!("{} and {}", head.join(", "), last.name())
        }
    }
}
