//! Intention Mapper
//!
//! Maps user intention tags (what the user wants support with) to the
//! elements that serve them. Unknown tags are ignored.

use crate::elements::Element;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Intention grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentionCategory {
    Emotional,
    Relationships,
    Personal,
    Spiritual,
    Wellbeing,
}

/// One supported intention tag
#[derive(Debug, Clone, Copy)]
pub struct IntentionEntry {
    pub tag: &'static str,
    pub category: IntentionCategory,
    pub elements: &'static [Element],
}

// ============================================================================
// EMBEDDED INTENTION TABLE
// ============================================================================

use Element::{Earth, Fire, Metal, Water, Wood};
use IntentionCategory::{Emotional, Personal, Relationships, Spiritual, Wellbeing};

static INTENTIONS: [IntentionEntry; 24] = [
    IntentionEntry { tag: "Peace & Calm", category: Emotional, elements: &[Water, Earth] },
    IntentionEntry { tag: "Emotional Balance", category: Emotional, elements: &[Water, Earth] },
    IntentionEntry { tag: "Joy & Positivity", category: Emotional, elements: &[Fire, Wood] },
    IntentionEntry { tag: "Releasing Worry", category: Emotional, elements: &[Water, Metal] },
    IntentionEntry { tag: "Inner Strength", category: Emotional, elements: &[Earth, Metal] },
    IntentionEntry { tag: "Authentic Connections", category: Relationships, elements: &[Fire, Wood] },
    IntentionEntry { tag: "Healthy Boundaries", category: Relationships, elements: &[Metal, Earth] },
    IntentionEntry { tag: "Attracting Love", category: Relationships, elements: &[Fire, Water] },
    IntentionEntry { tag: "Deepening Friendships", category: Relationships, elements: &[Wood, Fire] },
    IntentionEntry { tag: "Family Harmony", category: Relationships, elements: &[Earth, Water] },
    IntentionEntry { tag: "Self-Confidence", category: Personal, elements: &[Fire, Wood] },
    IntentionEntry { tag: "Self-Love & Acceptance", category: Personal, elements: &[Earth, Fire] },
    IntentionEntry { tag: "Mental Clarity", category: Personal, elements: &[Metal, Water] },
    IntentionEntry { tag: "Focus & Productivity", category: Personal, elements: &[Metal, Wood] },
    IntentionEntry { tag: "Creative Expression", category: Personal, elements: &[Wood, Fire] },
    IntentionEntry { tag: "Spiritual Protection", category: Spiritual, elements: &[Metal, Earth] },
    IntentionEntry { tag: "Intuition & Insight", category: Spiritual, elements: &[Water, Metal] },
    IntentionEntry { tag: "Grounding & Centering", category: Spiritual, elements: &[Earth] },
    IntentionEntry { tag: "Energy Cleansing", category: Spiritual, elements: &[Metal, Water] },
    IntentionEntry { tag: "Manifestation", category: Spiritual, elements: &[Fire, Wood] },
    IntentionEntry { tag: "Restful Sleep", category: Wellbeing, elements: &[Water, Earth] },
    IntentionEntry { tag: "Vitality & Energy", category: Wellbeing, elements: &[Fire, Wood] },
    IntentionEntry { tag: "Gentle Transitions", category: Wellbeing, elements: &[Water, Earth] },
    IntentionEntry { tag: "Overall Wellness", category: Wellbeing, elements: &[Earth, Wood] },
];

/// Lowercased tag -> entry
fn index() -> &'static FxHashMap<String, &'static IntentionEntry> {
    static INDEX: OnceLock<FxHashMap<String, &'static IntentionEntry>> = OnceLock::new();
    INDEX.get_or_init(|| {
        INTENTIONS
            .iter()
            .map(|entry| (entry.tag.to_lowercase(), entry))
            .collect()
    })
}

/// Case-insensitive lookup on the trimmed tag
pub fn lookup(tag: &str) -> Option<&'static IntentionEntry> {
    index().get(&tag.trim().to_lowercase()).copied()
}

/// Elements serving the given intentions, most requested first.
///
/// Ties keep the canonical element order. Unknown tags contribute nothing.
pub fn elements_for_intentions<S: AsRef<str>>(tags: &[S]) -> Vec<Element> {
    let mut counts = [0u32; 5];
    for entry in tags.iter().filter_map(|t| lookup(t.as_ref())) {
        for element in entry.elements {
            counts[element.index()] += 1;
        }
    }

    let mut elements: Vec<Element> = Element::ALL
        .into_iter()
        .filter(|e| counts[e.index()] > 0)
        .collect();
    elements.sort_by(|a, b| counts[b.index()].cmp(&counts[a.index()]));
    elements
}

/// Every supported tag in table order
pub fn all_intentions() -> impl Iterator<Item = &'static str> {
    INTENTIONS.iter().map(|entry| entry.tag)
}

pub fn intentions_in(category: IntentionCategory) -> impl Iterator<Item = &'static str> {
    INTENTIONS
        .iter()
        .filter(move |entry| entry.category == category)
        .map(|entry| entry.tag)
}
