//! Scoring rules
//!
//! Score deltas and message templates for the compatibility scorer. The
//! compiled defaults can be replaced by a JSON file with the same shape;
//! omitted fields keep their defaults.
//!
//! Templates accept `{from}` (candidate element or animal), `{to}` (user's
//! dominant element or animal), `{verb}` (the cycle verb from `{from}` to
//! `{to}`) and `{quality}` (what the user's element stands for).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Delta plus explanation/note templates for one element relation.
///
/// `note` goes to recommendations or warnings depending on the relation;
/// an empty note adds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRule {
    pub delta: i32,
    pub explanation: String,
    #[serde(default)]
    pub note: String,
}

impl RelationRule {
    fn new(delta: i32, explanation: &str, note: &str) -> Self {
        Self {
            delta,
            explanation: explanation.to_string(),
            note: note.to_string(),
        }
    }
}

/// Delta plus note template for one zodiac affinity group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacRule {
    pub delta: i32,
    #[serde(default)]
    pub note: String,
}

impl ZodiacRule {
    fn new(delta: i32, note: &str) -> Self {
        Self {
            delta,
            note: note.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZodiacRules {
    pub best: ZodiacRule,
    pub good: ZodiacRule,
    pub challenging: ZodiacRule,
    pub conflict: ZodiacRule,
}

impl Default for ZodiacRules {
    fn default() -> Self {
        Self {
            best: ZodiacRule::new(30, "{from} and {to} have natural harmony"),
            good: ZodiacRule::new(15, ""),
            challenging: ZodiacRule::new(-15, "This zodiac pairing may require extra mindfulness"),
            conflict: ZodiacRule::new(-30, "{from} and {to} are opposing signs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base_score: i32,
    /// Candidate element equals the dominant element
    pub same_element: RelationRule,
    /// Candidate produces the dominant element
    pub produces_dominant: RelationRule,
    /// Candidate controls the dominant element (note is a warning)
    pub controls_dominant: RelationRule,
    /// Dominant element controls the candidate
    pub controlled_by_dominant: RelationRule,
    /// Dominant element produces the candidate
    pub produced_by_dominant: RelationRule,
    pub zodiac: ZodiacRules,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: 50,
            same_element: RelationRule::new(
                50,
                "Same-element resonance amplifies your {to} energy",
                "This {from} item directly strengthens your {to} energy",
            ),
            produces_dominant: RelationRule::new(
                25,
                "{from} {verb} {to} - this item feeds your core energy",
                "{from} {verb} {to} - this item feeds your core energy",
            ),
            controls_dominant: RelationRule::new(
                -50,
                "{from} {verb} {to} - may dampen {quality}",
                "{from} {verb} {to} - may dampen {quality}",
            ),
            controlled_by_dominant: RelationRule::new(
                10,
                "Your {to} energy can harness this {from} item's power",
                "Use this item to channel and direct your energy",
            ),
            produced_by_dominant: RelationRule::new(0, "Your {to} energy feeds this {from} item", ""),
            zodiac: ZodiacRules::default(),
        }
    }
}

impl ScoringRules {
    /// Load rules from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring rules file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scoring rules JSON: {:?}", path))
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholders<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub verb: &'a str,
    pub quality: &'a str,
}

/// Fill `{from}`, `{to}`, `{verb}` and `{quality}`; other text is kept as-is
pub fn render(template: &str, values: &Placeholders<'_>) -> String {
    template
        .replace("{from}", values.from)
        .replace("{to}", values.to)
        .replace("{verb}", values.verb)
        .replace("{quality}", values.quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_magnitudes() {
        let rules = ScoringRules::default();
        assert_eq!(rules.base_score, 50);
        assert_eq!(rules.same_element.delta, 50);
        assert_eq!(rules.produces_dominant.delta, 25);
        assert_eq!(rules.controls_dominant.delta, -50);
        assert_eq!(rules.controlled_by_dominant.delta, 10);
        assert_eq!(rules.produced_by_dominant.delta, 0);
        assert_eq!(rules.zodiac.best.delta, 30);
        assert_eq!(rules.zodiac.good.delta, 15);
        assert_eq!(rules.zodiac.challenging.delta, -15);
        assert_eq!(rules.zodiac.conflict.delta, -30);
    }

    #[test]
    fn test_render_fills_placeholders() {
        let values = Placeholders {
            from: "Water",
            to: "Fire",
            verb: "extinguishes",
            quality: "passion and vitality",
        };
        let text = render(&ScoringRules::default().controls_dominant.note, &values);
        assert_eq!(text, "Water extinguishes Fire - may dampen passion and vitality");
        assert_eq!(render("no placeholders", &values), "no placeholders");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules: ScoringRules =
            serde_json::from_str(r#"{"base_score": 40, "zodiac": {"best": {"delta": 20}}}"#).unwrap();
        assert_eq!(rules.base_score, 40);
        assert_eq!(rules.zodiac.best.delta, 20);
        assert_eq!(rules.zodiac.best.note, "");
        assert_eq!(rules.zodiac.conflict.delta, -30);
        assert_eq!(rules.same_element, ScoringRules::default().same_element);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("bazi_rules_{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", serde_json::to_string(&ScoringRules::default()).unwrap()).unwrap();
        drop(file);

        let loaded = ScoringRules::load(&path).unwrap();
        assert_eq!(loaded, ScoringRules::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_reports_path() {
        let err = ScoringRules::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("rules.json"));
    }
}
