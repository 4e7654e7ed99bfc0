//! Compatibility Scorer
//!
//! Scores a candidate element (and optional zodiac animal) against the user's
//! dominant element and animal sign:
//!
//! total = base + element relation delta + zodiac delta (unclamped)

pub mod rules;
pub mod zodiac;

pub use rules::{RelationRule, ScoringRules, ZodiacRule, ZodiacRules};
pub use zodiac::{zodiac_match, ZodiacAffinity, ZodiacMatch, ZODIAC_AFFINITIES};

use crate::analyzer::ChartAnalysis;
use crate::calendar::Animal;
use crate::elements::{Element, ElementRelation};
use rules::{render, Placeholders};
use serde::{Deserialize, Serialize};

/// The part of a chart the scorer looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartProfile {
    pub dominant_element: Element,
    pub animal_sign: Option<Animal>,
}

impl From<&ChartAnalysis> for ChartProfile {
    fn from(analysis: &ChartAnalysis) -> Self {
        Self {
            dominant_element: analysis.dominant_element,
            animal_sign: Some(analysis.chart.animal_sign()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompatibilityScore {
    pub total_score: i32,
    pub element_score: i32,
    pub zodiac_score: i32,
    pub explanation: String,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    rules: ScoringRules,
}

impl CompatibilityScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn score_analysis(
        &self,
        analysis: &ChartAnalysis,
        element: Element,
        animal_tag: Option<&str>,
    ) -> CompatibilityScore {
        self.score(&ChartProfile::from(analysis), element, animal_tag)
    }

    pub fn score(
        &self,
        profile: &ChartProfile,
        element: Element,
        animal_tag: Option<&str>,
    ) -> CompatibilityScore {
        let mut result = CompatibilityScore::default();

        self.apply_element(&mut result, profile.dominant_element, element);

        if let (Some(sign), Some(tag)) = (profile.animal_sign, animal_tag) {
            match tag.parse::<Animal>() {
                Ok(candidate) => self.apply_zodiac(&mut result, sign, candidate),
                Err(e) => tracing::debug!("Ignoring zodiac tag: {}", e),
            }
        }

        result.total_score = self.rules.base_score + result.element_score + result.zodiac_score;
        result
    }

    fn apply_element(&self, result: &mut CompatibilityScore, dominant: Element, candidate: Element) {
        let relation = candidate.relation_to(dominant);
        let (rule, verb) = match relation {
            ElementRelation::Same => (&self.rules.same_element, ""),
            ElementRelation::Produces => (&self.rules.produces_dominant, candidate.nourish_verb()),
            ElementRelation::Controls => (&self.rules.controls_dominant, candidate.control_verb()),
            ElementRelation::ControlledBy => (&self.rules.controlled_by_dominant, dominant.control_verb()),
            ElementRelation::ProducedBy => (&self.rules.produced_by_dominant, dominant.nourish_verb()),
        };

        let values = Placeholders {
            from: candidate.name(),
            to: dominant.name(),
            verb,
            quality: dominant.vitality(),
        };

        result.element_score = rule.delta;
        result.explanation = render(&rule.explanation, &values);

        if !rule.note.is_empty() {
            let note = render(&rule.note, &values);
            if relation == ElementRelation::Controls {
                result.warnings.push(note);
            } else {
                result.recommendations.push(note);
            }
        }
    }

    fn apply_zodiac(&self, result: &mut CompatibilityScore, sign: Animal, candidate: Animal) {
        let zodiac = &self.rules.zodiac;
        let (rule, is_warning) = match zodiac_match(sign, candidate) {
            ZodiacMatch::Best => (&zodiac.best, false),
            ZodiacMatch::Good => (&zodiac.good, false),
            ZodiacMatch::Challenging => (&zodiac.challenging, true),
            ZodiacMatch::Conflict => (&zodiac.conflict, true),
            ZodiacMatch::Neutral => return,
        };

        result.zodiac_score = rule.delta;

        if !rule.note.is_empty() {
            let values = Placeholders {
                from: candidate.name(),
                to: sign.name(),
                ..Default::default()
            };
            let note = render(&rule.note, &values);
            if is_warning {
                result.warnings.push(note);
            } else {
                result.recommendations.push(note);
            }
        }
    }
}
