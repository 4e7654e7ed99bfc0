//! Bazi Matcher
//!
//! Four-pillar chart calculation, element analysis and candidate ranking.
//!
//! Layout:
//! - `calendar/`: stem/branch tables and the pillar calculator
//! - `analyzer`: weighted element distribution and balance classification
//! - `intentions`: intention tag -> element mapping
//! - `compatibility/`: element-cycle and zodiac scoring with loadable rules
//! - `matcher`: intention-driven and element-only ranking
//! - `explain/`: explanation generators (template, provider chain, HTTP)
//!
//! Everything up to ranking is synchronous and pure. Explanation generation
//! is the only async step and never fails a ranking.

pub mod analyzer;
pub mod calendar;
pub mod compatibility;
pub mod config;
pub mod elements;
pub mod error;
pub mod explain;
pub mod intentions;
pub mod matcher;

// Re-export commonly used types
pub use analyzer::{analyze_chart, analyze_chart_with, ChartAnalysis, ChartWeights, ElementFrequencies};
pub use calendar::{calculate_chart, year_profile, Animal, BirthInput, FullChart, Pillar, YearProfile};
pub use compatibility::{ChartProfile, CompatibilityScore, CompatibilityScorer, ScoringRules};
pub use config::MatcherConfig;
pub use elements::{Element, ElementRelation, Polarity};
pub use error::{ExplanationError, UnknownName, ValidationError};
pub use explain::{ExplanationContext, ExplanationGenerator, ProviderChain, TemplateExplainer};
pub use intentions::{all_intentions, elements_for_intentions, intentions_in, IntentionCategory};
pub use matcher::{intention_score, CandidateItem, Matcher, QualityTier, RankedMatch};

/// Chart and analysis for a validated birth input
pub fn analyze_birth(input: &BirthInput) -> ChartAnalysis {
    analyze_chart(&calculate_chart(input))
}
