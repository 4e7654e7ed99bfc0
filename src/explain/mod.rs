//! Explanation capability
//!
//! Produces the short "why this item suits you" paragraph attached to each
//! top-ranked match. Generators are injected into the matcher as
//! `Arc<dyn ExplanationGenerator>`; the matcher owns timeouts and fallbacks.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ExplainerConfig, OpenAiCompatibleExplainer};

use crate::analyzer::ChartAnalysis;
use crate::elements::join_names;
use crate::error::ExplanationError;
use crate::matcher::CandidateItem;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything a generator may draw on for one match
#[derive(Debug, Clone)]
pub struct ExplanationContext {
    pub candidate: CandidateItem,
    pub analysis: Arc<ChartAnalysis>,
    pub intentions: Arc<[String]>,
    pub reasons: Vec<String>,
}

impl ExplanationContext {
    /// First intention tag, lowercased, or "balance"
    pub fn focus(&self) -> String {
        self.intentions
            .first()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .unwrap_or_else(|| "balance".to_string())
    }
}

#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    /// Short identifier used in logs and error messages
    fn name(&self) -> &str;

    async fn generate_explanation(&self, ctx: &ExplanationContext) -> Result<String, ExplanationError>;
}

/// Sentence used when generation fails or times out
pub fn fallback_explanation(ctx: &ExplanationContext) -> String {
    format!(
        "This {} resonates with your energy profile and supports your journey toward {}.",
        ctx.candidate.name,
        ctx.focus()
    )
}

/// Prompt text sent to language-model generators
pub fn build_prompt(ctx: &ExplanationContext) -> String {
    let analysis = &ctx.analysis;
    let chart = &analysis.chart;

    let intentions = if ctx.intentions.is_empty() {
        "general balance".to_string()
    } else {
        ctx.intentions.join(", ")
    };

    let missing = if analysis.missing_elements.is_empty() {
        "none".to_string()
    } else {
        join_names(&analysis.missing_elements)
    };

    let mut prompt = format!(
        "You are a Bazi consultant. In 2-3 warm sentences, explain why {name} ({element} element) suits this person.\n\n\
         Chart:\n\
         - Animal sign: {animal}\n\
         - Year element: {year_element}\n\
         - Day master: {day_master}\n\
         - Dominant element: {dominant}\n\
         - Missing elements: {missing}\n\
         - Beneficial elements: {beneficial}\n\
         Intentions: {intentions}\n",
        name = ctx.candidate.name,
        element = ctx.candidate.element,
        animal = chart.animal_sign(),
        year_element = chart.year_element(),
        day_master = chart.day_master(),
        dominant = analysis.dominant_element,
        missing = missing,
        beneficial = join_names(&analysis.beneficial_elements),
        intentions = intentions,
    );

    if !ctx.reasons.is_empty() {
        prompt.push_str("Match reasons:\n");
        for reason in &ctx.reasons {
            prompt.push_str("- ");
            prompt.push_str(reason);
            prompt.push('\n');
        }
    }

    prompt.push_str("\nUse only the facts above. Do not make medical claims.");
    prompt
}

/// Deterministic explanation built from the analysis alone
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn render(ctx: &ExplanationContext) -> String {
        let analysis = &ctx.analysis;
        let element = ctx.candidate.element;

        let role = if analysis.missing_elements.contains(&element) {
            format!("restores the {} energy your chart is missing", element)
        } else if analysis.beneficial_elements.contains(&element) {
            format!("adds the {} energy that balances your chart", element)
        } else if element == analysis.dominant_element {
            format!("amplifies your dominant {} energy", element)
        } else {
            format!("brings {} energy alongside your {} strengths", element, analysis.dominant_element)
        };

        format!(
            "{} {} and supports your journey toward {}.",
            ctx.candidate.name,
            role,
            ctx.focus()
        )
    }
}

#[async_trait]
impl ExplanationGenerator for TemplateExplainer {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate_explanation(&self, ctx: &ExplanationContext) -> Result<String, ExplanationError> {
        Ok(Self::render(ctx))
    }
}

/// Tries each generator in order and returns the first non-empty answer
pub struct ProviderChain {
    generators: Vec<Arc<dyn ExplanationGenerator>>,
}

impl ProviderChain {
    pub fn new(generators: Vec<Arc<dyn ExplanationGenerator>>) -> Self {
        Self { generators }
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[async_trait]
impl ExplanationGenerator for ProviderChain {
    fn name(&self) -> &str {
        "chain"
    }

    async fn generate_explanation(&self, ctx: &ExplanationContext) -> Result<String, ExplanationError> {
        let mut errors = Vec::with_capacity(self.generators.len());

        for generator in &self.generators {
            tracing::debug!("Trying explanation provider {}", generator.name());
            let outcome = match generator.generate_explanation(ctx).await {
                Ok(text) if text.trim().is_empty() => {
                    Err(ExplanationError::EmptyResponse(generator.name().to_string()))
                }
                other => other,
            };

            match outcome {
                Ok(text) => return Ok(text.trim().to_string()),
                Err(e) => {
                    tracing::warn!("Explanation provider {} failed: {}", generator.name(), e);
                    errors.push(format!("{}: {}", generator.name(), e));
                }
            }
        }

        Err(ExplanationError::AllProvidersFailed(errors))
    }
}
