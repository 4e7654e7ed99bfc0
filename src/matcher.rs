//! Matcher / Ranker
//!
//! Two ranking flows over a candidate catalog:
//! - intention-driven: demand weights from the analysis and the user's
//!   intentions, plus a quality bonus (top 5 by default); zodiac tags and
//!   scorer notes are not part of this score
//! - element-only: the Compatibility Scorer total (top 10 by default)
//!
//! Scoring is synchronous and runs on rayon. Only the explanation step is
//! async: one call per ranked match, bounded to top-N in flight, each under
//! a timeout. Failed calls get the fallback sentence.

use crate::analyzer::ChartAnalysis;
use crate::compatibility::{CompatibilityScore, CompatibilityScorer};
use crate::config::MatcherConfig;
use crate::elements::Element;
use crate::error::ExplanationError;
use crate::explain::{fallback_explanation, ExplanationContext, ExplanationGenerator, TemplateExplainer};
use crate::intentions::elements_for_intentions;
use futures::stream::{self, StreamExt};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Demand points per beneficial element
const BENEFICIAL_WEIGHT: u32 = 3;
/// Demand points per intention element
const INTENTION_WEIGHT: u32 = 2;
/// Score per demand point, before the cap
const POINTS_PER_DEMAND: u32 = 20;
const DEMAND_CAP: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    High,
    Good,
    #[default]
    Normal,
}

impl QualityTier {
    pub const fn bonus(self) -> u32 {
        match self {
            QualityTier::High => 10,
            QualityTier::Good => 5,
            QualityTier::Normal => 0,
        }
    }
}

fn available_by_default() -> bool {
    true
}

/// Catalog entry supplied by the caller's inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: u64,
    pub name: String,
    pub element: Element,
    #[serde(default)]
    pub quality_tier: QualityTier,
    #[serde(default = "available_by_default")]
    pub available: bool,
    #[serde(default)]
    pub animal_tag: Option<String>,
}

impl CandidateItem {
    pub fn new(id: u64, name: impl Into<String>, element: Element, quality_tier: QualityTier) -> Self {
        Self {
            id,
            name: name.into(),
            element,
            quality_tier,
            available: true,
            animal_tag: None,
        }
    }

    pub fn with_animal(mut self, animal: impl Into<String>) -> Self {
        self.animal_tag = Some(animal.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedMatch {
    pub candidate_id: u64,
    pub candidate_name: String,
    pub element: Element,
    pub score: CompatibilityScore,
    pub reasons: Vec<String>,
    pub explanation_text: String,
}

/// Ranked match plus the index of its candidate in the input slice
type Indexed = (usize, RankedMatch);

pub struct Matcher {
    scorer: CompatibilityScorer,
    explainer: Arc<dyn ExplanationGenerator>,
    config: MatcherConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(
            CompatibilityScorer::default(),
            Arc::new(TemplateExplainer),
            MatcherConfig::default(),
        )
    }
}

impl Matcher {
    pub fn new(
        scorer: CompatibilityScorer,
        explainer: Arc<dyn ExplanationGenerator>,
        config: MatcherConfig,
    ) -> Self {
        Self {
            scorer,
            explainer,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Rank by analysis demand and intentions, then explain the top matches
    pub async fn match_intentions(
        &self,
        analysis: &ChartAnalysis,
        intentions: &[String],
        candidates: &[CandidateItem],
    ) -> Vec<RankedMatch> {
        let ranked = self.rank_intentions(analysis, intentions, candidates);
        self.attach_explanations(analysis, intentions, candidates, ranked).await
    }

    /// Rank by compatibility score, then explain the top matches
    pub async fn match_by_compatibility(
        &self,
        analysis: &ChartAnalysis,
        candidates: &[CandidateItem],
    ) -> Vec<RankedMatch> {
        let ranked = self.rank_compatibility(analysis, candidates);
        self.attach_explanations(analysis, &[], candidates, ranked).await
    }

    /// Intention-driven ranking without explanations
    pub fn score_intentions(
        &self,
        analysis: &ChartAnalysis,
        intentions: &[String],
        candidates: &[CandidateItem],
    ) -> Vec<RankedMatch> {
        strip_indices(self.rank_intentions(analysis, intentions, candidates))
    }

    /// Element-only ranking without explanations
    pub fn score_compatibility(&self, analysis: &ChartAnalysis, candidates: &[CandidateItem]) -> Vec<RankedMatch> {
        strip_indices(self.rank_compatibility(analysis, candidates))
    }

    fn rank_intentions(
        &self,
        analysis: &ChartAnalysis,
        intentions: &[String],
        candidates: &[CandidateItem],
    ) -> Vec<Indexed> {
        let start = Instant::now();
        let intention_elements = elements_for_intentions(intentions);
        let weights = demand_weights(analysis, &intention_elements);
        let first_intention = intentions.first().map(|s| s.trim());

        let scored: Vec<Indexed> = candidates
            .par_iter()
            .enumerate()
            .filter(|(_, c)| c.available)
            .map(|(i, candidate)| {
                let element = candidate.element;
                let score = intention_score(element, weights[element.index()], candidate.quality_tier);

                let mut reasons = Vec::new();
                if analysis.beneficial_elements.contains(&element) {
                    if analysis.missing_elements.contains(&element) {
                        push_unique(
                            &mut reasons,
                            format!("Restores your missing {} energy", element.name().to_lowercase()),
                        );
                    } else {
                        push_unique(&mut reasons, "Balances your energy profile".to_string());
                    }
                }
                if let Some(tag) = first_intention {
                    if intention_elements.contains(&element) {
                        push_unique(&mut reasons, format!("Supports your intention: {}", tag));
                    }
                }
                if candidate.quality_tier == QualityTier::High {
                    push_unique(&mut reasons, "Premium quality item".to_string());
                }

                (i, ranked_match(candidate, score, reasons))
            })
            .collect();

        let ranked = sort_and_truncate(scored, self.config.intention_top_n);
        tracing::debug!(
            "Ranked {} candidates by intention in {:?}",
            candidates.len(),
            start.elapsed()
        );
        ranked
    }

    fn rank_compatibility(&self, analysis: &ChartAnalysis, candidates: &[CandidateItem]) -> Vec<Indexed> {
        let start = Instant::now();

        let scored: Vec<Indexed> = candidates
            .par_iter()
            .enumerate()
            .filter(|(_, c)| c.available)
            .map(|(i, candidate)| {
                let score = self
                    .scorer
                    .score_analysis(analysis, candidate.element, candidate.animal_tag.as_deref());
                let reasons = score.recommendations.clone();
                (i, ranked_match(candidate, score, reasons))
            })
            .collect();

        let ranked = sort_and_truncate(scored, self.config.compatibility_top_n);
        tracing::debug!(
            "Ranked {} candidates by compatibility in {:?}",
            candidates.len(),
            start.elapsed()
        );
        ranked
    }

    async fn attach_explanations(
        &self,
        analysis: &ChartAnalysis,
        intentions: &[String],
        candidates: &[CandidateItem],
        ranked: Vec<Indexed>,
    ) -> Vec<RankedMatch> {
        if ranked.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let analysis = Arc::new(analysis.clone());
        let intentions: Arc<[String]> = intentions.iter().cloned().collect();
        let timeout = self.config.explanation_timeout;
        let concurrency = ranked.len();

        let contexts: Vec<ExplanationContext> = ranked
            .iter()
            .map(|(i, m)| ExplanationContext {
                candidate: candidates[*i].clone(),
                analysis: Arc::clone(&analysis),
                intentions: Arc::clone(&intentions),
                reasons: m.reasons.clone(),
            })
            .collect();

        let texts: Vec<String> = stream::iter(contexts)
            .map(|ctx| {
                let explainer = Arc::clone(&self.explainer);
                async move {
                    match generate_with_timeout(explainer.as_ref(), &ctx, timeout).await {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::warn!(
                                "Explanation failed for candidate {} ({}): {}",
                                ctx.candidate.id,
                                explainer.name(),
                                e
                            );
                            fallback_explanation(&ctx)
                        }
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        tracing::info!(
            "Generated {} explanations in {:?}",
            texts.len(),
            start.elapsed()
        );

        ranked
            .into_iter()
            .zip(texts)
            .map(|((_, mut m), text)| {
                m.explanation_text = text;
                m
            })
            .collect()
    }
}

/// Demand points per element, indexed by `Element::index`
pub fn demand_weights(analysis: &ChartAnalysis, intention_elements: &[Element]) -> [u32; 5] {
    let mut weights = [0u32; 5];
    for element in &analysis.beneficial_elements {
        weights[element.index()] += BENEFICIAL_WEIGHT;
    }
    for element in intention_elements {
        weights[element.index()] += INTENTION_WEIGHT;
    }
    weights
}

/// Intention-flow score: clamped demand plus the quality bonus.
///
/// Zodiac tags play no part here, so `zodiac_score` is 0 and
/// `total_score == element_score + tier.bonus()`. No scorer notes are carried.
pub fn intention_score(element: Element, weight: u32, tier: QualityTier) -> CompatibilityScore {
    let demand = (weight * POINTS_PER_DEMAND).min(DEMAND_CAP);
    let explanation = if weight > 0 {
        format!("{} is in demand for this chart (weight {})", element, weight)
    } else {
        format!("{} is not in demand for this chart", element)
    };

    CompatibilityScore {
        total_score: (demand + tier.bonus()) as i32,
        element_score: demand as i32,
        zodiac_score: 0,
        explanation,
        warnings: Vec::new(),
        recommendations: Vec::new(),
    }
}

async fn generate_with_timeout(
    explainer: &dyn ExplanationGenerator,
    ctx: &ExplanationContext,
    limit: Duration,
) -> Result<String, ExplanationError> {
    match tokio::time::timeout(limit, explainer.generate_explanation(ctx)).await {
        Ok(Ok(text)) if text.trim().is_empty() => Err(ExplanationError::EmptyResponse(explainer.name().to_string())),
        Ok(result) => result,
        Err(_) => Err(ExplanationError::Timeout(limit.as_millis())),
    }
}

fn ranked_match(candidate: &CandidateItem, score: CompatibilityScore, reasons: Vec<String>) -> RankedMatch {
    RankedMatch {
        candidate_id: candidate.id,
        candidate_name: candidate.name.clone(),
        element: candidate.element,
        score,
        reasons,
        explanation_text: String::new(),
    }
}

/// Stable descending sort on total score; equal scores keep input order
fn sort_and_truncate(mut scored: Vec<Indexed>, top_n: usize) -> Vec<Indexed> {
    scored.sort_by(|a, b| b.1.score.total_score.cmp(&a.1.score.total_score));
    scored.truncate(top_n);
    scored
}

fn strip_indices(ranked: Vec<Indexed>) -> Vec<RankedMatch> {
    ranked.into_iter().map(|(_, m)| m).collect()
}

fn push_unique(reasons: &mut Vec<String>, reason: String) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}
