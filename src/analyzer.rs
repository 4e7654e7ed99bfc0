//! Element Analyzer
//!
//! Aggregates a weighted element distribution over the eight chart
//! contributors and classifies dominant, weakest, missing and beneficial
//! elements.
//!
//! The month branch carries the seasonal command and outweighs every other
//! contributor. The day stem is counted: this is the overall elemental
//! atmosphere of the chart, not a day-master strength reading.

use crate::calendar::{FullChart, Pillar};
use crate::elements::{join_names, Element};
use serde::{Deserialize, Serialize};

/// Share above which the dominant element calls for its controller (40%)
const OVERPOWERING_PERCENT: u32 = 40;

/// Points per chart contributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWeights {
    pub year_stem: u32,
    pub year_branch: u32,
    pub month_stem: u32,
    pub month_branch: u32,
    pub day_stem: u32,
    pub day_branch: u32,
    pub hour_stem: u32,
    pub hour_branch: u32,
}

impl Default for ChartWeights {
    fn default() -> Self {
        Self {
            year_stem: 10,
            year_branch: 10,
            month_stem: 10,
            month_branch: 40,
            day_stem: 20,
            day_branch: 15,
            hour_stem: 10,
            hour_branch: 10,
        }
    }
}

impl ChartWeights {
    pub fn total(&self) -> u32 {
        self.year_stem
            + self.year_branch
            + self.month_stem
            + self.month_branch
            + self.day_stem
            + self.day_branch
            + self.hour_stem
            + self.hour_branch
    }

    /// (stem, branch) weights in year, month, day, hour order
    fn per_pillar(&self) -> [(u32, u32); 4] {
        [
            (self.year_stem, self.year_branch),
            (self.month_stem, self.month_branch),
            (self.day_stem, self.day_branch),
            (self.hour_stem, self.hour_branch),
        ]
    }
}

/// Weighted score per element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementFrequencies {
    pub wood: u32,
    pub fire: u32,
    pub earth: u32,
    pub metal: u32,
    pub water: u32,
}

impl ElementFrequencies {
    pub fn get(&self, element: Element) -> u32 {
        match element {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }

    fn add(&mut self, element: Element, points: u32) {
        let slot = match element {
            Element::Wood => &mut self.wood,
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Metal => &mut self.metal,
            Element::Water => &mut self.water,
        };
        *slot += points;
    }

    pub fn total(&self) -> u32 {
        Element::ALL.iter().map(|&e| self.get(e)).sum()
    }

    /// (element, score) in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL.into_iter().map(move |e| (e, self.get(e)))
    }

    /// Elements ordered by ascending score.
    ///
    /// Ties run in reverse canonical order: among equal scores the element
    /// later in the Wood..Water cycle counts as weaker.
    pub fn ascending(&self) -> Vec<Element> {
        let mut elements = Element::ALL.to_vec();
        elements.reverse();
        elements.sort_by_key(|&e| self.get(e));
        elements
    }
}

/// Elemental profile of one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartAnalysis {
    pub chart: FullChart,
    pub scores: ElementFrequencies,
    pub dominant_element: Element,
    /// Two lowest scores, weakest first
    pub weakest_elements: Vec<Element>,
    pub missing_elements: Vec<Element>,
    pub beneficial_elements: Vec<Element>,
    /// Dominant element and the element that produces it
    pub strengths: Vec<Element>,
    /// Dominant score / total score
    pub dominant_share: f64,
    pub summary: String,
}

/// Analyze a chart with the canonical weighting
pub fn analyze_chart(chart: &FullChart) -> ChartAnalysis {
    analyze_chart_with(chart, &ChartWeights::default())
}

/// Analyze a chart with custom weights
pub fn analyze_chart_with(chart: &FullChart, weights: &ChartWeights) -> ChartAnalysis {
    let scores = element_frequencies(chart, weights);
    let total = scores.total();
    assert!(total > 0, "chart weights must sum to a positive total");

    let dominant_element = dominant(&scores);
    let ascending = scores.ascending();

    let missing_elements: Vec<Element> = scores
        .iter()
        .filter(|&(_, score)| score == 0)
        .map(|(e, _)| e)
        .collect();

    let weakest_elements: Vec<Element> = ascending.iter().take(2).copied().collect();

    let mut beneficial_elements = missing_elements.clone();

    if scores.get(dominant_element) * 100 > total * OVERPOWERING_PERCENT {
        push_unique(&mut beneficial_elements, dominant_element.controlled_by());
    }

    if missing_elements.len() < 2 {
        if let Some(&weakest_present) = ascending.iter().find(|&&e| scores.get(e) > 0) {
            push_unique(&mut beneficial_elements, weakest_present);
        }
    }

    let strengths = vec![dominant_element, dominant_element.produced_by()];
    let summary = summarize(dominant_element, &missing_elements, &beneficial_elements);

    ChartAnalysis {
        chart: chart.clone(),
        scores,
        dominant_element,
        weakest_elements,
        missing_elements,
        beneficial_elements,
        strengths,
        dominant_share: f64::from(scores.get(dominant_element)) / f64::from(total),
        summary,
    }
}

/// Weighted element totals over the eight contributors
pub fn element_frequencies(chart: &FullChart, weights: &ChartWeights) -> ElementFrequencies {
    let mut scores = ElementFrequencies::default();
    for (pillar, (stem_weight, branch_weight)) in chart.pillars().into_iter().zip(weights.per_pillar()) {
        add_pillar(&mut scores, pillar, stem_weight, branch_weight);
    }
    scores
}

fn add_pillar(scores: &mut ElementFrequencies, pillar: &Pillar, stem_weight: u32, branch_weight: u32) {
    scores.add(pillar.stem_element(), stem_weight);
    scores.add(pillar.branch_element(), branch_weight);
}

/// Highest score; the first element in canonical order wins a tie
fn dominant(scores: &ElementFrequencies) -> Element {
    let mut best = Element::Wood;
    for (element, score) in scores.iter() {
        if score > scores.get(best) {
            best = element;
        }
    }
    best
}

fn push_unique(elements: &mut Vec<Element>, element: Element) {
    if !elements.contains(&element) {
        elements.push(element);
    }
}

fn summarize(dominant: Element, missing: &[Element], beneficial: &[Element]) -> String {
    let missing_part = if missing.is_empty() {
        "Your energy profile is relatively distributed.".to_string()
    } else {
        let names: Vec<&str> = missing.iter().map(|e| e.name()).collect();
        format!("You are missing {} elements.", names.join(", "))
    };

    format!(
        "Your chart shows a strong influence of {} energy. {} To balance your energy, we recommend items rich in {}.",
        dominant,
        missing_part,
        join_names(beneficial)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{calculate_chart, BirthInput};
    use approx::assert_relative_eq;

    fn analysis(y: i32, m: u32, d: u32, hour: Option<u8>) -> ChartAnalysis {
        let input = BirthInput::from_ymd(y, m, d, hour).unwrap();
        analyze_chart(&calculate_chart(&input))
    }

    #[test]
    fn test_canonical_weights_sum_to_125() {
        assert_eq!(ChartWeights::default().total(), 125);
    }

    #[test]
    fn test_frequencies_sum_to_125_across_dates() {
        for year in (1900..=2100).step_by(7) {
            for (month, day) in [(1, 3), (2, 4), (5, 15), (8, 31), (12, 24)] {
                for hour in [0u8, 7, 12, 23] {
                    let a = analysis(year, month, day, Some(hour));
                    assert_eq!(a.scores.total(), 125, "{}-{}-{} {}h", year, month, day, hour);
                    assert!(!a.beneficial_elements.is_empty());
                    assert_eq!(a.weakest_elements.len(), 2);
                    assert_eq!(a.scores.iter().count(), 5);
                }
            }
        }
    }

    #[test]
    fn test_fire_dominant_chart() {
        // Geng Wu / Xin Si / Geng Chen / Ren Wu
        let a = analysis(1990, 5, 15, None);
        assert_eq!(a.scores.fire, 60);
        assert_eq!(a.scores.metal, 40);
        assert_eq!(a.scores.earth, 15);
        assert_eq!(a.scores.water, 10);
        assert_eq!(a.scores.wood, 0);

        assert_eq!(a.dominant_element, Element::Fire);
        assert_relative_eq!(a.dominant_share, 0.48, epsilon = 1e-9);
        assert_eq!(a.missing_elements, vec![Element::Wood]);
        assert_eq!(a.weakest_elements, vec![Element::Wood, Element::Water]);
        // Missing Wood, then Water as Fire's controller (also the weakest present)
        assert_eq!(a.beneficial_elements, vec![Element::Wood, Element::Water]);
        assert!(a.strengths.contains(&Element::Fire));
        assert!(a.strengths.contains(&Element::Wood));
    }

    #[test]
    fn test_exactly_forty_percent_does_not_add_controller() {
        // Ji Hai / Bing Zi / Jia Xu / Geng Wu: Water 50 of 125
        let a = analysis(1900, 1, 1, Some(12));
        assert_eq!(a.dominant_element, Element::Water);
        assert_eq!(a.scores.water, 50);
        assert!(a.missing_elements.is_empty());
        assert_eq!(a.beneficial_elements, vec![Element::Metal]);
        assert!(!a.beneficial_elements.contains(&Element::Earth));
    }

    #[test]
    fn test_two_missing_skips_weakest_present() {
        // Ji Si / Bing Zi / Wu Chen / Wu Wu: Wood and Metal absent
        let a = analysis(1990, 1, 3, None);
        assert_eq!(a.dominant_element, Element::Earth);
        assert_eq!(a.missing_elements, vec![Element::Wood, Element::Metal]);
        // Wood is both missing and Earth's controller; no duplicate
        assert_eq!(a.beneficial_elements, vec![Element::Wood, Element::Metal]);
    }

    #[test]
    fn test_dominant_tie_prefers_canonical_order() {
        let scores = ElementFrequencies { wood: 0, fire: 40, earth: 40, metal: 45, water: 0 };
        assert_eq!(dominant(&scores), Element::Metal);
        let scores = ElementFrequencies { wood: 0, fire: 50, earth: 50, metal: 25, water: 0 };
        assert_eq!(dominant(&scores), Element::Fire);
    }

    #[test]
    fn test_ascending_breaks_ties_toward_later_elements() {
        let scores = ElementFrequencies { wood: 10, fire: 0, earth: 10, metal: 0, water: 105 };
        assert_eq!(
            scores.ascending(),
            vec![Element::Metal, Element::Fire, Element::Earth, Element::Wood, Element::Water]
        );
    }

    #[test]
    fn test_weakest_tie_picks_later_element() {
        // Geng Yin / Wu Yin / Yi Wei / Ren Wu: Wood 70, Earth 25, Fire = Metal = Water = 10
        let a = analysis(1950, 3, 1, None);
        assert_eq!(a.scores.wood, 70);
        assert_eq!(a.scores.earth, 25);
        assert_eq!((a.scores.fire, a.scores.metal, a.scores.water), (10, 10, 10));
        assert_eq!(a.dominant_element, Element::Wood);
        assert!(a.missing_elements.is_empty());
        assert_eq!(a.weakest_elements, vec![Element::Water, Element::Metal]);
        // Metal controls the overpowering Wood; Water is the weakest present
        assert_eq!(a.beneficial_elements, vec![Element::Metal, Element::Water]);
    }

    #[test]
    fn test_summary_text() {
        let a = analysis(1990, 5, 15, None);
        assert_eq!(
            a.summary,
            "Your chart shows a strong influence of Fire energy. You are missing Wood elements. \
             To balance your energy, we recommend items rich in Wood and Water."
        );

        let a = analysis(1900, 1, 1, Some(12));
        assert!(a.summary.contains("relatively distributed"));
        assert!(a.summary.ends_with("rich in Metal."));
    }

    #[test]
    fn test_custom_weights() {
        let input = BirthInput::from_ymd(1990, 5, 15, None).unwrap();
        let chart = calculate_chart(&input);
        let flat = ChartWeights {
            year_stem: 1,
            year_branch: 1,
            month_stem: 1,
            month_branch: 1,
            day_stem: 1,
            day_branch: 1,
            hour_stem: 1,
            hour_branch: 1,
        };
        let a = analyze_chart_with(&chart, &flat);
        assert_eq!(a.scores.total(), 8);
        assert_eq!(a.scores.metal, 3);
        assert_eq!(a.scores.fire, 3);
        // Tie goes to Fire (declared before Metal)
        assert_eq!(a.dominant_element, Element::Fire);
    }
}
