//! Rank a catalog for one birth date and print the report as JSON
//!
//! Usage:
//!   match_report YYYY-MM-DD [--hour H] [--by-compatibility] [INTENTION ...]
//!
//! Environment:
//!   BAZI_CATALOG_PATH   JSON array of candidates (built-in demo catalog when unset)
//!   BAZI_*              matcher settings, see `MatcherConfig::from_env`
//!   BAZI_LLM_BASE_URL   enables the hosted explainer (`http` feature)

use anyhow::{Context, Result};
use bazi_matcher::{
    analyze_birth, elements_for_intentions, BirthInput, CandidateItem, ChartAnalysis, CompatibilityScorer,
    Element, ExplanationGenerator, Matcher, MatcherConfig, QualityTier, RankedMatch, TemplateExplainer,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug)]
struct Args {
    date: NaiveDate,
    hour: Option<u8>,
    by_compatibility: bool,
    intentions: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    birth: &'a BirthInput,
    analysis: &'a ChartAnalysis,
    intention_elements: Vec<Element>,
    matches: Vec<RankedMatch>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);

    let raw_date = args
        .next()
        .context("Usage: match_report YYYY-MM-DD [--hour H] [--by-compatibility] [INTENTION ...]")?;
    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .with_context(|| format!("Invalid birth date: {}", raw_date))?;

    let mut hour = None;
    let mut by_compatibility = false;
    let mut intentions = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--hour" => {
                let raw = args.next().context("--hour needs a value")?;
                hour = Some(raw.parse().with_context(|| format!("Invalid hour: {}", raw))?);
            }
            "--by-compatibility" => by_compatibility = true,
            _ => intentions.push(arg),
        }
    }

    Ok(Args {
        date,
        hour,
        by_compatibility,
        intentions,
    })
}

fn load_catalog() -> Result<Vec<CandidateItem>> {
    match std::env::var("BAZI_CATALOG_PATH") {
        Ok(path) => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read catalog file: {}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse catalog JSON")
        }
        Err(_) => Ok(demo_catalog()),
    }
}

fn demo_catalog() -> Vec<CandidateItem> {
    vec![
        CandidateItem::new(1, "Green Aventurine", Element::Wood, QualityTier::Good),
        CandidateItem::new(2, "Jade", Element::Wood, QualityTier::High).with_animal("Rabbit"),
        CandidateItem::new(3, "Carnelian", Element::Fire, QualityTier::Good),
        CandidateItem::new(4, "Red Jasper", Element::Fire, QualityTier::Normal).with_animal("Horse"),
        CandidateItem::new(5, "Citrine", Element::Earth, QualityTier::High),
        CandidateItem::new(6, "Tiger Eye", Element::Earth, QualityTier::Good).with_animal("Tiger"),
        CandidateItem::new(7, "Clear Quartz", Element::Metal, QualityTier::High),
        CandidateItem::new(8, "Pyrite", Element::Metal, QualityTier::Normal),
        CandidateItem::new(9, "Aquamarine", Element::Water, QualityTier::High),
        CandidateItem::new(10, "Black Obsidian", Element::Water, QualityTier::Good).with_animal("Rat"),
        CandidateItem::new(11, "Moonstone", Element::Water, QualityTier::Normal).unavailable(),
    ]
}

#[cfg(feature = "http")]
fn build_explainer() -> Arc<dyn ExplanationGenerator> {
    use bazi_matcher::explain::{ExplainerConfig, OpenAiCompatibleExplainer};
    use bazi_matcher::ProviderChain;

    match ExplainerConfig::from_env() {
        Some(config) => {
            tracing::info!("  Explainer: {} ({})", config.model, config.base_url);
            let generators: Vec<Arc<dyn ExplanationGenerator>> = vec![
                Arc::new(OpenAiCompatibleExplainer::new(config)),
                Arc::new(TemplateExplainer),
            ];
            Arc::new(ProviderChain::new(generators))
        }
        None => Arc::new(TemplateExplainer),
    }
}

#[cfg(not(feature = "http"))]
fn build_explainer() -> Arc<dyn ExplanationGenerator> {
    Arc::new(TemplateExplainer)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazi_matcher=info,match_report=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;
    let config = MatcherConfig::from_env()?;
    let rules = config.load_rules()?;

    tracing::info!("Configuration:");
    tracing::info!("  Intention top-N: {}", config.intention_top_n);
    tracing::info!("  Compatibility top-N: {}", config.compatibility_top_n);
    tracing::info!("  Explanation timeout: {:?}", config.explanation_timeout);

    let birth = BirthInput::new(args.date, args.hour)?;
    let analysis = analyze_birth(&birth);
    let catalog = load_catalog()?;

    let matcher = Matcher::new(CompatibilityScorer::new(rules), build_explainer(), config);

    let start = Instant::now();
    let matches = if args.by_compatibility {
        matcher.match_by_compatibility(&analysis, &catalog).await
    } else {
        matcher.match_intentions(&analysis, &args.intentions, &catalog).await
    };
    tracing::info!("Ranked {} candidates in {:?}", catalog.len(), start.elapsed());

    let report = Report {
        birth: &birth,
        analysis: &analysis,
        intention_elements: elements_for_intentions(&args.intentions),
        matches,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
