//! Matcher configuration
//!
//! Environment variables (all optional):
//! - `BAZI_INTENTION_TOP_N` (default 5)
//! - `BAZI_COMPATIBILITY_TOP_N` (default 10)
//! - `BAZI_EXPLANATION_TIMEOUT_MS` (default 8000)
//! - `BAZI_RULES_PATH`: JSON scoring rules; compiled defaults when unset

use crate::compatibility::ScoringRules;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub intention_top_n: usize,
    pub compatibility_top_n: usize,
    /// Per-call limit for explanation generation
    pub explanation_timeout: Duration,
    pub rules_path: Option<PathBuf>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            intention_top_n: 5,
            compatibility_top_n: 10,
            explanation_timeout: Duration::from_millis(8000),
            rules_path: None,
        }
    }
}

impl MatcherConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let intention_top_n = parse_var("BAZI_INTENTION_TOP_N")?.unwrap_or(defaults.intention_top_n);
        let compatibility_top_n =
            parse_var("BAZI_COMPATIBILITY_TOP_N")?.unwrap_or(defaults.compatibility_top_n);
        let explanation_timeout = parse_var::<u64>("BAZI_EXPLANATION_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.explanation_timeout);
        let rules_path = env::var("BAZI_RULES_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if intention_top_n == 0 || compatibility_top_n == 0 {
            anyhow::bail!("Top-N limits must be positive");
        }

        Ok(Self {
            intention_top_n,
            compatibility_top_n,
            explanation_timeout,
            rules_path,
        })
    }

    /// Scoring rules from `rules_path`, or the compiled defaults
    pub fn load_rules(&self) -> Result<ScoringRules> {
        match &self.rules_path {
            Some(path) => ScoringRules::load(path),
            None => Ok(ScoringRules::default()),
        }
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {:?}", name, raw)),
        _ => Ok(None),
    }
}
