use rayon::prelude::*;
use std::sync::Arc;

use crate::core::{
    mutual::{mutual_match, MutualScore},
    scoring::calculate_match_score,
};
use crate::models::{
    Attributes, FruitKind, FruitRecord, MatchScoreResult, MutualMatchResult, Preferences,
    ScoringTables,
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<MutualMatchResult>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Opposite-kind selection
/// 2. Mutual scoring of every candidate (in parallel)
/// 3. Stable ranking by mutual score
/// 4. Optional top-N truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    tables: Arc<ScoringTables>,
}

impl Matcher {
    pub fn new(tables: ScoringTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    pub fn with_default_tables() -> Self {
        Self::new(ScoringTables::default())
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// One-directional score of `attributes` against `preferences`
    pub fn score(&self, preferences: &Preferences, attributes: &Attributes) -> MatchScoreResult {
        calculate_match_score(preferences, attributes, &self.tables)
    }

    /// Both directions for one pair
    pub fn mutual(
        &self,
        prefs_a: &Preferences,
        attrs_a: &Attributes,
        prefs_b: &Preferences,
        attrs_b: &Attributes,
    ) -> MutualScore {
        mutual_match(prefs_a, attrs_a, prefs_b, attrs_b, &self.tables)
    }

    /// Rank every opposite-kind candidate by mutual score
    ///
    /// # Arguments
    /// * `kind` - Kind of the fruit looking for matches
    /// * `preferences` - That fruit's preferences
    /// * `attributes` - That fruit's attributes
    /// * `candidates` - Snapshot of the candidate pool; records of the same kind are skipped
    ///
    /// # Returns
    /// Results sorted by mutual score, highest first. Equal scores keep their
    /// relative pool order.
    pub fn rank(
        &self,
        kind: FruitKind,
        preferences: &Preferences,
        attributes: &Attributes,
        candidates: Vec<FruitRecord>,
    ) -> Vec<MutualMatchResult> {
        let wanted = kind.opposite();

        // collect() keeps pool order even after filter; the stable sort relies on it
        let mut matches: Vec<MutualMatchResult> = candidates
            .into_par_iter()
            .filter(|candidate| candidate.kind == wanted)
            .map(|candidate| {
                let MutualScore { ours, theirs, mutual } = mutual_match(
                    preferences,
                    attributes,
                    &candidate.preferences,
                    &candidate.attributes,
                    &self.tables,
                );

                MutualMatchResult {
                    fruit: candidate,
                    score: mutual,
                    our_score: ours.score,
                    their_score: theirs.score,
                    our_breakdown: ours.breakdown,
                    their_breakdown: theirs.breakdown,
                }
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    /// Rank candidates and keep the best `limit`
    pub fn find_matches(
        &self,
        kind: FruitKind,
        preferences: &Preferences,
        attributes: &Attributes,
        candidates: Vec<FruitRecord>,
        limit: usize,
    ) -> MatchResult {
        let mut matches = self.rank(kind, preferences, attributes, candidates);
        let total_candidates = matches.len();

        tracing::debug!(
            "Ranked {} {} candidates for an incoming {}",
            total_candidates,
            kind.opposite(),
            kind
        );

        matches.truncate(limit);

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_tables()
    }
}
