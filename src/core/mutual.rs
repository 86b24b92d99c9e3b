use crate::core::scoring::calculate_match_score;
use crate::models::{Attributes, MatchScoreResult, Preferences, ScoringTables};

/// Both directions of a match between side A and side B
#[derive(Debug, Clone, PartialEq)]
pub struct MutualScore {
    /// A's preferences scored against B's attributes
    pub ours: MatchScoreResult,
    /// B's preferences scored against A's attributes
    pub theirs: MatchScoreResult,
    /// Mean of the two directional scores, 0-100
    pub mutual: u8,
}

impl MutualScore {
    pub fn our_score(&self) -> u8 {
        self.ours.score
    }

    pub fn their_score(&self) -> u8 {
        self.theirs.score
    }
}

/// Score a pair in both directions and combine the results.
///
/// Swapping the sides swaps `ours` and `theirs` and leaves `mutual` unchanged.
pub fn mutual_match(
    prefs_a: &Preferences,
    attrs_a: &Attributes,
    prefs_b: &Preferences,
    attrs_b: &Attributes,
    tables: &ScoringTables,
) -> MutualScore {
    let ours = calculate_match_score(prefs_a, attrs_b, tables);
    let theirs = calculate_match_score(prefs_b, attrs_a, tables);
    let mutual = combine_scores(ours.score, theirs.score);

    MutualScore { ours, theirs, mutual }
}

/// Rounded mean of two directional scores
#[inline]
pub fn combine_scores(our_score: u8, their_score: u8) -> u8 {
    ((our_score as f64 + their_score as f64) / 2.0).round() as u8
}
