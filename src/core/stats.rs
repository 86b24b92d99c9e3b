use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{AttributeName, Conversation, FruitKind, FruitRecord};

/// Score a top match must reach for its conversation to count as a hit
pub const TOP_MATCH_THRESHOLD: u8 = 70;

const BUCKETS: [(u8, u8); 5] = [(0, 20), (21, 40), (41, 60), (61, 80), (81, 100)];

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub range: String,
    pub count: usize,
}

/// Mean directional scores for one kind of incoming fruit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionGap {
    pub kind: FruitKind,
    pub your_score: u8,
    pub their_score: u8,
}

/// Headline numbers over the conversation history. `None` until a match exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub average_score: Option<u8>,
    pub average_gap: Option<u8>,
    pub top_match_rate: Option<u8>,
    pub conversations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_apples: usize,
    pub total_oranges: usize,
    pub overview: Overview,
    pub histogram: Vec<ScoreBucket>,
    pub satisfaction_gap: Vec<SatisfactionGap>,
    pub preference_coverage: BTreeMap<AttributeName, f64>,
    pub dealbreaker_rates: BTreeMap<AttributeName, f64>,
}

/// Count scores per fixed bucket; every score in 0-100 lands in exactly one
pub fn bucket_scores<I>(scores: I) -> Vec<ScoreBucket>
where
    I: IntoIterator<Item = u8>,
{
    let mut counts = [0usize; BUCKETS.len()];
    for score in scores {
        if let Some(index) = BUCKETS
            .iter()
            .position(|(min, max)| score >= *min && score <= *max)
        {
            counts[index] += 1;
        }
    }

    BUCKETS
        .iter()
        .zip(counts)
        .map(|((min, max), count)| ScoreBucket {
            range: format!("{}-{}", min, max),
            count,
        })
        .collect()
}

fn rounded_mean(sum: u64, count: u64) -> u8 {
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u8
    }
}

/// Mean our-score and their-score per incoming kind, 0 when a kind has no matches
pub fn satisfaction_gap(history: &[Conversation]) -> Vec<SatisfactionGap> {
    FruitKind::ALL
        .iter()
        .map(|kind| {
            let (ours, theirs, count) = history
                .iter()
                .filter(|conversation| conversation.kind == *kind)
                .flat_map(|conversation| conversation.matches.iter())
                .fold((0u64, 0u64, 0u64), |(ours, theirs, count), outcome| {
                    (
                        ours + outcome.our_score as u64,
                        theirs + outcome.their_score as u64,
                        count + 1,
                    )
                });

            SatisfactionGap {
                kind: *kind,
                your_score: rounded_mean(ours, count),
                their_score: rounded_mean(theirs, count),
            }
        })
        .collect()
}

/// Fraction of the pool declaring each attribute. An empty pool counts as one.
pub fn preference_coverage(pool: &[FruitRecord]) -> BTreeMap<AttributeName, f64> {
    let total = pool.len().max(1) as f64;

    AttributeName::ALL
        .iter()
        .map(|attribute| {
            let declared = pool
                .iter()
                .filter(|record| record.preferences.contains(*attribute))
                .count();
            (*attribute, declared as f64 / total)
        })
        .collect()
}

/// Fraction of the pool declaring each boolean attribute; attributes nobody
/// declares are left out
pub fn dealbreaker_rates(pool: &[FruitRecord]) -> BTreeMap<AttributeName, f64> {
    let total = pool.len().max(1) as f64;

    AttributeName::BOOLEANS
        .iter()
        .filter_map(|attribute| {
            let declared = pool
                .iter()
                .filter(|record| record.preferences.contains(*attribute))
                .count();
            (declared > 0).then(|| (*attribute, declared as f64 / total))
        })
        .collect()
}

pub fn overview(history: &[Conversation]) -> Overview {
    let outcomes: Vec<_> = history.iter().flat_map(|c| c.matches.iter()).collect();

    if outcomes.is_empty() {
        return Overview {
            average_score: None,
            average_gap: None,
            top_match_rate: None,
            conversations: history.len(),
        };
    }

    let count = outcomes.len() as u64;
    let score_sum: u64 = outcomes.iter().map(|o| o.score as u64).sum();
    let gap_sum: u64 = outcomes
        .iter()
        .map(|o| o.our_score.abs_diff(o.their_score) as u64)
        .sum();
    let top_hits = history
        .iter()
        .filter(|c| c.matches.first().is_some_and(|top| top.score >= TOP_MATCH_THRESHOLD))
        .count();

    Overview {
        average_score: Some(rounded_mean(score_sum, count)),
        average_gap: Some(rounded_mean(gap_sum, count)),
        top_match_rate: Some(rounded_mean(top_hits as u64 * 100, history.len() as u64)),
        conversations: history.len(),
    }
}

/// Assemble every dashboard statistic from the stored pools and history
pub fn build_dashboard(
    apples: &[FruitRecord],
    oranges: &[FruitRecord],
    history: &[Conversation],
) -> Dashboard {
    let pool: Vec<FruitRecord> = apples.iter().chain(oranges.iter()).cloned().collect();
    let scores = history
        .iter()
        .flat_map(|c| c.matches.iter().map(|outcome| outcome.score));

    Dashboard {
        total_apples: apples.len(),
        total_oranges: oranges.len(),
        overview: overview(history),
        histogram: bucket_scores(scores),
        satisfaction_gap: satisfaction_gap(history),
        preference_coverage: preference_coverage(&pool),
        dealbreaker_rates: dealbreaker_rates(&pool),
    }
}
