use serde::Serialize;

use crate::models::domain::{AttributeScore, Attributes, FruitRecord, MutualMatchResult};
use crate::models::preferences::Preferences;

/// Both directions of a match breakdown
#[derive(Debug, Clone, Serialize)]
pub struct MatchBreakdown {
    pub our: Vec<AttributeScore>,
    pub their: Vec<AttributeScore>,
}

/// A ranked match as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub score: u8,
    pub our_score: u8,
    pub their_score: u8,
    pub attributes: Attributes,
    pub preferences: Preferences,
    pub breakdown: MatchBreakdown,
}

impl From<MutualMatchResult> for MatchSummary {
    fn from(result: MutualMatchResult) -> Self {
        Self {
            id: result.fruit.id,
            score: result.score,
            our_score: result.our_score,
            their_score: result.their_score,
            attributes: result.fruit.attributes,
            preferences: result.fruit.preferences,
            breakdown: MatchBreakdown {
                our: result.our_breakdown,
                their: result.their_breakdown,
            },
        }
    }
}

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchSummary>,
    pub total_candidates: usize,
}

/// Response for the incoming-fruit endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFruitResponse<C: Serialize, E: Serialize> {
    pub fruit: FruitRecord,
    pub communication: C,
    pub matches: Vec<MatchSummary>,
    pub total_candidates: usize,
    pub explanation: E,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub apples: usize,
    pub oranges: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
