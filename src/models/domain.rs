use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::attribute::{AttributeName, AttributeValue, ShineFactor};
use crate::models::preferences::Preferences;

/// The two sides of the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    Apple,
    Orange,
}

impl FruitKind {
    pub const ALL: [FruitKind; 2] = [FruitKind::Apple, FruitKind::Orange];

    /// The kind a fruit of this kind is matched against
    pub fn opposite(&self) -> FruitKind {
        match self {
            FruitKind::Apple => FruitKind::Orange,
            FruitKind::Orange => FruitKind::Apple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FruitKind::Apple => "apple",
            FruitKind::Orange => "orange",
        }
    }
}

impl fmt::Display for FruitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable attributes of a fruit. `None` means unknown, never absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub has_stem: Option<bool>,
    #[serde(default)]
    pub has_leaf: Option<bool>,
    #[serde(default)]
    pub has_worm: Option<bool>,
    #[serde(default)]
    pub shine_factor: Option<ShineFactor>,
    #[serde(default)]
    pub has_chemicals: Option<bool>,
}

impl Attributes {
    /// Look up one attribute, tagged with its kind
    pub fn value(&self, attribute: AttributeName) -> Option<AttributeValue> {
        match attribute {
            AttributeName::Size => self.size.map(AttributeValue::Number),
            AttributeName::Weight => self.weight.map(AttributeValue::Number),
            AttributeName::HasStem => self.has_stem.map(AttributeValue::Flag),
            AttributeName::HasLeaf => self.has_leaf.map(AttributeValue::Flag),
            AttributeName::HasWorm => self.has_worm.map(AttributeValue::Flag),
            AttributeName::ShineFactor => self.shine_factor.map(AttributeValue::Shine),
            AttributeName::HasChemicals => self.has_chemicals.map(AttributeValue::Flag),
        }
    }
}

/// A stored fruit profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitRecord {
    pub id: String,
    pub kind: FruitKind,
    pub attributes: Attributes,
    pub preferences: Preferences,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Score of a single declared preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeScore {
    pub attribute: AttributeName,
    /// Unit-interval score
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub reason: String,
}

/// One-directional result: how well a candidate satisfies one set of preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoreResult {
    /// Weighted score, 0-100
    pub score: u8,
    /// Unweighted mean of attribute scores, 0-100
    pub raw_score: u8,
    pub breakdown: Vec<AttributeScore>,
    pub total_weight: f64,
}

/// Full mutual match of one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct MutualMatchResult {
    pub fruit: FruitRecord,
    /// Combined mutual score, 0-100
    pub score: u8,
    /// How well the candidate satisfies our preferences
    pub our_score: u8,
    /// How well we satisfy the candidate's preferences
    pub their_score: u8,
    pub our_breakdown: Vec<AttributeScore>,
    pub their_breakdown: Vec<AttributeScore>,
}

/// Scores of one ranked match, kept for dashboard statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub score: u8,
    pub our_score: u8,
    pub their_score: u8,
}

impl From<&MutualMatchResult> for MatchOutcome {
    fn from(result: &MutualMatchResult) -> Self {
        Self {
            score: result.score,
            our_score: result.our_score,
            their_score: result.their_score,
        }
    }
}

/// One completed matchmaking round for an incoming fruit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub fruit_id: String,
    pub kind: FruitKind,
    pub matches: Vec<MatchOutcome>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_kind() {
        assert_eq!(FruitKind::Apple.opposite(), FruitKind::Orange);
        assert_eq!(FruitKind::Orange.opposite(), FruitKind::Apple);
    }

    #[test]
    fn test_attribute_lookup() {
        let attrs = Attributes {
            size: Some(7.5),
            has_worm: Some(false),
            shine_factor: Some(ShineFactor::Shiny),
            ..Attributes::default()
        };

        assert_eq!(attrs.value(AttributeName::Size), Some(AttributeValue::Number(7.5)));
        assert_eq!(attrs.value(AttributeName::HasWorm), Some(AttributeValue::Flag(false)));
        assert_eq!(
            attrs.value(AttributeName::ShineFactor),
            Some(AttributeValue::Shine(ShineFactor::Shiny))
        );
        assert_eq!(attrs.value(AttributeName::Weight), None);
    }

    #[test]
    fn test_attributes_deserialize_nulls() {
        let json = r#"{"size": null, "weight": 180, "hasStem": true, "shineFactor": "extraShiny"}"#;
        let attrs: Attributes = serde_json::from_str(json).unwrap();

        assert_eq!(attrs.size, None);
        assert_eq!(attrs.weight, Some(180.0));
        assert_eq!(attrs.has_stem, Some(true));
        assert_eq!(attrs.has_leaf, None);
        assert_eq!(attrs.shine_factor, Some(ShineFactor::ExtraShiny));
    }
}
