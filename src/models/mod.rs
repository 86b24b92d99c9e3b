// Model exports
pub mod attribute;
pub mod domain;
pub mod preferences;
pub mod requests;
pub mod responses;
pub mod tables;

pub use attribute::{AttributeKind, AttributeName, AttributeValue, ShineFactor};
pub use domain::{Attributes, AttributeScore, Conversation, FruitKind, FruitRecord, MatchOutcome, MatchScoreResult, MutualMatchResult};
pub use preferences::{NumericRange, Preference, PreferenceError, Preferences, ShinePreference};
pub use requests::{CreateFruitRequest, FindMatchesRequest, IncomingFruitRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, IncomingFruitResponse, MatchBreakdown, MatchSummary};
pub use tables::{AttributeDefinition, AttributeRule, NumericDomain, OrdinalScale, ScoringTables, TableError};
