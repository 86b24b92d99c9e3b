//! Fruit Match - mutual matchmaking service for apples and oranges
//!
//! This library provides the matching engine: per-attribute gradient scoring,
//! selectivity-based dynamic weights, two-directional mutual scoring and
//! parallel ranking of a candidate pool, plus the HTTP service around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, dynamic_weight, mutual_match, Matcher, MutualScore};
pub use models::{
    Attributes, FruitKind, FruitRecord, MatchScoreResult, MutualMatchResult, NumericRange,
    Preferences, ScoringTables, ShineFactor, ShinePreference,
};
