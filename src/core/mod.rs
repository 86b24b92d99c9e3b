// Core algorithm exports
pub mod attribute;
pub mod matcher;
pub mod mutual;
pub mod scoring;
pub mod stats;
pub mod weights;

pub use attribute::{boolean_score, ordinal_score, range_score, score_attribute, RuleScore};
pub use matcher::{MatchResult, Matcher};
pub use mutual::{combine_scores, mutual_match, MutualScore};
pub use scoring::calculate_match_score;
pub use stats::{build_dashboard, Dashboard};
pub use weights::dynamic_weight;
