use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{
    AttributeDefinition, AttributeName, NumericDomain, OrdinalScale, ScoringTables, TableError,
};
use crate::services::store::DEFAULT_HISTORY_LIMIT;

const ENV_PREFIX: &str = "FRUIT_MATCH";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub explainer: ExplainerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u8,
    #[serde(default = "default_max_limit")]
    pub max_limit: u8,
    /// Conversations kept for the dashboard
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            history_limit: default_history_limit(),
        }
    }
}

impl MatchingSettings {
    /// Requested limit, or the default, capped at `max_limit`
    pub fn effective_limit(&self, requested: Option<u8>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit) as usize
    }
}

fn default_limit() -> u8 { 3 }
fn default_max_limit() -> u8 { 20 }
fn default_history_limit() -> usize { DEFAULT_HISTORY_LIMIT }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_size_tolerance")]
    pub size_tolerance: f64,
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,
    #[serde(default = "default_size_domain")]
    pub size_domain: [f64; 2],
    #[serde(default = "default_weight_domain")]
    pub weight_domain: [f64; 2],
    #[serde(default = "default_uncertainty_score")]
    pub uncertainty_score: f64,
    #[serde(default = "default_boolean_multiplier")]
    pub boolean_multiplier: f64,
    #[serde(default = "default_max_amplification")]
    pub max_amplification: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            size_tolerance: default_size_tolerance(),
            weight_tolerance: default_weight_tolerance(),
            size_domain: default_size_domain(),
            weight_domain: default_weight_domain(),
            uncertainty_score: default_uncertainty_score(),
            boolean_multiplier: default_boolean_multiplier(),
            max_amplification: default_max_amplification(),
        }
    }
}

fn default_size_tolerance() -> f64 { 2.0 }
fn default_weight_tolerance() -> f64 { 40.0 }
fn default_size_domain() -> [f64; 2] { [2.0, 14.0] }
fn default_weight_domain() -> [f64; 2] { [50.0, 350.0] }
fn default_uncertainty_score() -> f64 { 0.5 }
fn default_boolean_multiplier() -> f64 { 1.2 }
fn default_max_amplification() -> f64 { 0.5 }

/// Base importance weight per attribute
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_size_weight")]
    pub size: f64,
    #[serde(default = "default_weight_weight")]
    pub weight: f64,
    #[serde(default = "default_stem_weight")]
    pub has_stem: f64,
    #[serde(default = "default_leaf_weight")]
    pub has_leaf: f64,
    #[serde(default = "default_worm_weight")]
    pub has_worm: f64,
    #[serde(default = "default_shine_weight")]
    pub shine_factor: f64,
    #[serde(default = "default_chemicals_weight")]
    pub has_chemicals: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            size: default_size_weight(),
            weight: default_weight_weight(),
            has_stem: default_stem_weight(),
            has_leaf: default_leaf_weight(),
            has_worm: default_worm_weight(),
            shine_factor: default_shine_weight(),
            has_chemicals: default_chemicals_weight(),
        }
    }
}

fn default_size_weight() -> f64 { 2.0 }
fn default_weight_weight() -> f64 { 2.0 }
fn default_stem_weight() -> f64 { 1.0 }
fn default_leaf_weight() -> f64 { 0.5 }
fn default_worm_weight() -> f64 { 5.0 }
fn default_shine_weight() -> f64 { 1.5 }
fn default_chemicals_weight() -> f64 { 3.0 }

impl TryFrom<&ScoringSettings> for ScoringTables {
    type Error = TableError;

    fn try_from(settings: &ScoringSettings) -> Result<Self, Self::Error> {
        let weights = &settings.weights;
        let [size_min, size_max] = settings.size_domain;
        let [weight_min, weight_max] = settings.weight_domain;

        ScoringTables::default()
            .with_definition(
                AttributeName::Size,
                AttributeDefinition::range(
                    weights.size,
                    settings.size_tolerance,
                    NumericDomain::new(size_min, size_max),
                ),
            )?
            .with_definition(
                AttributeName::Weight,
                AttributeDefinition::range(
                    weights.weight,
                    settings.weight_tolerance,
                    NumericDomain::new(weight_min, weight_max),
                ),
            )?
            .with_definition(AttributeName::HasStem, AttributeDefinition::boolean(weights.has_stem))?
            .with_definition(AttributeName::HasLeaf, AttributeDefinition::boolean(weights.has_leaf))?
            .with_definition(AttributeName::HasWorm, AttributeDefinition::boolean(weights.has_worm))?
            .with_definition(
                AttributeName::ShineFactor,
                AttributeDefinition::ordinal(weights.shine_factor, OrdinalScale::default()),
            )?
            .with_definition(
                AttributeName::HasChemicals,
                AttributeDefinition::boolean(weights.has_chemicals),
            )?
            .with_uncertainty_score(settings.uncertainty_score)?
            .with_boolean_multiplier(settings.boolean_multiplier)?
            .with_max_amplification(settings.max_amplification)
    }
}

/// Chat-completions endpoint used for match explanations.
/// Without an API key every explanation falls back to plain score summaries.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainerSettings {
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ExplainerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 2500 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FRUIT_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FRUIT_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Validated scoring tables built from the `scoring` section
    pub fn scoring_tables(&self) -> Result<ScoringTables, TableError> {
        ScoringTables::try_from(&self.scoring)
    }
}
