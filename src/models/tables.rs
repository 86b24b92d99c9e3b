use thiserror::Error;

use crate::models::attribute::{AttributeKind, AttributeName, ShineFactor};

/// Score given to a declared preference whose attribute value is unknown
pub const UNKNOWN_ATTRIBUTE_SCORE: f64 = 0.5;

/// Fixed amplification for any declared boolean preference
pub const BOOLEAN_MULTIPLIER: f64 = 1.2;

/// Weight gain at full selectivity: `base × (1 + MAX_AMPLIFICATION × selectivity)`
pub const MAX_AMPLIFICATION: f64 = 0.5;

/// Errors raised while assembling scoring tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Base weight for {attribute} must be positive and finite, got {value}")]
    InvalidBaseWeight { attribute: AttributeName, value: f64 },

    #[error("Tolerance for {attribute} must be positive and finite, got {value}")]
    InvalidTolerance { attribute: AttributeName, value: f64 },

    #[error("Domain for {attribute} must satisfy min < max, got [{min}, {max}]")]
    InvalidDomain { attribute: AttributeName, min: f64, max: f64 },

    #[error("Ordinal scale for {0} has no levels")]
    EmptyScale(AttributeName),

    #[error("{attribute} is scored as {expected:?}, got a {found:?} rule")]
    RuleMismatch {
        attribute: AttributeName,
        expected: AttributeKind,
        found: AttributeKind,
    },

    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

/// Known spread of a numeric attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Ordered levels of an ordinal attribute; a level's rank is its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalScale {
    levels: Vec<ShineFactor>,
}

impl OrdinalScale {
    pub fn new(levels: Vec<ShineFactor>) -> Self {
        Self { levels }
    }

    pub fn rank(&self, value: ShineFactor) -> Option<usize> {
        self.levels.iter().position(|level| *level == value)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Largest possible rank distance, never below 1
    pub fn max_distance(&self) -> usize {
        self.levels.len().saturating_sub(1).max(1)
    }
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::new(ShineFactor::ALL.to_vec())
    }
}

/// How an attribute is scored
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeRule {
    /// Exponential decay outside the preferred range
    Range { tolerance: f64, domain: NumericDomain },
    /// Linear decay by step distance on the scale
    Ordinal { scale: OrdinalScale },
    /// Exact match only
    Boolean,
}

impl AttributeRule {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeRule::Range { .. } => AttributeKind::Range,
            AttributeRule::Ordinal { .. } => AttributeKind::Ordinal,
            AttributeRule::Boolean => AttributeKind::Boolean,
        }
    }
}

/// Importance prior and scoring rule of one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub base_weight: f64,
    pub rule: AttributeRule,
}

impl AttributeDefinition {
    pub fn range(base_weight: f64, tolerance: f64, domain: NumericDomain) -> Self {
        Self {
            base_weight,
            rule: AttributeRule::Range { tolerance, domain },
        }
    }

    pub fn ordinal(base_weight: f64, scale: OrdinalScale) -> Self {
        Self {
            base_weight,
            rule: AttributeRule::Ordinal { scale },
        }
    }

    pub fn boolean(base_weight: f64) -> Self {
        Self {
            base_weight,
            rule: AttributeRule::Boolean,
        }
    }

    fn validate(&self, attribute: AttributeName) -> Result<(), TableError> {
        if !(self.base_weight.is_finite() && self.base_weight > 0.0) {
            return Err(TableError::InvalidBaseWeight {
                attribute,
                value: self.base_weight,
            });
        }
        let expected = attribute.kind();
        let found = self.rule.kind();
        if expected != found {
            return Err(TableError::RuleMismatch { attribute, expected, found });
        }
        match &self.rule {
            AttributeRule::Range { tolerance, domain } => {
                if !(tolerance.is_finite() && *tolerance > 0.0) {
                    return Err(TableError::InvalidTolerance {
                        attribute,
                        value: *tolerance,
                    });
                }
                if !(domain.min.is_finite() && domain.max.is_finite() && domain.min < domain.max) {
                    return Err(TableError::InvalidDomain {
                        attribute,
                        min: domain.min,
                        max: domain.max,
                    });
                }
            }
            AttributeRule::Ordinal { scale } => {
                if scale.is_empty() {
                    return Err(TableError::EmptyScale(attribute));
                }
            }
            AttributeRule::Boolean => {}
        }
        Ok(())
    }
}

/// Immutable scoring configuration: one definition per attribute plus global constants.
///
/// Built once at startup and shared read-only by every scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTables {
    definitions: [AttributeDefinition; AttributeName::COUNT],
    uncertainty_score: f64,
    boolean_multiplier: f64,
    max_amplification: f64,
}

impl Default for ScoringTables {
    fn default() -> Self {
        // Indexed by canonical attribute order
        Self {
            definitions: [
                AttributeDefinition::range(2.0, 2.0, NumericDomain::new(2.0, 14.0)),
                AttributeDefinition::range(2.0, 40.0, NumericDomain::new(50.0, 350.0)),
                AttributeDefinition::boolean(1.0),
                AttributeDefinition::boolean(0.5),
                AttributeDefinition::boolean(5.0),
                AttributeDefinition::ordinal(1.5, OrdinalScale::default()),
                AttributeDefinition::boolean(3.0),
            ],
            uncertainty_score: UNKNOWN_ATTRIBUTE_SCORE,
            boolean_multiplier: BOOLEAN_MULTIPLIER,
            max_amplification: MAX_AMPLIFICATION,
        }
    }
}

impl ScoringTables {
    pub fn definition(&self, attribute: AttributeName) -> &AttributeDefinition {
        &self.definitions[attribute.index()]
    }

    pub fn base_weight(&self, attribute: AttributeName) -> f64 {
        self.definition(attribute).base_weight
    }

    pub fn uncertainty_score(&self) -> f64 {
        self.uncertainty_score
    }

    pub fn boolean_multiplier(&self) -> f64 {
        self.boolean_multiplier
    }

    pub fn max_amplification(&self) -> f64 {
        self.max_amplification
    }

    /// Replace one attribute's definition after validating it
    pub fn with_definition(
        mut self,
        attribute: AttributeName,
        definition: AttributeDefinition,
    ) -> Result<Self, TableError> {
        definition.validate(attribute)?;
        self.definitions[attribute.index()] = definition;
        Ok(self)
    }

    pub fn with_uncertainty_score(mut self, score: f64) -> Result<Self, TableError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(TableError::InvalidParameter {
                name: "uncertainty_score",
                requirement: "within [0, 1]",
                value: score,
            });
        }
        self.uncertainty_score = score;
        Ok(self)
    }

    pub fn with_boolean_multiplier(mut self, multiplier: f64) -> Result<Self, TableError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(TableError::InvalidParameter {
                name: "boolean_multiplier",
                requirement: "positive and finite",
                value: multiplier,
            });
        }
        self.boolean_multiplier = multiplier;
        Ok(self)
    }

    pub fn with_max_amplification(mut self, amplification: f64) -> Result<Self, TableError> {
        if !(amplification.is_finite() && amplification >= 0.0) {
            return Err(TableError::InvalidParameter {
                name: "max_amplification",
                requirement: "non-negative and finite",
                value: amplification,
            });
        }
        self.max_amplification = amplification;
        Ok(self)
    }
}
