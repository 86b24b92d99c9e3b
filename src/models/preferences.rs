use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::attribute::{AttributeKind, AttributeName, ShineFactor};

/// Errors raised while building preferences from untrusted input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreferenceError {
    #[error("Range bounds must be finite numbers")]
    NonFinite,

    #[error("Inverted range: min {min} is greater than max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("Shine preference needs at least one acceptable value")]
    EmptyChoice,

    #[error("{attribute} takes a {expected:?} preference, got {found:?}")]
    KindMismatch {
        attribute: AttributeName,
        expected: AttributeKind,
        found: AttributeKind,
    },
}

/// Numeric preference with optional, inclusive bounds.
///
/// Construction rejects non-finite bounds and `min > max`, so every value of
/// this type describes a non-empty interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct NumericRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeBounds {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
}

impl TryFrom<RangeBounds> for NumericRange {
    type Error = PreferenceError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        NumericRange::new(bounds.min, bounds.max)
    }
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, PreferenceError> {
        if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
            return Err(PreferenceError::NonFinite);
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(PreferenceError::InvertedRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub fn between(min: f64, max: f64) -> Result<Self, PreferenceError> {
        Self::new(Some(min), Some(max))
    }

    pub fn at_least(min: f64) -> Result<Self, PreferenceError> {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Result<Self, PreferenceError> {
        Self::new(None, Some(max))
    }

    /// Range with neither bound, which accepts every value
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

/// Non-empty set of acceptable shine values, without duplicates.
///
/// Serializes as a bare string when it holds one value and as an array otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShineChoice", into = "ShineChoice")]
pub struct ShinePreference {
    values: Vec<ShineFactor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ShineChoice {
    One(ShineFactor),
    Many(Vec<ShineFactor>),
}

impl TryFrom<ShineChoice> for ShinePreference {
    type Error = PreferenceError;

    fn try_from(choice: ShineChoice) -> Result<Self, Self::Error> {
        match choice {
            ShineChoice::One(value) => Ok(ShinePreference::one(value)),
            ShineChoice::Many(values) => ShinePreference::any_of(values),
        }
    }
}

impl From<ShinePreference> for ShineChoice {
    fn from(preference: ShinePreference) -> Self {
        match preference.values.as_slice() {
            [single] => ShineChoice::One(*single),
            _ => ShineChoice::Many(preference.values),
        }
    }
}

impl ShinePreference {
    pub fn one(value: ShineFactor) -> Self {
        Self { values: vec![value] }
    }

    /// Build from any collection of values; duplicates are dropped, first occurrence wins
    pub fn any_of<I>(values: I) -> Result<Self, PreferenceError>
    where
        I: IntoIterator<Item = ShineFactor>,
    {
        let mut distinct: Vec<ShineFactor> = Vec::new();
        for value in values {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        if distinct.is_empty() {
            return Err(PreferenceError::EmptyChoice);
        }
        Ok(Self { values: distinct })
    }

    pub fn values(&self) -> &[ShineFactor] {
        &self.values
    }

    pub fn contains(&self, value: ShineFactor) -> bool {
        self.values.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One declared preference, tagged by the rule family it is scored with
#[derive(Debug, Clone, PartialEq)]
pub enum Preference {
    Range(NumericRange),
    Ordinal(ShinePreference),
    Boolean(bool),
}

impl Preference {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Preference::Range(_) => AttributeKind::Range,
            Preference::Ordinal(_) => AttributeKind::Ordinal,
            Preference::Boolean(_) => AttributeKind::Boolean,
        }
    }
}

/// Sparse preference record.
///
/// Only declared preferences are stored; iteration follows canonical attribute order.
/// On the wire this is the flat object used by the generator and the frontend, e.g.
/// `{"size": {"min": 6, "max": 7}, "hasWorm": false, "shineFactor": ["shiny", "dull"]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PreferencesWire", into = "PreferencesWire")]
pub struct Preferences {
    entries: BTreeMap<AttributeName, Preference>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PreferencesWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_stem: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_leaf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_worm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shine_factor: Option<ShinePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    has_chemicals: Option<bool>,
}

impl From<PreferencesWire> for Preferences {
    fn from(wire: PreferencesWire) -> Self {
        let mut preferences = Preferences::new();
        if let Some(range) = wire.size {
            preferences = preferences.size(range);
        }
        if let Some(range) = wire.weight {
            preferences = preferences.weight(range);
        }
        if let Some(desired) = wire.has_stem {
            preferences = preferences.has_stem(desired);
        }
        if let Some(desired) = wire.has_leaf {
            preferences = preferences.has_leaf(desired);
        }
        if let Some(desired) = wire.has_worm {
            preferences = preferences.has_worm(desired);
        }
        if let Some(shine) = wire.shine_factor {
            preferences = preferences.shine_factor(shine);
        }
        if let Some(desired) = wire.has_chemicals {
            preferences = preferences.has_chemicals(desired);
        }
        preferences
    }
}

impl From<Preferences> for PreferencesWire {
    fn from(preferences: Preferences) -> Self {
        let mut wire = PreferencesWire::default();
        for (attribute, preference) in preferences.entries {
            match (attribute, preference) {
                (AttributeName::Size, Preference::Range(r)) => wire.size = Some(r),
                (AttributeName::Weight, Preference::Range(r)) => wire.weight = Some(r),
                (AttributeName::HasStem, Preference::Boolean(b)) => wire.has_stem = Some(b),
                (AttributeName::HasLeaf, Preference::Boolean(b)) => wire.has_leaf = Some(b),
                (AttributeName::HasWorm, Preference::Boolean(b)) => wire.has_worm = Some(b),
                (AttributeName::ShineFactor, Preference::Ordinal(s)) => wire.shine_factor = Some(s),
                (AttributeName::HasChemicals, Preference::Boolean(b)) => wire.has_chemicals = Some(b),
                // insert() keeps kinds aligned with attribute names
                _ => {}
            }
        }
        wire
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a preference, rejecting one whose kind does not fit the attribute.
    ///
    /// Returns the preference previously declared for the attribute, if any.
    pub fn insert(
        &mut self,
        attribute: AttributeName,
        preference: Preference,
    ) -> Result<Option<Preference>, PreferenceError> {
        let expected = attribute.kind();
        let found = preference.kind();
        if expected != found {
            return Err(PreferenceError::KindMismatch { attribute, expected, found });
        }
        Ok(self.entries.insert(attribute, preference))
    }

    pub fn remove(&mut self, attribute: AttributeName) -> Option<Preference> {
        self.entries.remove(&attribute)
    }

    pub fn size(self, range: NumericRange) -> Self {
        self.with_entry(AttributeName::Size, Preference::Range(range))
    }

    pub fn weight(self, range: NumericRange) -> Self {
        self.with_entry(AttributeName::Weight, Preference::Range(range))
    }

    pub fn has_stem(self, desired: bool) -> Self {
        self.with_entry(AttributeName::HasStem, Preference::Boolean(desired))
    }

    pub fn has_leaf(self, desired: bool) -> Self {
        self.with_entry(AttributeName::HasLeaf, Preference::Boolean(desired))
    }

    pub fn has_worm(self, desired: bool) -> Self {
        self.with_entry(AttributeName::HasWorm, Preference::Boolean(desired))
    }

    pub fn shine_factor(self, shine: ShinePreference) -> Self {
        self.with_entry(AttributeName::ShineFactor, Preference::Ordinal(shine))
    }

    pub fn has_chemicals(self, desired: bool) -> Self {
        self.with_entry(AttributeName::HasChemicals, Preference::Boolean(desired))
    }

    // Callers are the typed setters above, which pair names with matching kinds.
    fn with_entry(mut self, attribute: AttributeName, preference: Preference) -> Self {
        self.entries.insert(attribute, preference);
        self
    }

    pub fn get(&self, attribute: AttributeName) -> Option<&Preference> {
        self.entries.get(&attribute)
    }

    pub fn contains(&self, attribute: AttributeName) -> bool {
        self.entries.contains_key(&attribute)
    }

    /// Declared preferences in canonical attribute order
    pub fn iter(&self) -> impl Iterator<Item = (AttributeName, &Preference)> {
        self.entries.iter().map(|(name, preference)| (*name, preference))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
