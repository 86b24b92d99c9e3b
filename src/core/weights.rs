use crate::models::{
    AttributeDefinition, AttributeName, AttributeRule, NumericDomain, NumericRange, OrdinalScale,
    Preference, Preferences, ScoringTables, ShinePreference,
};

/// Importance weight of one attribute for a given preference record
///
/// Undeclared attributes keep their base weight. Declared numeric and ordinal
/// preferences are amplified by their selectivity,
/// `base × (1 + max_amplification × selectivity)`; declared booleans get the
/// fixed boolean multiplier.
pub fn dynamic_weight(
    attribute: AttributeName,
    preferences: &Preferences,
    tables: &ScoringTables,
) -> f64 {
    let definition = tables.definition(attribute);
    match preferences.get(attribute) {
        Some(preference) => declared_weight(definition, preference, tables),
        None => definition.base_weight,
    }
}

pub(crate) fn declared_weight(
    definition: &AttributeDefinition,
    preference: &Preference,
    tables: &ScoringTables,
) -> f64 {
    let base = definition.base_weight;
    match (&definition.rule, preference) {
        (AttributeRule::Range { domain, .. }, Preference::Range(range)) => {
            amplify(base, range_selectivity(range, domain), tables)
        }
        (AttributeRule::Ordinal { scale }, Preference::Ordinal(shine)) => {
            amplify(base, ordinal_selectivity(shine, scale), tables)
        }
        (AttributeRule::Boolean, Preference::Boolean(_)) => base * tables.boolean_multiplier(),
        _ => base,
    }
}

#[inline]
fn amplify(base: f64, selectivity: f64, tables: &ScoringTables) -> f64 {
    base * (1.0 + tables.max_amplification() * selectivity)
}

/// How much of the attribute's domain a range rules out, in [0, 1]
///
/// Missing bounds default to the domain bounds. A point range is fully
/// selective; a range covering the domain is not selective at all.
pub fn range_selectivity(range: &NumericRange, domain: &NumericDomain) -> f64 {
    let effective_min = range.min().unwrap_or(domain.min);
    let effective_max = range.max().unwrap_or(domain.max);
    let range_width = effective_max - effective_min;

    (1.0 - range_width / domain.width()).clamp(0.0, 1.0)
}

/// Share of scale levels a shine preference rules out, in [0, 1]
pub fn ordinal_selectivity(acceptable: &ShinePreference, scale: &OrdinalScale) -> f64 {
    if scale.is_empty() {
        return 0.0;
    }
    let accepted = acceptable
        .values()
        .iter()
        .filter(|value| scale.rank(**value).is_some())
        .count();

    (1.0 - accepted as f64 / scale.len() as f64).clamp(0.0, 1.0)
}
