use crate::models::{
    AttributeName, AttributeRule, AttributeValue, OrdinalScale, Preference, ScoringTables,
    ShineFactor, ShinePreference,
};

/// Unit-interval score of one attribute with a human-readable reason
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScore {
    pub score: f64,
    pub reason: String,
}

impl RuleScore {
    fn new(score: f64, reason: String) -> Self {
        Self { score, reason }
    }
}

fn bound_label(bound: Option<f64>) -> String {
    bound.map_or_else(|| "any".to_string(), |v| v.to_string())
}

/// Score a numeric value against optional inclusive bounds
///
/// Inside the range the score is 1.0; outside it decays as
/// `e^(-distance / tolerance)`, where distance is measured from the nearest
/// violated bound. The score never reaches 0.
#[inline]
pub fn range_score(value: f64, min: Option<f64>, max: Option<f64>, tolerance: f64) -> RuleScore {
    if min.is_none() && max.is_none() {
        return RuleScore::new(1.0, format!("Value {} (no range specified)", value));
    }

    let effective_min = min.unwrap_or(f64::NEG_INFINITY);
    let effective_max = max.unwrap_or(f64::INFINITY);

    if value >= effective_min && value <= effective_max {
        return RuleScore::new(
            1.0,
            format!(
                "Value {} within range [{}-{}]",
                value,
                bound_label(min),
                bound_label(max)
            ),
        );
    }

    let distance = if value < effective_min {
        effective_min - value
    } else {
        value - effective_max
    };
    let score = (-distance / tolerance).exp();

    RuleScore::new(
        score,
        format!(
            "Value {} outside range [{}-{}] ({}% match)",
            value,
            bound_label(min),
            bound_label(max),
            (score * 100.0).round()
        ),
    )
}

/// Score an ordinal value by its step distance to the nearest acceptable level
///
/// `1 - distance / (levels - 1)`. A value missing from the scale, or a
/// preference with no level on the scale, gets the uncertainty score.
pub fn ordinal_score(
    actual: ShineFactor,
    acceptable: &ShinePreference,
    scale: &OrdinalScale,
    uncertainty: f64,
) -> RuleScore {
    let Some(actual_rank) = scale.rank(actual) else {
        return RuleScore::new(uncertainty, format!("Unknown shine value \"{}\"", actual));
    };

    if acceptable.contains(actual) {
        return RuleScore::new(1.0, format!("Shine \"{}\" matches preference", actual));
    }

    let min_distance = acceptable
        .values()
        .iter()
        .filter_map(|value| scale.rank(*value))
        .map(|rank| rank.abs_diff(actual_rank))
        .min();

    let Some(min_distance) = min_distance else {
        return RuleScore::new(
            uncertainty,
            format!("No preferred shine is on the scale for \"{}\"", actual),
        );
    };

    let score = 1.0 - (min_distance as f64 / scale.max_distance() as f64);

    RuleScore::new(
        score,
        format!(
            "Shine \"{}\" is {} step(s) from preferred ({}% match)",
            actual,
            min_distance,
            (score * 100.0).round()
        ),
    )
}

/// Exact match only, no partial credit
#[inline]
pub fn boolean_score(actual: bool, desired: bool) -> RuleScore {
    if actual == desired {
        RuleScore::new(1.0, format!("Value {} matches preference", actual))
    } else {
        RuleScore::new(
            0.0,
            format!("Value {} doesn't match preference (wanted {})", actual, desired),
        )
    }
}

/// Score one declared preference against the candidate's value for it.
///
/// Dispatches on the attribute's rule once. An unknown value scores the
/// uncertainty score whatever the rule.
pub fn score_attribute(
    attribute: AttributeName,
    preference: &Preference,
    value: Option<AttributeValue>,
    tables: &ScoringTables,
) -> RuleScore {
    let uncertainty = tables.uncertainty_score();

    let Some(value) = value else {
        return RuleScore::new(
            uncertainty,
            format!(
                "{} unknown ({}% uncertainty score)",
                attribute,
                (uncertainty * 100.0).round()
            ),
        );
    };

    match (&tables.definition(attribute).rule, preference, value) {
        (AttributeRule::Range { tolerance, .. }, Preference::Range(range), AttributeValue::Number(v)) => {
            range_score(v, range.min(), range.max(), *tolerance)
        }
        (AttributeRule::Ordinal { scale }, Preference::Ordinal(shine), AttributeValue::Shine(v)) => {
            ordinal_score(v, shine, scale, uncertainty)
        }
        (AttributeRule::Boolean, Preference::Boolean(desired), AttributeValue::Flag(v)) => {
            let scored = boolean_score(v, *desired);
            RuleScore::new(scored.score, format!("{}: {}", attribute, scored.reason))
        }
        // Preferences and tables both pin kinds to attribute names, so this
        // only triggers for hand-built values that bypass those checks.
        _ => RuleScore::new(
            uncertainty,
            format!("{} preference does not fit its scoring rule", attribute),
        ),
    }
}
