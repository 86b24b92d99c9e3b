use crate::core::{attribute::score_attribute, weights::declared_weight};
use crate::models::{AttributeScore, Attributes, MatchScoreResult, Preferences, ScoringTables};

/// Calculate how well a candidate's attributes satisfy a set of preferences
///
/// Every declared preference is scored in canonical attribute order, weighted
/// by its dynamic weight and folded into:
///
/// score     = round(Σ(score × weight) / Σ(weight) × 100)
/// raw_score = round(Σ(score) / count × 100)
///
/// A record with no declared preferences scores 100 on both: no opinion means
/// full satisfaction.
pub fn calculate_match_score(
    preferences: &Preferences,
    attributes: &Attributes,
    tables: &ScoringTables,
) -> MatchScoreResult {
    let mut breakdown = Vec::with_capacity(preferences.len());
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    let mut raw_sum = 0.0;
    let mut attribute_count = 0usize;

    for (attribute, preference) in preferences.iter() {
        let weight = declared_weight(tables.definition(attribute), preference, tables);
        let rule = score_attribute(attribute, preference, attributes.value(attribute), tables);

        total_weight += weight;
        weighted_sum += rule.score * weight;
        raw_sum += rule.score;
        attribute_count += 1;

        breakdown.push(AttributeScore {
            attribute,
            score: rule.score,
            weight,
            weighted_score: rule.score * weight,
            reason: rule.reason,
        });
    }

    let score = if total_weight == 0.0 {
        100
    } else {
        to_percent(weighted_sum / total_weight)
    };
    let raw_score = if attribute_count == 0 {
        100
    } else {
        to_percent(raw_sum / attribute_count as f64)
    };

    MatchScoreResult {
        score,
        raw_score,
        breakdown,
        total_weight,
    }
}

/// Round a unit-interval ratio to an integer percentage
#[inline]
pub(crate) fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeName, NumericRange, ShineFactor, ShinePreference};

    fn make_attrs() -> Attributes {
        Attributes {
            size: Some(7.0),
            weight: Some(180.0),
            has_stem: Some(true),
            has_leaf: Some(false),
            has_worm: Some(false),
            shine_factor: Some(ShineFactor::Shiny),
            has_chemicals: Some(false),
        }
    }

    #[test]
    fn test_no_preferences_scores_full() {
        let tables = ScoringTables::default();
        let result = calculate_match_score(&Preferences::new(), &make_attrs(), &tables);

        assert_eq!(result.score, 100);
        assert_eq!(result.raw_score, 100);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.total_weight, 0.0);
    }

    #[test]
    fn test_perfect_match_all_attributes() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new()
            .size(NumericRange::between(5.0, 10.0).unwrap())
            .weight(NumericRange::between(100.0, 200.0).unwrap())
            .has_stem(true)
            .has_leaf(false)
            .has_worm(false)
            .shine_factor(ShinePreference::one(ShineFactor::Shiny))
            .has_chemicals(false);

        let result = calculate_match_score(&prefs, &make_attrs(), &tables);

        assert_eq!(result.score, 100);
        assert_eq!(result.raw_score, 100);
        assert_eq!(result.breakdown.len(), 7);
        assert!(result.breakdown.iter().all(|entry| entry.score == 1.0));
    }

    #[test]
    fn test_worm_mismatch_scores_zero() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new().has_worm(false);
        let attrs = Attributes {
            has_worm: Some(true),
            ..make_attrs()
        };

        let result = calculate_match_score(&prefs, &attrs, &tables);

        assert_eq!(result.score, 0);
        assert_eq!(result.raw_score, 0);
        assert_eq!(result.breakdown[0].attribute, AttributeName::HasWorm);
        assert_eq!(result.breakdown[0].score, 0.0);
        assert!((result.total_weight - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_null_attributes_score_half() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new()
            .size(NumericRange::between(5.0, 10.0).unwrap())
            .has_worm(false)
            .shine_factor(ShinePreference::one(ShineFactor::Shiny));
        let attrs = Attributes {
            size: None,
            has_worm: None,
            shine_factor: None,
            ..make_attrs()
        };

        let result = calculate_match_score(&prefs, &attrs, &tables);
        assert_eq!(result.score, 50);
        assert_eq!(result.raw_score, 50);
    }

    #[test]
    fn test_breakdown_follows_canonical_order() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new()
            .has_chemicals(false)
            .shine_factor(ShinePreference::one(ShineFactor::Dull))
            .weight(NumericRange::at_least(100.0).unwrap())
            .has_stem(true);

        let result = calculate_match_score(&prefs, &make_attrs(), &tables);
        let order: Vec<AttributeName> = result.breakdown.iter().map(|b| b.attribute).collect();

        assert_eq!(
            order,
            vec![
                AttributeName::Weight,
                AttributeName::HasStem,
                AttributeName::ShineFactor,
                AttributeName::HasChemicals,
            ]
        );
    }

    #[test]
    fn test_weighted_and_raw_scores_diverge() {
        let tables = ScoringTables::default();
        // Worm mismatch (weight 6.0) against a leaf match (weight 0.6)
        let prefs = Preferences::new().has_worm(false).has_leaf(false);
        let attrs = Attributes {
            has_worm: Some(true),
            ..make_attrs()
        };

        let result = calculate_match_score(&prefs, &attrs, &tables);

        assert_eq!(result.raw_score, 50);
        assert_eq!(result.score, 9); // 0.6 / 6.6
    }

    #[test]
    fn test_narrow_miss_dominates_wide_hit() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new()
            .size(NumericRange::between(6.0, 7.0).unwrap())
            .shine_factor(ShinePreference::any_of(ShineFactor::ALL).unwrap());
        let attrs = Attributes {
            size: Some(14.0),
            ..make_attrs()
        };

        let result = calculate_match_score(&prefs, &attrs, &tables);
        assert!(result.score < 70, "got {}", result.score);
    }

    #[test]
    fn test_weighted_score_bounded_by_attribute_scores() {
        let tables = ScoringTables::default();
        let prefs = Preferences::new()
            .size(NumericRange::between(9.0, 10.0).unwrap())
            .weight(NumericRange::at_most(150.0).unwrap())
            .shine_factor(ShinePreference::one(ShineFactor::Dull))
            .has_stem(true);

        let result = calculate_match_score(&prefs, &make_attrs(), &tables);
        let lowest = result.breakdown.iter().map(|b| b.score).fold(f64::INFINITY, f64::min);
        let highest = result.breakdown.iter().map(|b| b.score).fold(f64::NEG_INFINITY, f64::max);

        assert!(result.score as f64 >= (lowest * 100.0).floor());
        assert!(result.score as f64 <= (highest * 100.0).ceil());
        for entry in &result.breakdown {
            assert!(entry.weight > 0.0);
            assert!((0.0..=1.0).contains(&entry.score));
            assert_eq!(entry.weighted_score, entry.score * entry.weight);
        }
    }
}
