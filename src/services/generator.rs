use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::models::{
    Attributes, FruitKind, NumericRange, Preferences, ShineFactor, ShinePreference,
};
use crate::services::narration::{describe_attributes, describe_preferences};

const SIZE_MEAN: f64 = 7.0;
const SIZE_STD_DEV: f64 = 2.0;
const SIZE_MIN: f64 = 2.0;
const SIZE_MAX: f64 = 14.0;

const WEIGHT_MEAN: f64 = 180.0;
const WEIGHT_STD_DEV: f64 = 50.0;
const WEIGHT_MIN: f64 = 50.0;
const WEIGHT_MAX: f64 = 350.0;

/// Chance that any single attribute is generated as unknown
const NULL_PROBABILITY: f64 = 0.05;

/// Neutral and shiny fruit are the most common
const SHINE_BAG: [ShineFactor; 7] = [
    ShineFactor::Dull,
    ShineFactor::Neutral,
    ShineFactor::Neutral,
    ShineFactor::Shiny,
    ShineFactor::Shiny,
    ShineFactor::Shiny,
    ShineFactor::ExtraShiny,
];

/// How a fruit introduces itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Communication {
    pub attributes: String,
    pub preferences: String,
}

/// A freshly generated fruit, not yet stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFruit {
    pub kind: FruitKind,
    pub attributes: Attributes,
    pub preferences: Preferences,
    pub communication: Communication,
}

/// Which bounds a generated range preference carries
#[derive(Debug, Clone, Copy)]
enum RangeShape {
    Both,
    MinOnly,
    MaxOnly,
}

const RANGE_SHAPES: [RangeShape; 3] = [RangeShape::Both, RangeShape::MinOnly, RangeShape::MaxOnly];

/// Sample from N(mean, std_dev); a non-finite deviation yields the mean
fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    match Normal::new(mean, std_dev) {
        Ok(distribution) => distribution.sample(rng),
        Err(_) => mean,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Normal sample clamped into `[min, max]`, rounded to one decimal
fn normal_clamped<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64, min: f64, max: f64) -> f64 {
    round_to(normal(rng, mean, std_dev).clamp(min, max), 1)
}

fn maybe<T, R: Rng + ?Sized>(rng: &mut R, value: impl FnOnce(&mut R) -> T) -> Option<T> {
    if rng.random_bool(NULL_PROBABILITY) {
        None
    } else {
        Some(value(rng))
    }
}

/// Random attributes for a fruit of the given kind
pub fn generate_attributes<R: Rng + ?Sized>(rng: &mut R, kind: FruitKind) -> Attributes {
    // Apples run slightly smaller and lighter
    let (size_mean, weight_mean) = match kind {
        FruitKind::Apple => (SIZE_MEAN - 0.5, WEIGHT_MEAN - 10.0),
        FruitKind::Orange => (SIZE_MEAN + 0.5, WEIGHT_MEAN + 10.0),
    };
    let stem_probability = match kind {
        FruitKind::Apple => 0.7,
        FruitKind::Orange => 0.1,
    };

    Attributes {
        size: maybe(rng, |r| normal_clamped(r, size_mean, SIZE_STD_DEV, SIZE_MIN, SIZE_MAX)),
        weight: maybe(rng, |r| {
            normal_clamped(r, weight_mean, WEIGHT_STD_DEV, WEIGHT_MIN, WEIGHT_MAX)
        }),
        has_stem: maybe(rng, |r| r.random_bool(stem_probability)),
        has_leaf: maybe(rng, |r| r.random_bool(0.25)),
        has_worm: maybe(rng, |r| r.random_bool(0.08)),
        shine_factor: maybe(rng, |r| SHINE_BAG.choose(r).copied()).flatten(),
        has_chemicals: maybe(rng, |r| r.random_bool(0.35)),
    }
}

/// A range around `center`, both bounds kept inside the attribute's domain
fn range_around<R: Rng + ?Sized>(
    rng: &mut R,
    center: f64,
    margin: f64,
    domain: (f64, f64),
    decimals: i32,
) -> Option<NumericRange> {
    let (domain_min, domain_max) = domain;
    let min = round_to((center - margin).clamp(domain_min, domain_max), decimals);
    let max = round_to((center + margin).clamp(domain_min, domain_max), decimals);

    let range = match RANGE_SHAPES.choose(rng)? {
        RangeShape::Both => NumericRange::between(min, max),
        RangeShape::MinOnly => NumericRange::at_least(min),
        RangeShape::MaxOnly => NumericRange::at_most(max),
    };
    range.ok()
}

/// Relaxed preferences: most attributes are left open and ranges are generous
pub fn generate_preferences<R: Rng + ?Sized>(rng: &mut R, attributes: &Attributes) -> Preferences {
    let mut preferences = Preferences::new();

    if rng.random_bool(0.4) {
        if let Some(size) = attributes.size {
            let margin = normal_clamped(rng, 2.5, 1.0, 1.5, 5.0);
            let center = size + normal(rng, 0.0, 1.0);
            if let Some(range) = range_around(rng, center, margin, (SIZE_MIN, SIZE_MAX), 1) {
                preferences = preferences.size(range);
            }
        }
    }

    if rng.random_bool(0.35) {
        if let Some(weight) = attributes.weight {
            let margin = normal_clamped(rng, 40.0, 15.0, 20.0, 80.0);
            let center = weight + normal(rng, 0.0, 20.0);
            if let Some(range) = range_around(rng, center, margin, (WEIGHT_MIN, WEIGHT_MAX), 0) {
                preferences = preferences.weight(range);
            }
        }
    }

    if rng.random_bool(0.25) {
        preferences = preferences.has_stem(rng.random_bool(0.6));
    }

    if rng.random_bool(0.2) {
        preferences = preferences.has_leaf(rng.random_bool(0.5));
    }

    if rng.random_bool(0.6) {
        preferences = preferences.has_worm(false);
    }

    if rng.random_bool(0.45) {
        let acceptable = [1usize, 2, 2, 3].choose(rng).copied().unwrap_or(1);
        let shine = if acceptable == 1 {
            ShineFactor::ALL.choose(rng).copied().map(ShinePreference::one)
        } else {
            let mut levels = ShineFactor::ALL;
            levels.shuffle(rng);
            ShinePreference::any_of(levels.into_iter().take(acceptable)).ok()
        };
        if let Some(shine) = shine {
            preferences = preferences.shine_factor(shine);
        }
    }

    if rng.random_bool(0.4) {
        // Most fruit that care want no chemicals
        preferences = preferences.has_chemicals(rng.random_bool(0.2));
    }

    preferences
}

/// Generate a complete fruit using the supplied random source
pub fn generate_fruit_with<R: Rng + ?Sized>(rng: &mut R, kind: FruitKind) -> GeneratedFruit {
    let attributes = generate_attributes(rng, kind);
    let preferences = generate_preferences(rng, &attributes);
    let communication = Communication {
        attributes: describe_attributes(rng, kind, &attributes),
        preferences: describe_preferences(rng, kind, &preferences),
    };

    GeneratedFruit {
        kind,
        attributes,
        preferences,
        communication,
    }
}

/// Generate a complete fruit from the thread-local generator
pub fn generate_fruit(kind: FruitKind) -> GeneratedFruit {
    generate_fruit_with(&mut rand::rng(), kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeName, Preference};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_attributes_stay_in_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let attrs = generate_attributes(&mut rng, FruitKind::Orange);
            if let Some(size) = attrs.size {
                assert!((SIZE_MIN..=SIZE_MAX).contains(&size));
                assert_eq!(size, round_to(size, 1));
            }
            if let Some(weight) = attrs.weight {
                assert!((WEIGHT_MIN..=WEIGHT_MAX).contains(&weight));
            }
        }
    }

    #[test]
    fn test_apples_keep_stems_more_often() {
        let mut rng = StdRng::seed_from_u64(11);
        let stems = |kind, rng: &mut StdRng| {
            (0..1000)
                .filter(|_| generate_attributes(rng, kind).has_stem == Some(true))
                .count()
        };

        let apple_stems = stems(FruitKind::Apple, &mut rng);
        let orange_stems = stems(FruitKind::Orange, &mut rng);
        assert!(apple_stems > orange_stems * 3, "{} vs {}", apple_stems, orange_stems);
    }

    #[test]
    fn test_generated_preferences_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..500 {
            let fruit = generate_fruit_with(&mut rng, FruitKind::Apple);

            if let Some(Preference::Range(range)) = fruit.preferences.get(AttributeName::Size) {
                assert!(range.min().is_some() || range.max().is_some());
                if let (Some(min), Some(max)) = (range.min(), range.max()) {
                    assert!(min <= max);
                }
            }
            if let Some(Preference::Ordinal(shine)) = fruit.preferences.get(AttributeName::ShineFactor) {
                assert!((1..=3).contains(&shine.len()));
            }
            if let Some(Preference::Boolean(wants_worm)) = fruit.preferences.get(AttributeName::HasWorm) {
                assert!(!wants_worm);
            }
            assert!(!fruit.communication.attributes.is_empty());
            assert!(!fruit.communication.preferences.is_empty());
        }
    }

    #[test]
    fn test_no_range_preference_for_unknown_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let attrs = Attributes::default();
        for _ in 0..200 {
            let prefs = generate_preferences(&mut rng, &attrs);
            assert!(!prefs.contains(AttributeName::Size));
            assert!(!prefs.contains(AttributeName::Weight));
        }
    }

    #[test]
    fn test_degenerate_deviation_returns_mean() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(normal(&mut rng, 4.0, f64::NAN), 4.0);
    }

    #[test]
    fn test_normal_sample_is_centered() {
        let mut rng = StdRng::seed_from_u64(99);
        let samples = 5000;
        let mean = (0..samples).map(|_| normal(&mut rng, 10.0, 2.0)).sum::<f64>() / samples as f64;
        assert!((mean - 10.0).abs() < 0.2, "mean was {}", mean);
    }
}
