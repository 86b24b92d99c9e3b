//! First-person descriptions a generated fruit gives of itself and of the
//! partner it is looking for. Phrases are picked at random so repeated
//! fruit do not all sound the same.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::{AttributeName, Attributes, FruitKind, Preference, Preferences, ShineFactor};

const ATTRIBUTE_INTROS: [&str; 5] = [
    "Let me tell you a bit about myself.",
    "Here's what you should know about me.",
    "Allow me to introduce myself.",
    "So, about me...",
    "Here's the rundown on yours truly.",
];

const PREFERENCE_INTROS: [&str; 5] = [
    "Now, here's what I'm looking for in a match.",
    "As for what I want in a partner...",
    "Here's my wish list for the perfect match.",
    "What am I looking for? Well...",
    "My ideal match would be...",
];

const CONNECTORS: [&str; 7] = ["Also,", "Plus,", "Oh, and", "On top of that,", "", "", ""];

const WANTS: [&str; 5] = [
    "I'd really like",
    "I'm hoping for",
    "I'd prefer",
    "I'm drawn to",
    "I'm looking for",
];

fn size_descriptor(size: f64) -> &'static [&'static str] {
    if size < 4.0 {
        &["quite petite", "delightfully tiny", "pocket-sized"]
    } else if size < 6.0 {
        &["fairly small", "modest in size", "pleasantly compact"]
    } else if size < 8.0 {
        &["average-sized", "right in the middle size-wise", "neither big nor small"]
    } else if size < 10.0 {
        &["on the larger side", "fairly big", "generously proportioned"]
    } else {
        &["impressively big", "substantial in size", "rather hefty"]
    }
}

fn weight_descriptor(weight: f64) -> &'static [&'static str] {
    if weight < 120.0 {
        &["lightweight", "pleasantly light", "easy to carry"]
    } else if weight < 220.0 {
        &["average weight", "neither light nor heavy", "pretty standard weight"]
    } else {
        &["on the heavier side", "nice and hefty", "solidly weighted"]
    }
}

fn shine_descriptor(shine: ShineFactor) -> &'static [&'static str] {
    match shine {
        ShineFactor::Dull => &["I've got a matte finish", "my surface is pretty low-key"],
        ShineFactor::Neutral => &["I have a nice balanced sheen", "my look is pretty standard"],
        ShineFactor::Shiny => &["my skin really catches the light", "I have a nice glossy appearance"],
        ShineFactor::ExtraShiny => &["I absolutely gleam", "I'm basically sparkling over here"],
    }
}

fn shine_label(shine: ShineFactor) -> &'static str {
    match shine {
        ShineFactor::Dull => "matte",
        ShineFactor::Neutral => "naturally finished",
        ShineFactor::Shiny => "shiny",
        ShineFactor::ExtraShiny => "extra shiny",
    }
}

fn flag_phrase(attribute: AttributeName, value: bool) -> &'static [&'static str] {
    match (attribute, value) {
        (AttributeName::HasStem, true) => &["my stem is intact", "yes, I come with a stem"],
        (AttributeName::HasStem, false) => &["I don't have a stem", "stemless, that's me"],
        (AttributeName::HasLeaf, true) => &["I've got a lovely leaf", "I'm rocking a leaf"],
        (AttributeName::HasLeaf, false) => &["no leaf on me", "I'm leafless"],
        (AttributeName::HasWorm, true) => &["I'll be honest... there's a worm situation", "I'm hosting a little worm"],
        (AttributeName::HasWorm, false) => &["completely worm-free", "no worms here"],
        (_, true) => &["I've been treated with some chemicals", "I'm not organic, if that matters"],
        (_, false) => &["I'm chemical-free", "all natural, no chemicals"],
    }
}

fn phrase<R: Rng + ?Sized>(rng: &mut R, choices: &[&'static str]) -> &'static str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn connected<R: Rng + ?Sized>(rng: &mut R, text: &str) -> String {
    format!("{} {}.", phrase(rng, &CONNECTORS), text).trim().to_string()
}

/// Self-description of a fruit's attributes
pub fn describe_attributes<R: Rng + ?Sized>(rng: &mut R, kind: FruitKind, attributes: &Attributes) -> String {
    let mut parts = vec![
        phrase(rng, &ATTRIBUTE_INTROS).to_string(),
        format!("I'm an {}, by the way.", kind),
    ];

    match attributes.size {
        Some(size) => {
            let descriptor = phrase(rng, size_descriptor(size));
            parts.push(format!("I'm {} - about {} units if you want to get technical.", descriptor, size));
        }
        None => parts.push("My size? That's a bit of a mystery even to me.".to_string()),
    }

    if let Some(weight) = attributes.weight {
        let descriptor = phrase(rng, weight_descriptor(weight));
        parts.push(connected(rng, &format!("at {} grams, I'm {}", weight, descriptor)));
    }

    if let Some(shine) = attributes.shine_factor {
        let descriptor = phrase(rng, shine_descriptor(shine));
        parts.push(connected(rng, descriptor));
    }

    if let Some(stem) = attributes.has_stem {
        let text = phrase(rng, flag_phrase(AttributeName::HasStem, stem));
        parts.push(connected(rng, text));
    }

    // Missing leaves and worms are only mentioned some of the time
    if let Some(leaf) = attributes.has_leaf {
        if leaf || rng.random_bool(0.5) {
            let text = phrase(rng, flag_phrase(AttributeName::HasLeaf, leaf));
            parts.push(connected(rng, text));
        }
    }

    if let Some(worm) = attributes.has_worm {
        if worm || rng.random_bool(0.4) {
            let text = phrase(rng, flag_phrase(AttributeName::HasWorm, worm));
            parts.push(connected(rng, text));
        }
    }

    if let Some(chemicals) = attributes.has_chemicals {
        let text = phrase(rng, flag_phrase(AttributeName::HasChemicals, chemicals));
        parts.push(connected(rng, text));
    }

    parts.join(" ")
}

/// Description of what a fruit looks for in a partner
pub fn describe_preferences<R: Rng + ?Sized>(rng: &mut R, kind: FruitKind, preferences: &Preferences) -> String {
    let other = kind.opposite();

    if preferences.is_empty() {
        return phrase(
            rng,
            &[
                "Honestly? I'm pretty open-minded. No strict requirements here.",
                "I'm easy-going when it comes to preferences. Surprise me!",
                "No particular preferences here - I like to keep my options open.",
            ],
        )
        .to_string();
    }

    let mut parts = vec![phrase(rng, &PREFERENCE_INTROS).to_string()];

    for (attribute, preference) in preferences.iter() {
        let want = phrase(rng, &WANTS);
        let text = match preference {
            Preference::Range(range) => {
                let unit = if attribute == AttributeName::Weight { "g" } else { "" };
                match (range.min(), range.max()) {
                    (Some(min), Some(max)) => format!(
                        "{} an {} with {} between {}{} and {}{}.",
                        want, other, attribute, min, unit, max, unit
                    ),
                    (Some(min), None) => {
                        format!("{} an {} with {} of at least {}{}.", want, other, attribute, min, unit)
                    }
                    (None, Some(max)) => {
                        format!("{} an {} with {} of at most {}{}.", want, other, attribute, max, unit)
                    }
                    (None, None) => continue,
                }
            }
            Preference::Ordinal(shine) => {
                let labels: Vec<&str> = shine.values().iter().map(|s| shine_label(*s)).collect();
                format!("{} an {} that's {}.", want, other, labels.join(" or "))
            }
            Preference::Boolean(desired) => match (attribute, *desired) {
                (AttributeName::HasWorm, false) => "And please, no worms. That's a dealbreaker.".to_string(),
                (AttributeName::HasWorm, true) => "Surprisingly, I don't mind a worm. It adds character.".to_string(),
                (AttributeName::HasStem, true) => format!("{} an {} with a stem still attached.", want, other),
                (AttributeName::HasStem, false) => format!("{} an {} without a stem.", want, other),
                (AttributeName::HasLeaf, true) => format!("{} an {} with a leaf.", want, other),
                (AttributeName::HasLeaf, false) => "No leaf needed.".to_string(),
                (AttributeName::HasChemicals, true) => "Chemical treatment doesn't bother me.".to_string(),
                _ => format!("{} an all-natural {}.", want, other),
            },
        };
        parts.push(text);
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumericRange, ShinePreference};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_attribute_description_mentions_kind_and_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let attrs = Attributes {
            size: Some(7.5),
            has_worm: Some(true),
            ..Attributes::default()
        };

        let text = describe_attributes(&mut rng, FruitKind::Orange, &attrs);
        assert!(text.contains("I'm an orange"));
        assert!(text.contains("7.5 units"));
        assert!(text.to_lowercase().contains("worm"));
    }

    #[test]
    fn test_phrase_draws_from_choices() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!(WANTS.contains(&phrase(&mut rng, &WANTS)));
        assert_eq!(phrase(&mut rng, &[]), "");
    }

    #[test]
    fn test_unknown_size_is_admitted() {
        let mut rng = StdRng::seed_from_u64(2);
        let text = describe_attributes(&mut rng, FruitKind::Apple, &Attributes::default());
        assert!(text.contains("mystery"));
    }

    #[test]
    fn test_open_minded_without_preferences() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = describe_preferences(&mut rng, FruitKind::Apple, &Preferences::new());
        assert!(!text.contains("looking for in a match"));
        assert!(!text.is_empty());
    }

    #[test]
    fn test_preference_description_covers_each_declaration() {
        let mut rng = StdRng::seed_from_u64(4);
        let prefs = Preferences::new()
            .weight(NumericRange::between(150.0, 200.0).unwrap())
            .has_worm(false)
            .shine_factor(ShinePreference::any_of([ShineFactor::Shiny, ShineFactor::Dull]).unwrap());

        let text = describe_preferences(&mut rng, FruitKind::Apple, &prefs);
        assert!(text.contains("between 150g and 200g"));
        assert!(text.contains("no worms"));
        assert!(text.contains("shiny or matte") || text.contains("matte or shiny"));
        assert!(text.contains("orange"));
    }
}
