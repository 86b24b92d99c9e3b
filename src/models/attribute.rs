use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the seven scored attributes.
///
/// Variants are declared in canonical scoring order, so the derived `Ord`
/// (and therefore any `BTreeMap` keyed by this type) iterates
/// size, weight, hasStem, hasLeaf, hasWorm, shineFactor, hasChemicals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeName {
    Size,
    Weight,
    HasStem,
    HasLeaf,
    HasWorm,
    ShineFactor,
    HasChemicals,
}

impl AttributeName {
    pub const COUNT: usize = 7;

    pub const ALL: [AttributeName; Self::COUNT] = [
        AttributeName::Size,
        AttributeName::Weight,
        AttributeName::HasStem,
        AttributeName::HasLeaf,
        AttributeName::HasWorm,
        AttributeName::ShineFactor,
        AttributeName::HasChemicals,
    ];

    pub const BOOLEANS: [AttributeName; 4] = [
        AttributeName::HasStem,
        AttributeName::HasLeaf,
        AttributeName::HasWorm,
        AttributeName::HasChemicals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::Size => "size",
            AttributeName::Weight => "weight",
            AttributeName::HasStem => "hasStem",
            AttributeName::HasLeaf => "hasLeaf",
            AttributeName::HasWorm => "hasWorm",
            AttributeName::ShineFactor => "shineFactor",
            AttributeName::HasChemicals => "hasChemicals",
        }
    }

    /// Which scoring rule family the attribute belongs to
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeName::Size | AttributeName::Weight => AttributeKind::Range,
            AttributeName::ShineFactor => AttributeKind::Ordinal,
            AttributeName::HasStem
            | AttributeName::HasLeaf
            | AttributeName::HasWorm
            | AttributeName::HasChemicals => AttributeKind::Boolean,
        }
    }

    /// Position in canonical order, used to index fixed-size tables
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Range,
    Ordinal,
    Boolean,
}

/// Four-step shine scale, dullest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShineFactor {
    Dull,
    Neutral,
    Shiny,
    ExtraShiny,
}

impl ShineFactor {
    pub const ALL: [ShineFactor; 4] = [
        ShineFactor::Dull,
        ShineFactor::Neutral,
        ShineFactor::Shiny,
        ShineFactor::ExtraShiny,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShineFactor::Dull => "dull",
            ShineFactor::Neutral => "neutral",
            ShineFactor::Shiny => "shiny",
            ShineFactor::ExtraShiny => "extraShiny",
        }
    }
}

impl fmt::Display for ShineFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single known attribute value, tagged by kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Flag(bool),
    Shine(ShineFactor),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_ord() {
        let mut sorted = AttributeName::ALL;
        sorted.sort();
        assert_eq!(sorted, AttributeName::ALL);

        for (i, name) in AttributeName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_attribute_names_serialize_camel_case() {
        assert_eq!(serde_json::to_string(&AttributeName::HasChemicals).unwrap(), "\"hasChemicals\"");
        assert_eq!(serde_json::to_string(&ShineFactor::ExtraShiny).unwrap(), "\"extraShiny\"");
        assert_eq!(AttributeName::ShineFactor.to_string(), "shineFactor");
    }

    #[test]
    fn test_attribute_kinds() {
        assert_eq!(AttributeName::Size.kind(), AttributeKind::Range);
        assert_eq!(AttributeName::ShineFactor.kind(), AttributeKind::Ordinal);
        for name in AttributeName::BOOLEANS {
            assert_eq!(name.kind(), AttributeKind::Boolean);
        }
    }
}
