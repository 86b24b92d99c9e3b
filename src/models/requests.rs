use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{Attributes, FruitKind};
use crate::models::preferences::Preferences;

/// Request to store a fruit
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFruitRequest {
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Request to rank an unsaved fruit against the stored pool
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FindMatchesRequest {
    pub kind: FruitKind,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub preferences: Preferences,
    #[validate(range(min = 1))]
    pub limit: Option<u8>,
}

/// Optional body of the incoming-fruit endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncomingFruitRequest {
    #[validate(range(min = 1))]
    pub limit: Option<u8>,
}
