use serde::{Deserialize, Serialize};

use super::ImageSetError;

/// Serializable facts about one staged image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub id: String,
    pub original_filename: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub is_primary: bool,
    pub order: u32,
}

/// A change to one of the mutable descriptor fields.
///
/// `id` and `original_filename` are fixed at add time and have no variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataUpdate {
    Caption(String),
    Order(u32),
}

impl MetadataUpdate {
    /// Build an update from a field name and an untyped JSON value, as sent by
    /// form clients.
    pub fn from_field(field: &str, value: serde_json::Value) -> Result<Self, ImageSetError> {
        match field {
            "caption" => match value {
                serde_json::Value::String(s) => Ok(MetadataUpdate::Caption(s)),
                serde_json::Value::Null => Ok(MetadataUpdate::Caption(String::new())),
                other => Err(ImageSetError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected a string, got {other}"),
                }),
            },
            "order" => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(MetadataUpdate::Order)
                .ok_or_else(|| ImageSetError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected a non-negative integer, got {value}"),
                }),
            other => Err(ImageSetError::InvalidField(other.to_string())),
        }
    }
}

/// What happens to the primary flag when the primary image is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryPolicy {
    /// Leave the set without a primary image until one is chosen explicitly.
    #[default]
    Leave,
    /// Make the image now at position 0 primary.
    PromoteFirst,
}

impl PrimaryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "leave" => Some(PrimaryPolicy::Leave),
            "promote_first" | "promote-first" => Some(PrimaryPolicy::PromoteFirst),
            _ => None,
        }
    }
}
