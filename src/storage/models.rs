use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::images::ImageDescriptor;
use crate::units::{PropertyKind, UnitsList};

/// Three-state patch value for partial updates.
/// Unlike `Option<Option<T>>`, each variant has a distinct wire representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Patch<T> {
    /// Field was not included in the request (no change).
    #[default]
    Absent,
    /// Field was explicitly set to null (clear it).
    Null,
    /// Field was set to a new value.
    Value(T),
}

impl<T> From<Option<Option<T>>> for Patch<T> {
    fn from(v: Option<Option<T>>) -> Self {
        match v {
            None => Patch::Absent,
            Some(None) => Patch::Null,
            Some(Some(v)) => Patch::Value(v),
        }
    }
}

impl<T> Patch<T> {
    /// Write the patch into an optional field.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

/// A listing draft as stored in redb.
///
/// `images` is the serializable half of the draft's image set. File bytes
/// never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub property_kind: PropertyKind,
    #[serde(default)]
    pub address: Option<String>,
    /// Two-letter US state code.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Listing id assigned by the backend after the first successful submit.
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
    pub units: UnitsList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Partial update of a draft's listing fields.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub address: Patch<String>,
    pub state: Patch<String>,
    pub latitude: Patch<f64>,
    pub longitude: Patch<f64>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_absent()
            && self.address.is_absent()
            && self.state.is_absent()
            && self.latitude.is_absent()
            && self.longitude.is_absent()
    }

    pub fn apply(self, draft: &mut DraftRecord) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        self.description.apply_to(&mut draft.description);
        self.address.apply_to(&mut draft.address);
        self.state.apply_to(&mut draft.state);
        self.latitude.apply_to(&mut draft.latitude);
        self.longitude.apply_to(&mut draft.longitude);
    }
}
