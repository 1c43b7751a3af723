//! Flattening a draft into the multipart payload the listing backend expects.

use crate::backend::SubmissionTarget;
use crate::images::{ImageSetManager, SubmissionField};
use crate::storage::models::DraftRecord;

/// Listing fields, then `units[i][..]`, then the image set's fields.
pub fn submission_fields(draft: &DraftRecord, images: &ImageSetManager) -> Vec<SubmissionField> {
    let mut fields = vec![
        SubmissionField::text("title", draft.title.clone()),
        SubmissionField::text("propertyType", draft.property_kind.as_str()),
    ];

    let optional = [
        ("description", draft.description.clone()),
        ("address", draft.address.clone()),
        ("state", draft.state.clone()),
        ("latitude", draft.latitude.map(|v| v.to_string())),
        ("longitude", draft.longitude.map(|v| v.to_string())),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            fields.push(SubmissionField::text(name, value));
        }
    }

    for (i, unit) in draft.units.iter().enumerate() {
        fields.push(SubmissionField::text(
            format!("units[{i}][size]"),
            unit.size.to_string(),
        ));
        fields.push(SubmissionField::text(
            format!("units[{i}][unit]"),
            unit.unit.as_str(),
        ));
        fields.push(SubmissionField::text(
            format!("units[{i}][price]"),
            unit.price.clone(),
        ));
        fields.push(SubmissionField::text(
            format!("units[{i}][available]"),
            unit.available.to_string(),
        ));
    }

    fields.extend(images.to_submission_fields());
    fields
}

pub fn submission_target(draft: &DraftRecord) -> SubmissionTarget {
    SubmissionTarget {
        property_kind: draft.property_kind,
        remote_id: draft.remote_id.clone(),
    }
}
