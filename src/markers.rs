//! Map marker placement for drafts.
//!
//! Drafts with exact coordinates are placed on them. Drafts that only know
//! their state are scattered around the state's centroid by an offset derived
//! from the draft id, so markers in the same state do not stack and a given
//! draft always lands on the same point.

use ring::digest;
use serde::Serialize;

use crate::storage::models::DraftRecord;

/// Maximum offset from a state centroid, in degrees, on each axis.
pub const MAX_OFFSET_DEGREES: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Approximate,
    Exact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub draft_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub precision: Precision,
    pub title: String,
}

/// Approximate geographic centers of US states: (code, latitude, longitude).
const STATE_CENTERS: &[(&str, f64, f64)] = &[
    ("AK", 64.2008, -149.4937),
    ("AL", 32.3182, -86.9023),
    ("AR", 35.2010, -91.8318),
    ("AZ", 34.0489, -111.0937),
    ("CA", 36.7783, -119.4179),
    ("CO", 39.5501, -105.7821),
    ("CT", 41.6032, -73.0877),
    ("DC", 38.9072, -77.0369),
    ("DE", 38.9108, -75.5277),
    ("FL", 27.6648, -81.5158),
    ("GA", 32.1656, -82.9001),
    ("HI", 19.8968, -155.5828),
    ("IA", 41.8780, -93.0977),
    ("ID", 44.0682, -114.7420),
    ("IL", 40.6331, -89.3985),
    ("IN", 40.2672, -86.1349),
    ("KS", 39.0119, -98.4842),
    ("KY", 37.8393, -84.2700),
    ("LA", 30.9843, -91.9623),
    ("MA", 42.4072, -71.3824),
    ("MD", 39.0458, -76.6413),
    ("ME", 45.2538, -69.4455),
    ("MI", 44.3148, -85.6024),
    ("MN", 46.7296, -94.6859),
    ("MO", 37.9643, -91.8318),
    ("MS", 32.3547, -89.3985),
    ("MT", 46.8797, -110.3626),
    ("NC", 35.7596, -79.0193),
    ("ND", 47.5515, -101.0020),
    ("NE", 41.4925, -99.9018),
    ("NH", 43.1939, -71.5724),
    ("NJ", 40.0583, -74.4057),
    ("NM", 34.5199, -105.8701),
    ("NV", 38.8026, -116.4194),
    ("NY", 43.2994, -74.2179),
    ("OH", 40.4173, -82.9071),
    ("OK", 35.0078, -97.0929),
    ("OR", 43.8041, -120.5542),
    ("PA", 41.2033, -77.1945),
    ("RI", 41.5801, -71.4774),
    ("SC", 33.8361, -81.1637),
    ("SD", 43.9695, -99.9018),
    ("TN", 35.5175, -86.5804),
    ("TX", 31.9686, -99.9018),
    ("UT", 39.3210, -111.0937),
    ("VA", 37.4316, -78.6569),
    ("VT", 44.5588, -72.5778),
    ("WA", 47.7511, -120.7401),
    ("WI", 43.7844, -88.7879),
    ("WV", 38.5976, -80.4549),
    ("WY", 43.0760, -107.2903),
];

/// Centroid of a state by its two-letter code (case-insensitive).
pub fn state_center(code: &str) -> Option<(f64, f64)> {
    let code = code.trim();
    STATE_CENTERS
        .iter()
        .find(|(c, _, _)| c.eq_ignore_ascii_case(code))
        .map(|&(_, lat, lng)| (lat, lng))
}

pub fn is_known_state(code: &str) -> bool {
    state_center(code).is_some()
}

/// Deterministic offset in `[-MAX_OFFSET_DEGREES, MAX_OFFSET_DEGREES]` on each
/// axis, seeded by `seed`.
pub fn jitter(seed: &str) -> (f64, f64) {
    let hash = digest::digest(&digest::SHA256, seed.as_bytes());
    let bytes = hash.as_ref();

    let mut lat = [0u8; 4];
    let mut lng = [0u8; 4];
    lat.copy_from_slice(&bytes[0..4]);
    lng.copy_from_slice(&bytes[4..8]);

    (
        unit_offset(u32::from_be_bytes(lat)),
        unit_offset(u32::from_be_bytes(lng)),
    )
}

fn unit_offset(raw: u32) -> f64 {
    let fraction = raw as f64 / u32::MAX as f64;
    (fraction * 2.0 - 1.0) * MAX_OFFSET_DEGREES
}

/// Where to draw a draft on the map, if anywhere.
pub fn place(draft: &DraftRecord) -> Option<Marker> {
    if let (Some(latitude), Some(longitude)) = (draft.latitude, draft.longitude) {
        return Some(Marker {
            draft_id: draft.id.clone(),
            latitude,
            longitude,
            precision: Precision::Exact,
            title: draft.title.clone(),
        });
    }

    let (lat, lng) = state_center(draft.state.as_deref()?)?;
    let (d_lat, d_lng) = jitter(&draft.id);

    Some(Marker {
        draft_id: draft.id.clone(),
        latitude: lat + d_lat,
        longitude: lng + d_lng,
        precision: Precision::Approximate,
        title: draft.title.clone(),
    })
}
