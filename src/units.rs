//! Unit/specification rows attached to a listing draft.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UnitsError {
    #[error("Unit index {index} is out of range for {len} units")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("A listing must keep at least one unit")]
    LastUnit,
}

/// Kind of property a draft describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    House,
    Land,
}

impl PropertyKind {
    /// Unit kinds a property of this kind may be measured in.
    pub fn allowed_units(&self) -> &'static [UnitKind] {
        match self {
            PropertyKind::House => &[
                UnitKind::Sqm,
                UnitKind::Sqft,
                UnitKind::Rooms,
                UnitKind::Bedrooms,
            ],
            PropertyKind::Land => &[
                UnitKind::Sqm,
                UnitKind::Sqft,
                UnitKind::Acres,
                UnitKind::Hectares,
            ],
        }
    }

    pub fn allows(&self, unit: UnitKind) -> bool {
        self.allowed_units().contains(&unit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::House => "house",
            PropertyKind::Land => "land",
        }
    }

    /// Backend collection the listing is submitted to.
    pub fn collection(&self) -> &'static str {
        match self {
            PropertyKind::House => "properties",
            PropertyKind::Land => "lands",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Acres,
    Bedrooms,
    Hectares,
    Rooms,
    Sqft,
    Sqm,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Acres => "acres",
            UnitKind::Bedrooms => "bedrooms",
            UnitKind::Hectares => "hectares",
            UnitKind::Rooms => "rooms",
            UnitKind::Sqft => "sqft",
            UnitKind::Sqm => "sqm",
        }
    }
}

/// One unit/specification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub size: f64,
    pub unit: UnitKind,
    /// Decimal string, currency-agnostic.
    pub price: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Ordered unit rows. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Unit>", into = "Vec<Unit>")]
pub struct UnitsList {
    units: Vec<Unit>,
}

impl UnitsList {
    pub fn new(first: Unit) -> Self {
        Self { units: vec![first] }
    }

    pub fn from_vec(units: Vec<Unit>) -> Result<Self, UnitsError> {
        if units.is_empty() {
            return Err(UnitsError::LastUnit);
        }
        Ok(Self { units })
    }

    pub fn as_slice(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Never true for a list built through `new` or `from_vec`.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn add(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn update(&mut self, index: usize, unit: Unit) -> Result<(), UnitsError> {
        let len = self.units.len();
        let slot = self
            .units
            .get_mut(index)
            .ok_or(UnitsError::IndexOutOfRange { index, len })?;
        *slot = unit;
        Ok(())
    }

    /// Remove the unit at `index`. The sole remaining unit cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<Unit, UnitsError> {
        let len = self.units.len();
        if index >= len {
            return Err(UnitsError::IndexOutOfRange { index, len });
        }
        if len == 1 {
            return Err(UnitsError::LastUnit);
        }
        Ok(self.units.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
        self.units.iter()
    }
}

impl TryFrom<Vec<Unit>> for UnitsList {
    type Error = UnitsError;

    fn try_from(units: Vec<Unit>) -> Result<Self, Self::Error> {
        UnitsList::from_vec(units)
    }
}

impl From<UnitsList> for Vec<Unit> {
    fn from(list: UnitsList) -> Self {
        list.units
    }
}
