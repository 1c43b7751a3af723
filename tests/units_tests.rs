use listing_drafts::units::{PropertyKind, Unit, UnitKind, UnitsError, UnitsList};

fn unit(size: f64, kind: UnitKind) -> Unit {
    Unit {
        size,
        unit: kind,
        price: "1000.00".to_string(),
        available: true,
    }
}

#[test]
fn test_remove_sole_unit_is_rejected() {
    let mut units = UnitsList::new(unit(100.0, UnitKind::Sqm));

    assert_eq!(units.remove(0), Err(UnitsError::LastUnit));
    assert_eq!(units.len(), 1);
    assert!(!units.is_empty());
    assert_eq!(units.as_slice()[0].size, 100.0);
}

#[test]
fn test_remove_down_to_one() {
    let mut units = UnitsList::new(unit(1.0, UnitKind::Acres));
    units.add(unit(2.0, UnitKind::Acres));
    units.add(unit(3.0, UnitKind::Hectares));

    let removed = units.remove(1).unwrap();
    assert_eq!(removed.size, 2.0);
    units.remove(0).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units.as_slice()[0].unit, UnitKind::Hectares);
    assert_eq!(units.remove(0), Err(UnitsError::LastUnit));
}

#[test]
fn test_index_out_of_range() {
    let mut units = UnitsList::new(unit(1.0, UnitKind::Rooms));
    units.add(unit(2.0, UnitKind::Rooms));

    assert_eq!(
        units.remove(5),
        Err(UnitsError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(
        units.update(2, unit(9.0, UnitKind::Rooms)),
        Err(UnitsError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(units.len(), 2);
}

#[test]
fn test_update_replaces_in_place() {
    let mut units = UnitsList::new(unit(1.0, UnitKind::Bedrooms));
    units.add(unit(2.0, UnitKind::Bedrooms));

    units.update(0, unit(4.0, UnitKind::Bedrooms)).unwrap();
    let sizes: Vec<f64> = units.iter().map(|u| u.size).collect();
    assert_eq!(sizes, vec![4.0, 2.0]);
}

#[test]
fn test_from_vec_rejects_empty() {
    assert_eq!(UnitsList::from_vec(Vec::new()), Err(UnitsError::LastUnit));
    assert_eq!(
        UnitsList::from_vec(vec![unit(1.0, UnitKind::Sqft)]).unwrap().len(),
        1
    );
}

#[test]
fn test_deserialize_rejects_empty_list() {
    let parsed: Result<UnitsList, _> = serde_json::from_str("[]");
    assert!(parsed.is_err());

    let parsed: UnitsList =
        serde_json::from_str(r#"[{"size": 40, "unit": "sqm", "price": "99.5"}]"#).unwrap();
    assert_eq!(parsed.len(), 1);
    assert!(parsed.as_slice()[0].available);
}

#[test]
fn test_allowed_units_per_property_kind() {
    assert!(PropertyKind::House.allows(UnitKind::Bedrooms));
    assert!(PropertyKind::House.allows(UnitKind::Sqft));
    assert!(!PropertyKind::House.allows(UnitKind::Acres));
    assert!(PropertyKind::Land.allows(UnitKind::Hectares));
    assert!(PropertyKind::Land.allows(UnitKind::Sqm));
    assert!(!PropertyKind::Land.allows(UnitKind::Rooms));
}

#[test]
fn test_property_kind_collections() {
    assert_eq!(PropertyKind::House.collection(), "properties");
    assert_eq!(PropertyKind::Land.collection(), "lands");
    assert_eq!(
        serde_json::to_string(&PropertyKind::Land).unwrap(),
        "\"land\""
    );
}
