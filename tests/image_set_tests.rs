use bytes::Bytes;
use listing_drafts::images::{
    FileHandle, ImageDescriptor, ImageSetError, ImageSetManager, MetadataUpdate, PrimaryPolicy,
};

fn jpeg(name: &str) -> FileHandle {
    FileHandle::new(name, "image/jpeg", Bytes::from(format!("{name}-bytes")))
}

fn assert_paired(set: &ImageSetManager) {
    assert_eq!(set.all_files().count(), set.len());
    for descriptor in set.ledger() {
        assert!(set.get_file(&descriptor.id).is_ok());
    }
}

#[test]
fn test_add_files_first_is_primary() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);

    let ledger = set.ledger();
    assert_eq!(ledger.len(), 3);
    assert!(ledger[0].is_primary);
    assert!(!ledger[1].is_primary);
    assert!(!ledger[2].is_primary);
    assert_eq!(
        ledger.iter().map(|d| d.order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(ledger[1].original_filename, "b");
    assert!(ledger.iter().all(|d| d.caption.is_empty()));
}

#[test]
fn test_add_files_to_non_empty_set_keeps_existing() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a")]);
    let before = set.ledger().to_vec();

    let added = set.add_files(vec![jpeg("b"), jpeg("c")]).to_vec();
    assert_eq!(added.len(), 2);
    assert!(added.iter().all(|d| !d.is_primary));
    assert_eq!(added[0].order, 1);
    assert_eq!(added[1].order, 2);
    assert_eq!(&set.ledger()[..1], &before[..]);
}

#[test]
fn test_add_files_empty_is_noop() {
    let mut set = ImageSetManager::new();
    assert!(set.add_files(Vec::new()).is_empty());
    assert!(set.is_empty());
    assert_eq!(set.primary_index(), None);
}

#[test]
fn test_ids_are_unique() {
    let mut set = ImageSetManager::new();
    set.add_files((0..20).map(|i| jpeg(&format!("f{i}"))).collect());

    let mut ids: Vec<&str> = set.ledger().iter().map(|d| d.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[test]
fn test_pairing_holds_across_adds_and_removes() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);
    assert_paired(&set);

    let removed = set.remove_at(1).unwrap();
    assert_paired(&set);
    assert!(set.get_file(&removed.id).is_err());

    set.add_files(vec![jpeg("d")]);
    assert_paired(&set);

    set.remove_at(0).unwrap();
    set.remove_at(0).unwrap();
    assert_paired(&set);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_remove_keeps_order_values() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);

    set.remove_at(1).unwrap();
    let orders: Vec<u32> = set.ledger().iter().map(|d| d.order).collect();
    assert_eq!(orders, vec![0, 2]);
}

#[test]
fn test_remove_primary_leaves_no_primary_by_default() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b")]);

    let removed = set.remove_at(0).unwrap();
    assert!(removed.is_primary);
    assert_eq!(set.primary_index(), None);
}

#[test]
fn test_remove_primary_promotes_first_when_configured() {
    let mut set = ImageSetManager::with_policy(PrimaryPolicy::PromoteFirst);
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);
    set.set_primary(1).unwrap();

    set.remove_at(1).unwrap();
    assert_eq!(set.primary_index(), Some(0));
    assert_eq!(set.ledger()[0].original_filename, "a");

    // Removing a non-primary image never moves the flag
    set.remove_at(1).unwrap();
    assert_eq!(set.primary_index(), Some(0));
}

#[test]
fn test_remove_out_of_range() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a")]);

    assert_eq!(
        set.remove_at(1),
        Err(ImageSetError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(set.len(), 1);
}

#[test]
fn test_set_primary_is_exclusive() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);

    for target in [2, 0, 1] {
        set.set_primary(target).unwrap();
        let primaries: Vec<usize> = set
            .ledger()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_primary)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(primaries, vec![target]);
    }

    assert!(matches!(
        set.set_primary(3),
        Err(ImageSetError::IndexOutOfRange { .. })
    ));
    assert_eq!(set.primary_index(), Some(1));
}

#[test]
fn test_update_metadata_touches_only_target() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b")]);
    let before = set.ledger().to_vec();

    let updated = set
        .update_metadata(1, MetadataUpdate::Caption("Kitchen".to_string()))
        .unwrap()
        .clone();
    assert_eq!(updated.caption, "Kitchen");
    assert_eq!(updated.id, before[1].id);
    assert_eq!(updated.order, before[1].order);
    assert_eq!(set.ledger()[0], before[0]);

    set.update_metadata(0, MetadataUpdate::Order(7)).unwrap();
    assert_eq!(set.ledger()[0].order, 7);
    assert_eq!(set.ledger()[0].caption, "");
    assert_paired(&set);

    assert!(matches!(
        set.update_metadata(2, MetadataUpdate::Order(1)),
        Err(ImageSetError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_metadata_update_from_field() {
    assert_eq!(
        MetadataUpdate::from_field("caption", serde_json::json!("Pool")),
        Ok(MetadataUpdate::Caption("Pool".to_string()))
    );
    assert_eq!(
        MetadataUpdate::from_field("caption", serde_json::Value::Null),
        Ok(MetadataUpdate::Caption(String::new()))
    );
    assert_eq!(
        MetadataUpdate::from_field("order", serde_json::json!(4)),
        Ok(MetadataUpdate::Order(4))
    );
    assert_eq!(
        MetadataUpdate::from_field("id", serde_json::json!("x")),
        Err(ImageSetError::InvalidField("id".to_string()))
    );
    assert_eq!(
        MetadataUpdate::from_field("original_filename", serde_json::json!("x")),
        Err(ImageSetError::InvalidField("original_filename".to_string()))
    );
    assert!(matches!(
        MetadataUpdate::from_field("order", serde_json::json!("first")),
        Err(ImageSetError::InvalidValue { .. })
    ));
    assert!(matches!(
        MetadataUpdate::from_field("caption", serde_json::json!(3)),
        Err(ImageSetError::InvalidValue { .. })
    ));
}

#[test]
fn test_get_file_not_found() {
    let set = ImageSetManager::new();
    assert_eq!(
        set.get_file("missing").unwrap_err(),
        ImageSetError::NotFound("missing".to_string())
    );
}

#[test]
fn test_all_files_follow_ledger_order() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);
    // Display order changes do not reorder the ledger
    set.update_metadata(0, MetadataUpdate::Order(9)).unwrap();

    let names: Vec<&str> = set.all_files().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_display_order_breaks_ties_by_insertion() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c")]);
    set.update_metadata(2, MetadataUpdate::Order(0)).unwrap();

    let names: Vec<&str> = set
        .display_order()
        .iter()
        .map(|d| d.original_filename.as_str())
        .collect();
    assert_eq!(names, vec!["a", "c", "b"]);
}

#[test]
fn test_normalize_order() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b"), jpeg("c"), jpeg("d")]);
    set.remove_at(1).unwrap();
    set.update_metadata(0, MetadataUpdate::Order(10)).unwrap();

    set.normalize_order();
    let entries: Vec<(&str, u32)> = set
        .ledger()
        .iter()
        .map(|d| (d.original_filename.as_str(), d.order))
        .collect();
    assert_eq!(entries, vec![("c", 0), ("d", 1), ("a", 2)]);
    assert_paired(&set);
}

#[test]
fn test_clear_is_idempotent() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b")]);

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.all_files().count(), 0);

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.all_files().count(), 0);

    // A cleared set behaves like a new one
    set.add_files(vec![jpeg("c")]);
    assert!(set.ledger()[0].is_primary);
    assert_eq!(set.ledger()[0].order, 0);
}

#[test]
fn test_restored_ledger_skips_missing_files() {
    let ledger = vec![
        ImageDescriptor {
            id: "img-1".to_string(),
            original_filename: "old.jpg".to_string(),
            caption: "Lost on restart".to_string(),
            is_primary: true,
            order: 0,
        },
        ImageDescriptor {
            id: "img-2".to_string(),
            original_filename: "older.jpg".to_string(),
            caption: String::new(),
            is_primary: false,
            order: 1,
        },
    ];
    let mut set = ImageSetManager::restore(ledger, PrimaryPolicy::Leave);
    assert_eq!(set.len(), 2);
    assert!(!set.has_file("img-1"));
    assert_eq!(set.all_files().count(), 0);
    assert!(set.to_submission_fields().is_empty());

    // New files are not primary because the ledger was not empty
    set.add_files(vec![jpeg("fresh")]);
    assert!(!set.ledger()[2].is_primary);
    assert_eq!(set.ledger()[2].order, 2);

    let fields = set.to_submission_fields();
    assert_eq!(fields[0].name, "images");
    assert_eq!(fields[0].as_file().unwrap().filename, "fresh");
    assert_eq!(fields[1].name, "imageDetails[0][isPrimary]");
    assert_eq!(fields[2].name, "imageDetails[0][order]");
    assert_eq!(fields[2].as_text(), Some("2"));
}

#[test]
fn test_submission_fields_layout() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b")]);
    set.update_metadata(1, MetadataUpdate::Caption("Back yard".to_string()))
        .unwrap();

    let fields = set.to_submission_fields();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "images",
            "imageDetails[0][isPrimary]",
            "imageDetails[0][order]",
            "images",
            "imageDetails[1][caption]",
            "imageDetails[1][isPrimary]",
            "imageDetails[1][order]",
        ]
    );
    assert_eq!(fields[1].as_text(), Some("true"));
    assert_eq!(fields[4].as_text(), Some("Back yard"));
    assert_eq!(fields[5].as_text(), Some("false"));
    assert_eq!(fields[3].as_file().unwrap().data, Bytes::from("b-bytes"));
}

#[test]
fn test_end_to_end_scenario() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("fileA"), jpeg("fileB")]);

    let id2 = set.ledger()[1].id.clone();
    let snapshot: Vec<(bool, u32)> = set.ledger().iter().map(|d| (d.is_primary, d.order)).collect();
    assert_eq!(snapshot, vec![(true, 0), (false, 1)]);

    set.set_primary(1).unwrap();
    let snapshot: Vec<(bool, u32)> = set.ledger().iter().map(|d| (d.is_primary, d.order)).collect();
    assert_eq!(snapshot, vec![(false, 0), (true, 1)]);

    set.remove_at(0).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.ledger()[0].id, id2);
    assert!(set.ledger()[0].is_primary);
    assert_eq!(set.ledger()[0].order, 1);
    assert!(set.has_file(&id2));
    assert_eq!(set.all_files().count(), 1);

    let fields = set.to_submission_fields();
    let images: Vec<_> = fields.iter().filter(|f| f.name == "images").collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].as_file().unwrap().filename, "fileB");

    let detail = |name: &str| fields.iter().find(|f| f.name == name).and_then(|f| f.as_text());
    assert_eq!(detail("imageDetails[0][isPrimary]"), Some("true"));
    assert_eq!(detail("imageDetails[0][order]"), Some("1"));
    assert_eq!(detail("imageDetails[0][caption]"), None);
}

#[test]
fn test_discard_ids_leaves_other_images() {
    let mut set = ImageSetManager::new();
    set.add_files(vec![jpeg("a"), jpeg("b")]);
    let sent: Vec<String> = set.ledger().iter().map(|d| d.id.clone()).collect();
    set.add_files(vec![jpeg("c")]);

    assert_eq!(set.discard_ids(&sent), 2);
    assert_eq!(set.len(), 1);
    assert_eq!(set.ledger()[0].original_filename, "c");
    assert!(!set.ledger()[0].is_primary);
    assert_paired(&set);

    // Unknown ids are ignored
    assert_eq!(set.discard_ids(&sent), 0);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_discard_ids_promotes_under_promote_first() {
    let mut set = ImageSetManager::with_policy(PrimaryPolicy::PromoteFirst);
    set.add_files(vec![jpeg("a")]);
    let sent = vec![set.ledger()[0].id.clone()];
    set.add_files(vec![jpeg("b")]);

    set.discard_ids(&sent);
    assert_eq!(set.primary_index(), Some(0));
    assert_eq!(set.ledger()[0].original_filename, "b");
}
