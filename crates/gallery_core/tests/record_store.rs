use chrono::{DateTime, TimeZone, Utc};
use gallery_core::{
    LoadSource, MemorySlotStorage, NewParticipant, ParticipantPatch, ParticipantRecord,
    RecordStore, SeedReason, SlotStorage, StoreError, StoreOptions, DEFAULT_SLOT_KEY,
};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 8, 15, 0).unwrap()
}

fn empty_store() -> RecordStore<MemorySlotStorage> {
    let storage = MemorySlotStorage::default().preset(DEFAULT_SLOT_KEY, "[]");
    RecordStore::open(storage).with_clock(fixed_clock)
}

fn seeded_store() -> RecordStore<MemorySlotStorage> {
    RecordStore::open(MemorySlotStorage::default()).with_clock(fixed_clock)
}

fn persisted(store: RecordStore<MemorySlotStorage>) -> Vec<ParticipantRecord> {
    let (storage, _) = store.close();
    let raw = storage.read(DEFAULT_SLOT_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn missing_slot_loads_documented_seed() {
    let store = seeded_store();

    assert_eq!(store.load_source(), &LoadSource::Seeded(SeedReason::Missing));
    let ids: Vec<_> = store.get_all().iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(store.get_all()[0].name, "نورة أحمد");
    assert_eq!(store.get_all()[1].name, "فاطمة محمد");
}

#[test]
fn empty_and_corrupted_slots_fall_back_to_seed() {
    for (raw, code) in [
        ("", "empty"),
        ("{not json", "malformed"),
        (r#"{"id": 1}"#, "malformed"),
        (r#"[{"id": 1, "name": "x"}]"#, "malformed"),
    ] {
        let storage = MemorySlotStorage::default().preset(DEFAULT_SLOT_KEY, raw);
        let store = RecordStore::open(storage);

        match store.load_source() {
            LoadSource::Seeded(reason) => assert_eq!(reason.code(), code, "payload {raw:?}"),
            other => panic!("expected seed fallback for {raw:?}, got {other:?}"),
        }
        assert_eq!(store.get_all().len(), 2);
        assert_eq!(store.get_all()[0].name, "نورة أحمد");
    }
}

#[test]
fn duplicate_ids_in_slot_are_treated_as_malformed() {
    let record = r#"{"id":4,"name":"Hala","phone":"1","wants_drawing":true,
        "created_at":"2025-01-15T10:00:00.000Z"}"#;
    let storage =
        MemorySlotStorage::default().preset(DEFAULT_SLOT_KEY, format!("[{record},{record}]"));
    let store = RecordStore::open(storage);

    assert!(matches!(
        store.load_source(),
        LoadSource::Seeded(SeedReason::Malformed(message)) if message.contains("more than once")
    ));
}

#[test]
fn persisted_empty_array_is_not_replaced_by_seed() {
    let store = empty_store();
    assert_eq!(store.load_source(), &LoadSource::Persisted);
    assert!(store.get_all().is_empty());
}

#[test]
fn add_assigns_max_plus_one_and_persists() {
    let mut store = empty_store();

    let first = store
        .add(NewParticipant::new("Noura", "0500000001", true))
        .unwrap();
    assert_eq!(first.value.id, 1);
    assert!(first.persisted);
    assert!(!first.value.info_completed);
    assert!(!first.value.drawing_completed);
    assert_eq!(first.value.created_at, fixed_clock());

    let mut seeded = seeded_store();
    let next = seeded
        .add(NewParticipant::new("Reem", "0500000003", false))
        .unwrap()
        .value;
    assert_eq!(next.id, 3);
    assert!(next.info_completed);

    let stored = persisted(seeded);
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2], next);
}

#[test]
fn add_uses_max_id_not_length() {
    let records = r#"[
        {"id":10,"name":"A","phone":"1","wants_drawing":true,"created_at":"2025-01-15T10:00:00.000Z"},
        {"id":4,"name":"B","phone":"2","wants_drawing":false,"created_at":"2025-01-15T10:00:00.000Z"}
    ]"#;
    let storage = MemorySlotStorage::default().preset(DEFAULT_SLOT_KEY, records);
    let mut store = RecordStore::open(storage);

    let created = store.add(NewParticipant::new("C", "3", true)).unwrap().value;
    assert_eq!(created.id, 11);
    assert_eq!(store.get_by_id(11), Some(&created));
    assert_eq!(store.get_all().last(), Some(&created));
}

#[test]
fn add_rejects_blank_name_without_mutation() {
    let mut store = empty_store();
    let err = store.add(NewParticipant::new("   ", "1", true)).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.get_all().is_empty());
}

#[test]
fn add_after_highest_possible_id_is_rejected_without_mutation() {
    let mut store = empty_store();
    let snapshot = r#"[{"id":18446744073709551615,"name":"Last","phone":"1",
        "wants_drawing":true,"created_at":"2025-01-15T10:00:00.000Z"}]"#;
    store.import_snapshot(snapshot).unwrap();
    let before = store.get_all().to_vec();

    let err = store.add(NewParticipant::new("Next", "2", false)).unwrap_err();

    assert!(matches!(err, StoreError::IdSpaceExhausted(u64::MAX)));
    assert!(err.to_string().contains("no participant id left"));
    assert_eq!(store.get_all(), before.as_slice());
    assert_eq!(persisted(store), before);
}

#[test]
fn update_changes_only_patched_fields() {
    let mut store = seeded_store();
    let before = store.get_by_id(1).cloned().unwrap();

    let patch = ParticipantPatch {
        drawing_completed: Some(true),
        ..ParticipantPatch::default()
    };
    let updated = store.update(1, &patch).unwrap();
    assert!(updated.persisted);

    let expected = ParticipantRecord {
        drawing_completed: true,
        ..before
    };
    assert_eq!(updated.value, expected);
    assert_eq!(store.get_by_id(1), Some(&expected));
    assert_eq!(persisted(store)[0], expected);
}

#[test]
fn update_unknown_id_is_not_found_and_writes_nothing() {
    let storage = MemorySlotStorage::default();
    let mut store = RecordStore::open(&storage);
    let snapshot = store.get_all().to_vec();

    let patch = ParticipantPatch {
        name: Some("ghost".to_string()),
        ..ParticipantPatch::default()
    };
    let err = store.update(99, &patch).unwrap_err();

    assert!(matches!(err, StoreError::NotFound(99)));
    assert_eq!(store.get_all(), snapshot.as_slice());
    assert_eq!(storage.read(DEFAULT_SLOT_KEY).unwrap(), None);
}

#[test]
fn update_rejects_blank_name() {
    let mut store = seeded_store();
    let patch = ParticipantPatch {
        name: Some(String::new()),
        ..ParticipantPatch::default()
    };
    assert!(matches!(
        store.update(2, &patch),
        Err(StoreError::Validation(_))
    ));
    assert_eq!(store.get_by_id(2).unwrap().name, "فاطمة محمد");
}

#[test]
fn search_filters_drawing_requests_in_collection_order() {
    let mut store = empty_store();
    store.add(NewParticipant::new("Sara Ali", "1", true)).unwrap();
    store.add(NewParticipant::new("SARAH", "2", false)).unwrap();
    store.add(NewParticipant::new("Lina", "3", true)).unwrap();
    store.add(NewParticipant::new("sarah k", "4", true)).unwrap();

    let hits: Vec<_> = store.search("sar").map(|record| record.id).collect();
    assert_eq!(hits, vec![1, 4]);

    let all: Vec<_> = store.search("").map(|record| record.id).collect();
    assert_eq!(all, vec![1, 3, 4]);
    assert!(store.search("").all(|record| record.wants_drawing));
    assert_eq!(store.search("nobody").count(), 0);
}

#[test]
fn search_is_recomputed_after_mutation() {
    let mut store = empty_store();
    store.add(NewParticipant::new("Maha", "1", false)).unwrap();
    assert_eq!(store.search("maha").count(), 0);

    let patch = ParticipantPatch {
        wants_drawing: Some(true),
        ..ParticipantPatch::default()
    };
    store.update(1, &patch).unwrap();
    assert_eq!(store.search("maha").count(), 1);
}

#[test]
fn stats_counts_each_flag() {
    let store = seeded_store();
    let stats = store.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.drawing_requests, 2);
    assert_eq!(stats.completed_info, 2);
    assert_eq!(stats.completed_drawings, 1);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "total": 2,
            "drawingRequests": 2,
            "completedInfo": 2,
            "completedDrawings": 1
        })
    );
}

#[test]
fn export_then_import_leaves_collection_unchanged() {
    let mut store = seeded_store();
    store.add(NewParticipant::new("Reem", "0500000003", false)).unwrap();
    let before = store.get_all().to_vec();

    let snapshot = store.export_snapshot().unwrap();
    assert!(snapshot.contains("\n  {"));
    let imported = store.import_snapshot(&snapshot).unwrap();

    assert_eq!(imported.value, 3);
    assert!(imported.persisted);
    assert_eq!(store.get_all(), before.as_slice());
    assert_eq!(store.load_source(), &LoadSource::Imported);
}

#[test]
fn malformed_import_is_a_no_op() {
    let storage = MemorySlotStorage::default();
    let mut store = RecordStore::open(&storage);
    let before = store.get_all().to_vec();

    for payload in ["not valid data", r#"{"id": 1}"#, "42", r#"[{"id": 0}]"#] {
        let err = store.import_snapshot(payload).unwrap_err();
        assert!(matches!(err, StoreError::MalformedImport(_)), "{payload}");
    }

    assert_eq!(store.get_all(), before.as_slice());
    assert_eq!(storage.read(DEFAULT_SLOT_KEY).unwrap(), None);
}

#[test]
fn quota_failure_keeps_in_memory_state() {
    let storage = MemorySlotStorage::with_quota(64);
    let mut store = RecordStore::open(&storage);
    assert!(!store.save());

    let receipt = store
        .add(NewParticipant::new("Reem", "0500000003", true))
        .unwrap();
    assert!(!receipt.persisted);
    assert_eq!(store.get_by_id(3), Some(&receipt.value));
    assert_eq!(store.get_all().len(), 3);
    assert_eq!(storage.read(DEFAULT_SLOT_KEY).unwrap(), None);
}

#[test]
fn reload_reads_what_was_saved_under_custom_slot() {
    let storage = MemorySlotStorage::default();
    let options = StoreOptions {
        slot_key: "gallery.custom".to_string(),
    };
    let mut store = RecordStore::open_with(&storage, options.clone());
    store.add(NewParticipant::new("Dana", "5", true)).unwrap();
    assert_eq!(store.slot_key(), "gallery.custom");

    let reopened = RecordStore::open_with(&storage, options);
    assert_eq!(reopened.load_source(), &LoadSource::Persisted);
    assert_eq!(reopened.get_all(), store.get_all());
    assert_eq!(storage.read(DEFAULT_SLOT_KEY).unwrap(), None);

    assert_eq!(store.reload(), &LoadSource::Persisted);
    assert_eq!(store.get_all().len(), 3);
}
