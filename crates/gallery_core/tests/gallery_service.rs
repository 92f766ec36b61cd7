use gallery_core::{
    GalleryService, GalleryServiceError, MemorySlotStorage, ParticipantInfo, RecordStore,
    StoreError, DEFAULT_SLOT_KEY,
};

fn empty_store() -> RecordStore<MemorySlotStorage> {
    RecordStore::open(MemorySlotStorage::default().preset(DEFAULT_SLOT_KEY, "[]"))
}

fn sample_info() -> ParticipantInfo {
    ParticipantInfo {
        hair_color: "black".to_string(),
        eye_color: "brown".to_string(),
        favorite_color: "#2c3e50".to_string(),
        skin_tone: "wheat".to_string(),
        hair_style: "long".to_string(),
        clothing: "abaya".to_string(),
        additional_notes: Some("warm colors".to_string()),
    }
}

#[test]
fn full_workflow_moves_participant_through_queue() {
    let mut store = empty_store();
    let mut service = GalleryService::new(&mut store);

    let id = service
        .register("  Noura  ", " 0500000001 ", true)
        .unwrap()
        .value
        .id;
    assert_eq!(service.get(id).unwrap().name, "Noura");
    assert_eq!(service.get(id).unwrap().phone, "0500000001");
    assert!(service.pending_drawings().is_empty());

    let after_info = service.complete_info(id, sample_info()).unwrap().value;
    assert!(after_info.info_completed);
    assert_eq!(after_info.clothing.as_deref(), Some("abaya"));
    assert_eq!(service.pending_drawings().len(), 1);

    let done = service
        .record_drawing(id, "https://example.com/drawings/1.png")
        .unwrap()
        .value;
    assert!(done.drawing_completed);
    assert_eq!(
        done.drawing_path.as_deref(),
        Some("https://example.com/drawings/1.png")
    );
    assert!(service.pending_drawings().is_empty());

    let stats = service.stats();
    assert_eq!(
        (
            stats.total,
            stats.drawing_requests,
            stats.completed_info,
            stats.completed_drawings
        ),
        (1, 1, 1, 1)
    );
}

#[test]
fn info_and_drawing_require_a_drawing_request() {
    let mut store = empty_store();
    let mut service = GalleryService::new(&mut store);
    let id = service.register("Reem", "1", false).unwrap().value.id;

    assert!(matches!(
        service.complete_info(id, sample_info()),
        Err(GalleryServiceError::DrawingNotRequested(found)) if found == id
    ));
    assert!(matches!(
        service.record_drawing(id, "file:///tmp/x.png"),
        Err(GalleryServiceError::DrawingNotRequested(_))
    ));
    assert!(matches!(
        service.record_drawing(42, "file:///tmp/x.png"),
        Err(GalleryServiceError::Store(StoreError::NotFound(42)))
    ));
}

#[test]
fn record_drawing_rejects_blank_path() {
    let mut store = empty_store();
    let mut service = GalleryService::new(&mut store);
    let id = service.register("Lina", "1", true).unwrap().value.id;

    assert!(matches!(
        service.record_drawing(id, "   "),
        Err(GalleryServiceError::EmptyDrawingPath)
    ));
    assert!(!service.get(id).unwrap().drawing_completed);
}

#[test]
fn search_trims_term_and_export_import_round_trips() {
    let mut store = RecordStore::open(MemorySlotStorage::default());
    let mut service = GalleryService::new(&mut store);

    let hits: Vec<_> = service.search("  فاطمة ").map(|record| record.id).collect();
    assert_eq!(hits, vec![2]);

    let snapshot = service.export().unwrap();
    assert_eq!(service.import(&snapshot).unwrap().value, 2);
    assert!(matches!(
        service.import("[1, 2"),
        Err(StoreError::MalformedImport(_))
    ));
}
