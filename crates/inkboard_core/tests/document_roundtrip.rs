use inkboard_core::{
    DocId, DocumentRepository, DocumentRecord, DocumentService, DocumentServiceError,
    KvDocumentRepository, KvStore, DEFAULT_DOCUMENT_CONTENT, DEFAULT_DOCUMENT_TITLE,
};
use tempfile::TempDir;

fn doc(id: &str) -> DocId {
    DocId::parse(id).expect("test doc id parses")
}

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("inkboard_data.json")
}

#[test]
fn content_and_title_round_trip_through_a_fresh_store() {
    let dir = TempDir::new().expect("temp dir");
    let id = doc("chapter-one");

    {
        let mut store = KvStore::open(store_path(&dir)).expect("open store");
        let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
        service
            .save_document(&id, "Chapter One", "<h1>It begins</h1><p>quietly.</p>")
            .expect("save succeeds");
    }

    // Fresh store over the same file: bytes must come back identical.
    let mut store = KvStore::open(store_path(&dir)).expect("reopen store");
    let mut repo = KvDocumentRepository::new(&mut store);
    let record = repo
        .load(&id)
        .expect("load succeeds")
        .expect("document exists");
    assert_eq!(record.title, "Chapter One");
    assert_eq!(record.content, "<h1>It begins</h1><p>quietly.</p>");
    assert_eq!(record.preview_text.as_deref(), Some("It begins quietly."));
}

#[test]
fn an_unwritten_id_reads_absent_not_an_error() {
    let mut store = KvStore::in_memory();
    let mut repo = KvDocumentRepository::new(&mut store);
    assert!(repo.load(&doc("never-saved")).expect("load succeeds").is_none());
}

#[test]
fn opening_an_unwritten_id_serves_the_placeholder() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));

    let record = service.open_document(&doc("fresh"));
    assert_eq!(record.title, DEFAULT_DOCUMENT_TITLE);
    assert_eq!(record.content, DEFAULT_DOCUMENT_CONTENT);

    // Opening alone persists nothing.
    let mut repo = KvDocumentRepository::new(&mut store);
    assert!(repo.load(&doc("fresh")).expect("load succeeds").is_none());
}

#[test]
fn distinct_ids_never_observe_each_others_data() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let x = doc("doc-x");
    let y = doc("doc-y");

    service
        .save_document(&x, "X", "<p>x body</p>")
        .expect("save x");
    service
        .save_document(&y, "Y", "<p>y body</p>")
        .expect("save y");
    service
        .save_document(&x, "X2", "<p>x rewritten</p>")
        .expect("rewrite x");

    let read_y = service.open_document(&y);
    assert_eq!(read_y.title, "Y");
    assert_eq!(read_y.content, "<p>y body</p>");
    let read_x = service.open_document(&x);
    assert_eq!(read_x.content, "<p>x rewritten</p>");
}

#[test]
fn ids_that_embed_field_suffixes_cannot_alias() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    // `a`'s content key is `doc.a.content`; an id literally named
    // `a.content` must still land on its own slots.
    let plain = doc("a");
    let tricky = doc("a.content");

    service
        .save_document(&plain, "Plain", "<p>plain</p>")
        .expect("save plain");
    service
        .save_document(&tricky, "Tricky", "<p>tricky</p>")
        .expect("save tricky");

    assert_eq!(service.open_document(&plain).content, "<p>plain</p>");
    assert_eq!(service.open_document(&tricky).content, "<p>tricky</p>");

    let mut repo = KvDocumentRepository::new(&mut store);
    let ids = repo.list_ids().expect("list succeeds");
    assert_eq!(ids, vec![plain, tricky]);
}

#[test]
fn listing_returns_sorted_records() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));

    service
        .save_document(&doc("zebra"), "Zebra", "<p>z</p>")
        .expect("save zebra");
    service
        .save_document(&doc("aardvark"), "Aardvark", "<p>a</p>")
        .expect("save aardvark");

    let records = service.list_documents().expect("list succeeds");
    let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["aardvark", "zebra"]);
}

#[test]
fn rename_requires_an_existing_document_and_a_real_title() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let id = doc("renamed");

    let missing = service.rename_document(&id, "New name").unwrap_err();
    assert!(matches!(
        missing,
        DocumentServiceError::DocumentNotFound(ref not_found) if *not_found == id
    ));

    service
        .save_document(&id, "Old name", "<p>body</p>")
        .expect("save");
    let blank = service.rename_document(&id, "   ").unwrap_err();
    assert!(matches!(blank, DocumentServiceError::InvalidTitle(_)));

    service
        .rename_document(&id, "  New name  ")
        .expect("rename succeeds");
    assert_eq!(service.open_document(&id).title, "New name");
}

#[test]
fn delete_removes_every_field_and_is_idempotent() {
    let mut store = KvStore::in_memory();
    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let id = doc("doomed");

    service
        .save_document(&id, "Doomed", "<p>gone soon</p>")
        .expect("save");
    service.delete_document(&id).expect("delete succeeds");
    service
        .delete_document(&id)
        .expect("deleting an absent id is a no-op");

    let mut repo = KvDocumentRepository::new(&mut store);
    assert!(repo.load(&id).expect("load succeeds").is_none());
    assert!(repo.list_ids().expect("list succeeds").is_empty());
    assert!(store.keys_with_prefix("doc.doomed").is_empty());
}

#[test]
fn unreadable_stored_data_falls_back_to_the_placeholder() {
    let mut store = KvStore::in_memory();
    // Sabotage: a non-string value under a content key.
    store.set("doc.broken.content", serde_json::json!(42));

    let mut service = DocumentService::new(KvDocumentRepository::new(&mut store));
    let record = service.open_document(&doc("broken"));
    assert_eq!(record.title, DEFAULT_DOCUMENT_TITLE);
}

#[test]
fn save_persists_a_full_record_shape() {
    let mut store = KvStore::in_memory();
    let id = doc("shaped");
    {
        let mut repo = KvDocumentRepository::new(&mut store);
        let record = DocumentRecord {
            id: id.clone(),
            title: "Shaped".to_string(),
            content: "<p>record</p>".to_string(),
            preview_text: Some("record".to_string()),
        };
        repo.save(&record).expect("save succeeds");
    }

    let mut repo = KvDocumentRepository::new(&mut store);
    let loaded = repo
        .load(&id)
        .expect("load succeeds")
        .expect("document exists");
    assert_eq!(loaded.preview_text.as_deref(), Some("record"));
}
