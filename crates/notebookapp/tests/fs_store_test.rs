use notebookapp::clock::ManualClock;
use notebookapp::store::fs_backend::DOCUMENTS_DIR;
use notebookapp::store::{DocumentStore, FsBackend};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, DocumentStore<FsBackend>, Arc<ManualClock>) {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let store = DocumentStore::with_backend(FsBackend::new(dir.path())).with_clock(clock.clone());
    (dir, store, clock)
}

fn rich_doc() -> Value {
    json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 1 }, "content": [{ "type": "text", "text": "Title" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "bold", "marks": [{ "type": "strong" }] },
                { "type": "text", "text": " and a ", },
                { "type": "text", "text": "link", "marks": [{ "type": "link", "attrs": { "href": "https://example.com" } }] }
            ]},
            { "type": "code_block", "content": [{ "type": "text", "text": "fn main() {}\n\t\"quoted\"" }] },
            { "type": "horizontal_rule" }
        ]
    })
}

#[tokio::test]
async fn test_round_trip_preserves_content_exactly() {
    let (_dir, store, _) = setup();
    let id = store.generate_id();

    store.save(&id, "Rich ✓", &rich_doc()).await.unwrap();

    let record = store.load(&id).await.unwrap();
    assert_eq!(record.content, rich_doc());
    assert_eq!(record.meta.name, "Rich ✓");
}

#[tokio::test]
async fn test_create_then_update() {
    let (_dir, store, clock) = setup();
    let created = store.save("doc", "A", &json!({ "type": "doc" })).await.unwrap();
    clock.advance(60_000);
    let updated = store.save("doc", "B", &rich_doc()).await.unwrap();

    assert_eq!(updated.created, created.created);
    assert_eq!(updated.modified, created.created + 60_000);
    assert_eq!(updated.name, "B");
}

#[tokio::test]
async fn test_listing_order_on_disk() {
    let (_dir, store, clock) = setup();
    let mut expected = Vec::new();
    for n in 0..5 {
        let id = store.generate_id();
        store.save(&id, &format!("doc {n}"), &json!({ "type": "doc" })).await.unwrap();
        expected.push(id);
        clock.advance(1);
    }
    expected.reverse();

    let listed: Vec<String> = store.list().await.unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(listed, expected);

    let list = store.list().await.unwrap();
    assert!(list.windows(2).all(|pair| pair[0].modified > pair[1].modified));
}

#[tokio::test]
async fn test_deleted_meta_hides_document() {
    let (dir, store, _) = setup();
    store.save("kept", "Kept", &json!({ "type": "doc" })).await.unwrap();
    store.save("broken", "Broken", &json!({ "type": "doc" })).await.unwrap();

    let entry = dir.path().join(DOCUMENTS_DIR).join("broken");
    fs::remove_file(entry.join("meta.json")).unwrap();
    assert!(entry.join("document.json").exists());

    let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["kept"]);
    assert!(store.load("broken").await.is_none());
}

#[tokio::test]
async fn test_garbage_entries_do_not_abort_listing() {
    let (dir, store, _) = setup();
    store.save("good", "Good", &json!({ "type": "doc" })).await.unwrap();

    let root = dir.path().join(DOCUMENTS_DIR);
    fs::create_dir_all(root.join("empty-dir")).unwrap();
    fs::create_dir_all(root.join("bad-meta")).unwrap();
    fs::write(root.join("bad-meta").join("meta.json"), "{ truncated").unwrap();
    fs::write(root.join("bad-meta").join("document.json"), "{}").unwrap();
    fs::write(root.join("loose-file.json"), "{}").unwrap();

    let list = store.list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "good");
}

#[tokio::test]
async fn test_truncated_content_makes_load_absent() {
    let (dir, store, _) = setup();
    store.save("doc", "Doc", &rich_doc()).await.unwrap();
    fs::write(
        dir.path().join(DOCUMENTS_DIR).join("doc").join("document.json"),
        "{\"type\": \"doc\", \"content\": [",
    )
    .unwrap();

    assert!(store.load("doc").await.is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_removes_entry_directory() {
    let (dir, store, _) = setup();
    store.save("doc", "Doc", &rich_doc()).await.unwrap();
    store.delete("doc").await.unwrap();

    assert!(!dir.path().join(DOCUMENTS_DIR).join("doc").exists());
    assert!(store.load("doc").await.is_none());
    assert!(store.list().await.unwrap().is_empty());

    // Second delete is quiet.
    store.delete("doc").await.unwrap();
}

#[tokio::test]
async fn test_ids_are_unique_across_saves() {
    let (_dir, store, _) = setup();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let id = store.generate_id();
        assert!(seen.insert(id.clone()));
        store.save(&id, "n", &json!({ "type": "doc" })).await.unwrap();
    }
    assert_eq!(store.list().await.unwrap().len(), 50);
}

#[tokio::test]
async fn test_doctor_recovers_content_without_meta() {
    let (dir, store, _) = setup();
    let entry = dir.path().join(DOCUMENTS_DIR).join("orphan");
    fs::create_dir_all(&entry).unwrap();
    fs::write(entry.join("document.json"), rich_doc().to_string()).unwrap();

    assert!(store.list().await.unwrap().is_empty());

    let report = store.doctor().await.unwrap();
    assert_eq!(report.recovered_documents, 1);

    let record = store.load("orphan").await.unwrap();
    assert_eq!(record.content, rich_doc());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_failure_propagates() {
    use std::os::unix::fs::PermissionsExt;

    let (dir, store, _) = setup();
    store.save("doc", "Doc", &json!({ "type": "doc" })).await.unwrap();

    let root = dir.path().join(DOCUMENTS_DIR);
    fs::set_permissions(&root, fs::Permissions::from_mode(0o555)).unwrap();

    // Root may ignore permissions; only assert when the directory is truly read-only.
    let write_check = root.join(".write_check");
    let writable = fs::write(&write_check, "x").is_ok();
    let _ = fs::remove_file(&write_check);

    let result = store.save("new-doc", "New", &json!({ "type": "doc" })).await;
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    if !writable {
        assert!(result.is_err());
    }
}
