use std::sync::Arc;

use ideas_backend::{BackendError, Document, MemoryBackend, Operation};

use super::{IdeaDraft, IdeaStore, PAGE_SIZE};
use crate::test_support::titled;

const DB: &str = "ideas-db";
const COLLECTION: &str = "ideas";

fn setup() -> (Arc<MemoryBackend>, IdeaStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = IdeaStore::new(backend.clone(), DB, COLLECTION);
    (backend, store)
}

/// Seed `n` remote documents titled "i0".."i{n-1}", i0 being the newest.
fn seed(backend: &MemoryBackend, n: usize) -> Vec<Document> {
    let mut docs: Vec<Document> = (0..n)
        .rev()
        .map(|i| backend.seed_document(DB, COLLECTION, titled(&format!("i{i}"))))
        .collect();
    docs.reverse();
    docs
}

fn titles(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d.get_str("title").unwrap_or_default().to_string())
        .collect()
}

#[test]
fn starts_empty() {
    let (_, store) = setup();
    assert!(store.is_empty());
    assert_eq!(store.database_id(), DB);
    assert_eq!(store.collection_id(), COLLECTION);
}

#[tokio::test]
async fn init_loads_newest_first() {
    let (backend, store) = setup();
    seed(&backend, 3);

    store.init().await.unwrap();

    assert_eq!(titles(&store.current()), vec!["i0", "i1", "i2"]);
}

#[tokio::test]
async fn init_caps_at_page_size() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 25);

    store.init().await.unwrap();

    assert_eq!(store.len(), PAGE_SIZE);
    assert_eq!(store.current(), seeded[..PAGE_SIZE].to_vec());
    let current = store.current();
    assert!(current.windows(2).all(|w| w[0].created_at > w[1].created_at));
}

#[tokio::test]
async fn init_replaces_instead_of_appending() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 2);
    store.init().await.unwrap();

    backend.remove_document(DB, COLLECTION, &seeded[0].id);
    store.init().await.unwrap();

    assert_eq!(titles(&store.current()), vec!["i1"]);
}

#[tokio::test]
async fn init_of_empty_collection_gives_empty_list() {
    let (_, store) = setup();
    store.init().await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_init_keeps_list() {
    let (backend, store) = setup();
    seed(&backend, 2);
    store.init().await.unwrap();
    let before = store.current();

    backend.fail_next(
        Operation::ListDocuments,
        BackendError::NetworkError("connection reset".into()),
    );
    let err = store.init().await.unwrap_err();

    assert_eq!(err, BackendError::NetworkError("connection reset".into()));
    assert_eq!(store.current(), before);
}

#[tokio::test]
async fn add_prepends_for_every_starting_length() {
    for previous in 0..=PAGE_SIZE {
        let (backend, store) = setup();
        seed(&backend, previous);
        store.init().await.unwrap();

        let created = store.add(titled("new")).await.unwrap();

        let current = store.current();
        assert_eq!(current.len(), PAGE_SIZE.min(previous + 1), "previous = {previous}");
        assert_eq!(current[0], created);
    }
}

#[tokio::test]
async fn add_to_full_page_drops_oldest() {
    let (backend, store) = setup();
    seed(&backend, 10);
    store.init().await.unwrap();

    store.add(titled("new")).await.unwrap();

    assert_eq!(
        titles(&store.current()),
        vec!["new", "i0", "i1", "i2", "i3", "i4", "i5", "i6", "i7", "i8"]
    );
}

#[tokio::test]
async fn add_does_not_refetch() {
    let (backend, store) = setup();
    store.init().await.unwrap();
    backend.clear_calls();

    // Written by someone else; not visible until the next init.
    backend.seed_document(DB, COLLECTION, titled("theirs"));
    store.add(titled("mine")).await.unwrap();

    assert_eq!(backend.calls(), vec![Operation::CreateDocument]);
    assert_eq!(titles(&store.current()), vec!["mine"]);
}

#[tokio::test]
async fn add_returns_server_assigned_fields() {
    let (_, store) = setup();

    let created = store
        .add(IdeaDraft::new("Ship it").with_description("Before lunch"))
        .await
        .unwrap();

    assert_eq!(created.id.len(), 32);
    assert_eq!(created.collection_id, COLLECTION);
    assert_eq!(created.get_str("description"), Some("Before lunch"));
}

#[tokio::test]
async fn failed_add_keeps_list() {
    let (backend, store) = setup();
    seed(&backend, 3);
    store.init().await.unwrap();
    let before = store.current();

    backend.fail_next(
        Operation::CreateDocument,
        BackendError::api(400, "document_invalid_structure", "Missing required attribute \"title\""),
    );
    let err = store.add(titled("new")).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(store.current(), before);
}

#[tokio::test]
async fn concurrent_adds_both_land() {
    let (_, store) = setup();

    let (a, b) = tokio::join!(store.add(titled("a")), store.add(titled("b")));
    let (a, b) = (a.unwrap(), b.unwrap());

    let current = store.current();
    assert_eq!(current.len(), 2);
    assert!(current.contains(&a));
    assert!(current.contains(&b));
}

#[tokio::test]
async fn remove_filters_then_refetches() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 12);
    store.init().await.unwrap();
    backend.clear_calls();

    store.remove(&seeded[1].id).await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![Operation::DeleteDocument, Operation::ListDocuments]
    );
    // The refetch fills the freed slot with i10.
    assert_eq!(
        titles(&store.current()),
        vec!["i0", "i2", "i3", "i4", "i5", "i6", "i7", "i8", "i9", "i10"]
    );
}

#[tokio::test]
async fn remove_of_unlisted_id_still_deletes_and_refetches() {
    let (backend, store) = setup();
    seed(&backend, 2);
    store.init().await.unwrap();
    let before = store.current();
    let unlisted = backend.seed_document(DB, COLLECTION, titled("unlisted"));
    backend.clear_calls();

    store.remove(&unlisted.id).await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![Operation::DeleteDocument, Operation::ListDocuments]
    );
    assert!(backend.documents(DB, COLLECTION).iter().all(|d| d.id != unlisted.id));
    assert_eq!(store.current(), before);
}

#[tokio::test]
async fn remove_with_refetch_failure_keeps_local_removal() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 3);
    store.init().await.unwrap();

    backend.fail_next(
        Operation::ListDocuments,
        BackendError::NetworkError("timed out".into()),
    );
    let err = store.remove(&seeded[1].id).await.unwrap_err();

    assert_eq!(err, BackendError::NetworkError("timed out".into()));
    assert_eq!(titles(&store.current()), vec!["i0", "i2"]);
    assert_eq!(backend.documents(DB, COLLECTION).len(), 2);
}

#[tokio::test]
async fn remove_adopts_server_page_after_reconcile() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 3);
    store.init().await.unwrap();

    // Another writer adds an idea in the meantime.
    backend.seed_document(DB, COLLECTION, titled("theirs"));
    store.remove(&seeded[1].id).await.unwrap();

    assert_eq!(titles(&store.current()), vec!["theirs", "i0", "i2"]);
}

#[tokio::test]
async fn failed_delete_leaves_list_and_skips_refetch() {
    let (backend, store) = setup();
    let seeded = seed(&backend, 3);
    store.init().await.unwrap();
    let before = store.current();
    backend.clear_calls();

    backend.fail_next(
        Operation::DeleteDocument,
        BackendError::api(401, "user_unauthorized", "The current user is not authorized to perform the requested action."),
    );
    let err = store.remove(&seeded[0].id).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.current(), before);
    assert_eq!(backend.calls(), vec![Operation::DeleteDocument]);
}

#[tokio::test]
async fn remove_of_missing_document_propagates_not_found() {
    let (backend, store) = setup();
    seed(&backend, 1);
    store.init().await.unwrap();

    let err = store.remove("does-not-exist").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn subscribers_see_updates() {
    let (backend, store) = setup();
    seed(&backend, 1);
    let mut rx = store.subscribe();

    store.init().await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().len(), 1);

    store.add(titled("new")).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(titles(&rx.borrow()), vec!["new", "i0"]);
}
