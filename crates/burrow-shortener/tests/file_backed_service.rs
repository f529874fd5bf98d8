use burrow_core::{BatchItem, Repository, Shortener, ShortenerError};
use burrow_generator::RandomGenerator;
use burrow_shortener::ShortenerService;
use burrow_storage::FileRepository;
use std::path::Path;

fn open_service(path: &Path, restore: bool) -> ShortenerService<FileRepository, RandomGenerator> {
    let repository = FileRepository::open(path, restore).expect("open file repository");
    ShortenerService::new(repository, RandomGenerator::with_seed(7))
}

#[tokio::test]
async fn mapping_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short-url-db.json");

    let service = open_service(&path, true);
    let shortened = service
        .create_or_reuse("https://example.com/")
        .await
        .unwrap();
    assert_eq!(shortened.status_code(), 201);
    let code = shortened.into_code();
    service.finalize().await.unwrap();
    drop(service);

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["Addresses"][code.as_str()], "https://example.com/");

    let restarted = open_service(&path, true);
    assert_eq!(
        restarted.resolve(&code).await.unwrap(),
        "https://example.com/"
    );

    let again = restarted
        .create_or_reuse("https://example.com/")
        .await
        .unwrap();
    assert_eq!(again.status_code(), 409);
    assert_eq!(again.code(), &code);
}

#[tokio::test]
async fn restore_disabled_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short-url-db.json");

    let service = open_service(&path, true);
    let code = service.shorten("https://example.com/").await.unwrap();
    service.finalize().await.unwrap();
    drop(service);

    let fresh = open_service(&path, false);
    assert_eq!(fresh.repository().len().await.unwrap(), 0);

    let err = fresh.resolve(&code).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn batch_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short-url-db.json");

    let service = open_service(&path, true);
    let entries = service
        .create_batch(vec![
            BatchItem {
                correlation_id: "first".to_string(),
                original_url: "https://a.example/".to_string(),
            },
            BatchItem {
                correlation_id: "second".to_string(),
                original_url: "https://b.example/".to_string(),
            },
        ])
        .await
        .unwrap();
    service.finalize().await.unwrap();
    drop(service);

    let restarted = open_service(&path, true);
    assert_eq!(restarted.repository().len().await.unwrap(), 2);
    assert_eq!(
        restarted.resolve(&entries[1].short_code).await.unwrap(),
        "https://b.example/"
    );
}

#[tokio::test]
async fn unparseable_keys_resolve_as_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let service = open_service(&dir.path().join("short-url-db.json"), true);
    let too_long = "a".repeat(33);

    for key in ["a", too_long.as_str(), "abc%20", "no spaces"] {
        let err = service.resolve_key(key).await.unwrap_err();
        assert_eq!(
            err,
            ShortenerError::NoEntry {
                short_code: key.to_string()
            }
        );
        assert_eq!(err.status_code(), 404);
    }
}

#[tokio::test]
async fn resolve_key_finds_stored_code() {
    let dir = tempfile::tempdir().unwrap();
    let service = open_service(&dir.path().join("short-url-db.json"), true);

    let code = service.shorten("https://example.com/").await.unwrap();
    assert_eq!(
        service.resolve_key(code.as_str()).await.unwrap(),
        "https://example.com/"
    );
}
