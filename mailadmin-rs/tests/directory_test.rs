//! Integration tests for directory operations against an on-disk database

use mailadmin_rs::directory::{DirectoryManager, DirectoryStore};
use mailadmin_rs::security::{CredentialHasher, Salt};
use mailadmin_rs::utils::EmailAddress;
use mailadmin_rs::AdminError;
use tempfile::TempDir;

/// Helper to open a fresh database file inside a temporary directory
async fn setup_test_db(dir: &TempDir) -> String {
    let path = dir.path().join("directory.sqlite3");
    let url = format!("sqlite://{}", path.display());
    DirectoryStore::open(&url).await.unwrap();
    url
}

async fn manager_for(url: &str, salt: &str) -> DirectoryManager {
    let store = DirectoryStore::open(url).await.unwrap();
    DirectoryManager::new(store, CredentialHasher::new(Salt::from_hex(salt)))
}

#[tokio::test]
async fn test_open_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.sqlite3");
    assert!(!path.exists());

    let store = DirectoryStore::open(&format!("sqlite://{}", path.display()))
        .await
        .unwrap();
    store.health_check().await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_readd_mailbox_replaces_digest() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;
    let manager = manager_for(&url, "0011223344").await;

    let first = manager.add_mailbox("a@x.com", "longenough1").await.unwrap();
    let second = manager.add_mailbox("a@x.com", "different2").await.unwrap();
    assert_ne!(first.password_digest, second.password_digest);

    let mailboxes = manager.list_mailboxes().await.unwrap();
    assert_eq!(mailboxes.len(), 1);
    assert_eq!(mailboxes[0].address().to_string(), "a@x.com");
    assert_eq!(mailboxes[0].password_digest, second.password_digest);
}

#[tokio::test]
async fn test_weak_password_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;
    let manager = manager_for(&url, "0011223344").await;

    let err = manager.add_mailbox("a@x.com", "short").await.unwrap_err();
    assert!(matches!(err, AdminError::WeakCredential(8)));
    assert!(manager.list_mailboxes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_mailbox() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;
    let manager = manager_for(&url, "0011223344").await;

    manager.add_mailbox("a@x.com", "longenough1").await.unwrap();
    let before = manager.list_mailboxes().await.unwrap();

    let err = manager.delete_mailbox("nobody@x.com").await.unwrap_err();
    assert!(matches!(err, AdminError::NotFound(_)));
    assert_eq!(manager.list_mailboxes().await.unwrap(), before);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;

    {
        let manager = manager_for(&url, "0011223344").await;
        manager.add_mailbox("a@x.com", "longenough1").await.unwrap();
        manager.add_forward("b@x.com", "a@x.com").await.unwrap();
        manager.store().close().await;
    }

    let manager = manager_for(&url, "5566778899").await;
    assert_eq!(manager.list_mailboxes().await.unwrap().len(), 1);
    assert_eq!(
        manager.list_forwards().await.unwrap()[0].to_string(),
        "b@x.com -> a@x.com"
    );
}

#[tokio::test]
async fn test_each_run_salts_differently() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;

    let first = manager_for(&url, Salt::generate().as_str())
        .await
        .add_mailbox("a@x.com", "longenough1")
        .await
        .unwrap();
    let second = manager_for(&url, Salt::generate().as_str())
        .await
        .add_mailbox("b@x.com", "longenough1")
        .await
        .unwrap();

    assert_ne!(first.password_digest, second.password_digest);
}

#[tokio::test]
async fn test_forward_fan_out() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;
    let manager = manager_for(&url, "0011223344").await;

    manager.add_forward("a@x.com", "b@y.com").await.unwrap();
    manager.add_forward("a@x.com", "c@z.com").await.unwrap();
    manager.add_forward("a@x.com", "c@z.com").await.unwrap();

    let destinations = manager
        .store()
        .forward_destinations(&EmailAddress::parse("a@x.com").unwrap())
        .await
        .unwrap();
    assert_eq!(
        destinations,
        vec![
            EmailAddress::from_parts("b", "y.com"),
            EmailAddress::from_parts("c", "z.com"),
        ]
    );

    let err = manager.add_forward("a@x.com", "a@x.com").await.unwrap_err();
    assert!(matches!(err, AdminError::SelfForward(_)));
    assert_eq!(manager.list_forwards().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_forwards_orders_by_destination() {
    let dir = tempfile::tempdir().unwrap();
    let url = setup_test_db(&dir).await;
    let manager = manager_for(&url, "0011223344").await;

    manager.add_forward("a@x.com", "z@b.com").await.unwrap();
    manager.add_forward("m@x.com", "a@c.com").await.unwrap();
    manager.add_forward("b@w.com", "z@b.com").await.unwrap();

    let listed: Vec<String> = manager
        .list_forwards()
        .await
        .unwrap()
        .iter()
        .map(|rule| rule.to_string())
        .collect();

    assert_eq!(
        listed,
        vec![
            "b@w.com -> z@b.com",
            "a@x.com -> z@b.com",
            "m@x.com -> a@c.com",
        ]
    );
}

#[tokio::test]
async fn test_unopenable_database_is_storage_fault() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}",
        dir.path().join("missing").join("d.db").display()
    );

    let err = match DirectoryStore::open(&url).await {
        Ok(_) => panic!("opened a database in a missing directory"),
        Err(e) => e,
    };
    assert!(matches!(err, AdminError::Database(_)));
    assert_eq!(err.exit_code(), 74);
}
