use herdgate_store::{CredentialStore, SecretBox, StoreError};
use herdgate_types::{CredentialUpdate, NewCredential};
use pretty_assertions::assert_eq;

fn test_box() -> SecretBox {
    SecretBox::new(&[7u8; 32])
}

fn new_cred(project_id: &str) -> NewCredential {
    NewCredential {
        project_id: project_id.into(),
        project_name: format!("{project_id} farm"),
        secret: "database-secret".into(),
        database_url: format!("https://{project_id}-default-rtdb.firebaseio.com"),
        is_active: true,
    }
}

// ── Insert / list ──

#[test]
fn insert_and_list() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();
    store.insert(&new_cred("farm-b")).unwrap();

    let all = store.list().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].project_id, "farm-a");
    assert_eq!(all[1].project_id, "farm-b");
}

#[test]
fn duplicate_project_id_conflicts_and_preserves_existing() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();

    let mut dup = new_cred("farm-a");
    dup.project_name = "impostor".into();
    let err = store.insert(&dup).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].project_name, "farm-a farm");
}

// ── Secret handling ──

#[test]
fn secret_round_trips_through_encryption() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();

    let cred = store.get_decrypted("farm-a").unwrap().unwrap();
    assert_eq!(cred.secret, "database-secret");
}

#[test]
fn get_decrypted_unknown_project_is_none() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    assert!(store.get_decrypted("nope").unwrap().is_none());
}

#[test]
fn wrong_key_cannot_decrypt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creds.duckdb");

    {
        let store = CredentialStore::open(&path, test_box()).unwrap();
        store.insert(&new_cred("farm-a")).unwrap();
    }

    let store = CredentialStore::open(&path, SecretBox::new(&[9u8; 32])).unwrap();
    let err = store.get_decrypted("farm-a").unwrap_err();
    assert!(matches!(err, StoreError::Encryption(_)));
}

#[test]
fn secretbox_ciphertext_differs_per_write() {
    let sb = test_box();
    let a = sb.encrypt("same-secret").unwrap();
    let b = sb.encrypt("same-secret").unwrap();
    assert_ne!(a, b);
    assert_eq!(sb.decrypt(&a).unwrap(), "same-secret");
    assert_eq!(sb.decrypt(&b).unwrap(), "same-secret");
}

// ── Update ──

#[test]
fn partial_update_preserves_other_fields() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();

    let updated = store
        .update(
            "farm-a",
            &CredentialUpdate {
                project_name: Some("renamed".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.project_name, "renamed");
    assert_eq!(
        updated.database_url,
        "https://farm-a-default-rtdb.firebaseio.com"
    );

    // Secret untouched by a non-secret update
    let cred = store.get_decrypted("farm-a").unwrap().unwrap();
    assert_eq!(cred.secret, "database-secret");
}

#[test]
fn update_reencrypts_new_secret() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();

    store
        .update(
            "farm-a",
            &CredentialUpdate {
                secret: Some("rotated".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let cred = store.get_decrypted("farm-a").unwrap().unwrap();
    assert_eq!(cred.secret, "rotated");
}

#[test]
fn update_unknown_project_is_not_found() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    let err = store.update("nope", &CredentialUpdate::default()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// ── Delete / toggle ──

#[test]
fn delete_removes_record() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();
    store.delete("farm-a").unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn delete_unknown_project_is_not_found() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    let err = store.delete("nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn toggle_flips_active_flag() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();

    assert!(!store.toggle("farm-a").unwrap());
    assert!(store.toggle("farm-a").unwrap());
}

#[test]
fn toggle_unknown_project_is_not_found() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    let err = store.toggle("nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// ── Active filtering ──

#[test]
fn list_active_decrypted_skips_inactive() {
    let store = CredentialStore::open_in_memory(test_box()).unwrap();
    store.insert(&new_cred("farm-a")).unwrap();
    let mut inactive = new_cred("farm-b");
    inactive.is_active = false;
    store.insert(&inactive).unwrap();

    let active = store.list_active_decrypted().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].project_id, "farm-a");
    assert_eq!(active[0].secret, "database-secret");
}
