//! SeaOrmStorage tests against a temporary SQLite database
//!
//! Constraint violations are checked end to end: raw `DbErr` from the store,
//! classified through `map_repo_err`.

use std::time::Duration;

use chrono::Utc;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use tempfile::TempDir;
use uuid::Uuid;

use device_profiles::config::DatabaseConfig;
use device_profiles::errors::{DbCodeClass, ErrorKind, classify_db_code, db_error_code, map_repo_err};
use device_profiles::storage::models::Headers;
use migration::entities::device_profile;

use device_profiles::storage::{
    CredentialStore, DeviceProfile, DeviceTemplate, DeviceType, ProfilePatch, ProfileStore,
    SeaOrmStorage, StorageFactory, TemplateStore,
};

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("storage_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = SeaOrmStorage::new(&config, "sqlite")
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

async fn create_user(storage: &SeaOrmStorage, username: &str) -> Uuid {
    storage
        .create_user(username, "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g")
        .await
        .expect("Failed to create user")
}

fn profile_for(user_id: Uuid, name: &str) -> DeviceProfile {
    let mut headers = Headers::new();
    headers.insert("Accept-Language".into(), "en-US".into());
    DeviceProfile {
        user_id,
        name: name.to_string(),
        device_type: "desktop".to_string(),
        width: Some(1366),
        height: Some(768),
        user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
        country_code: Some("US".to_string()),
        custom_headers: headers,
        ..Default::default()
    }
}

fn template(name: &str) -> DeviceTemplate {
    DeviceTemplate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        device_type: DeviceType::Mobile,
        width: Some(390),
        height: Some(844),
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string(),
        country_code: None,
        default_headers: Headers::new(),
        created_at: Utc::now(),
    }
}

// =============================================================================
// Factory / credentials
// =============================================================================

#[tokio::test]
async fn test_factory_infers_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        database_url: format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("factory.db").display()
        ),
        ..Default::default()
    };

    let storage = StorageFactory::create(&config).await.unwrap();
    assert_eq!(storage.backend_name(), "sqlite");
    storage.ping().await.unwrap();
}

#[tokio::test]
async fn test_factory_rejects_unknown_scheme() {
    let config = DatabaseConfig {
        database_url: "redis://localhost:6379".to_string(),
        ..Default::default()
    };
    let err = StorageFactory::create(&config).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_retrieve_credentials() {
    let (storage, _dir) = create_storage().await;
    let id = create_user(&storage, "alice").await;

    let creds = storage.retrieve_credentials("alice").await.unwrap();
    assert_eq!(creds.id, id.to_string());
    assert!(creds.password_hash.starts_with("$argon2id$"));

    let missing = storage.retrieve_credentials("bob").await.unwrap();
    assert!(missing.id.is_empty());
    assert!(missing.password_hash.is_empty());
}

#[tokio::test]
async fn test_duplicate_username_is_unique_violation() {
    let (storage, _dir) = create_storage().await;
    create_user(&storage, "alice").await;

    let err = storage.create_user("alice", "other").await.unwrap_err();
    let code = db_error_code(&err).expect("vendor code expected");
    assert_eq!(classify_db_code(&code), DbCodeClass::UniqueViolation);
}

// =============================================================================
// Templates
// =============================================================================

#[tokio::test]
async fn test_templates_are_listed_by_name() {
    let (storage, _dir) = create_storage().await;
    storage.insert_template(&template("Pixel 8")).await.unwrap();
    storage.insert_template(&template("iPad Air")).await.unwrap();
    storage.insert_template(&template("Galaxy S24")).await.unwrap();

    let names: Vec<String> = storage
        .list_templates()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Galaxy S24", "Pixel 8", "iPad Air"]);
}

#[tokio::test]
async fn test_get_template_missing_or_empty_id() {
    let (storage, _dir) = create_storage().await;
    let stored = template("Pixel 8");
    storage.insert_template(&stored).await.unwrap();

    let found = storage.get_template(Some(stored.id)).await.unwrap();
    assert_eq!(found.name, "Pixel 8");
    assert_eq!(found.device_type, DeviceType::Mobile);

    for id in [None, Some(Uuid::nil()), Some(Uuid::new_v4())] {
        let err = storage.get_template(id).await.unwrap_err();
        assert_eq!(map_repo_err("device template not found", err).kind(), ErrorKind::NotFound);
    }
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn test_create_and_get_profile() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;

    let created = storage
        .create_profile(profile_for(user_id, "Laptop"))
        .await
        .unwrap();
    assert!(!created.id.is_nil());

    let fetched = storage.get_profile(user_id, created.id).await.unwrap();
    assert_eq!(fetched.name, "Laptop");
    assert_eq!(fetched.width, Some(1366));
    assert_eq!(fetched.custom_headers.get("Accept-Language").map(String::as_str), Some("en-US"));
    assert_eq!(fetched.country_code.as_deref(), Some("US"));
}

#[tokio::test]
async fn test_duplicate_name_per_user_is_already_exists() {
    let (storage, _dir) = create_storage().await;
    let alice = create_user(&storage, "alice").await;
    let bob = create_user(&storage, "bob").await;

    storage.create_profile(profile_for(alice, "Laptop")).await.unwrap();

    let err = storage
        .create_profile(profile_for(alice, "Laptop"))
        .await
        .unwrap_err();
    assert_eq!(
        map_repo_err("create device profile", err).kind(),
        ErrorKind::AlreadyExists
    );

    // 不同用户可以使用相同名称
    storage.create_profile(profile_for(bob, "Laptop")).await.unwrap();
}

#[tokio::test]
async fn test_unknown_owner_is_invalid_argument() {
    let (storage, _dir) = create_storage().await;

    let err = storage
        .create_profile(profile_for(Uuid::new_v4(), "Orphan"))
        .await
        .unwrap_err();
    assert_eq!(
        map_repo_err("create device profile", err).kind(),
        ErrorKind::InvalidArgument
    );
}

#[tokio::test]
async fn test_check_constraint_is_invalid_argument() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;

    let mut bad = profile_for(user_id, "Bad");
    bad.width = Some(-1);
    let err = storage.create_profile(bad).await.unwrap_err();
    assert_eq!(
        map_repo_err("create device profile", err).kind(),
        ErrorKind::InvalidArgument
    );
}

#[tokio::test]
async fn test_list_newest_first_with_pages() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;

    for name in ["first", "second", "third"] {
        storage.create_profile(profile_for(user_id, name)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let names = |profiles: Vec<DeviceProfile>| -> Vec<String> {
        profiles.into_iter().map(|p| p.name).collect()
    };

    let all = storage.list_profiles(user_id, 1, 20).await.unwrap();
    assert_eq!(names(all), vec!["third", "second", "first"]);

    let page1 = storage.list_profiles(user_id, 1, 2).await.unwrap();
    assert_eq!(names(page1), vec!["third", "second"]);

    let page2 = storage.list_profiles(user_id, 2, 2).await.unwrap();
    assert_eq!(names(page2), vec!["first"]);

    let past_end = storage.list_profiles(user_id, 3, 2).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_list_is_repeatable_with_creation_time_ties() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;

    for name in ["a", "b", "c", "d", "e"] {
        storage.create_profile(profile_for(user_id, name)).await.unwrap();
    }

    // 所有行使用同一个 created_at，排序只能靠 id
    let shared = Utc::now();
    device_profile::Entity::update_many()
        .set(device_profile::ActiveModel {
            created_at: Set(shared),
            ..Default::default()
        })
        .filter(device_profile::Column::UserId.eq(user_id))
        .exec(storage.get_db())
        .await
        .unwrap();

    let first = storage.list_profiles(user_id, 1, 20).await.unwrap();
    let second = storage.list_profiles(user_id, 1, 20).await.unwrap();
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);

    let mut expected: Vec<Uuid> = first.iter().map(|p| p.id).collect();
    expected.sort_by(|a, b| b.cmp(a));
    let ids: Vec<Uuid> = first.iter().map(|p| p.id).collect();
    assert_eq!(ids, expected);

    let mut paged = Vec::new();
    for page in 1..=3 {
        paged.extend(storage.list_profiles(user_id, page, 2).await.unwrap());
    }
    assert_eq!(paged, first);
}

#[tokio::test]
async fn test_list_far_past_the_end_is_empty() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();

    for (page, size) in [(i64::MAX as u64, 100), (u64::MAX, 1), (u64::MAX, 100)] {
        let rows = storage.list_profiles(user_id, page, size).await.unwrap();
        assert!(rows.is_empty(), "{page}/{size}");
    }

    assert_eq!(storage.list_profiles(user_id, 1, 100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_never_stores_template_link() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    let created = storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();

    let mut changed = created.clone();
    changed.name = "Workstation".into();
    changed.template_id = Some(Uuid::new_v4());

    let updated = storage.update_profile(changed).await.unwrap();
    assert_eq!(updated.name, "Workstation");
    assert_eq!(updated.template_id, None);

    let stored = storage.get_profile(user_id, created.id).await.unwrap();
    assert_eq!(stored.template_id, None);
}

#[tokio::test]
async fn test_update_without_changes_succeeds() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    let created = storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();

    let first = storage.update_profile(created.clone()).await.unwrap();
    let second = storage.update_profile(first.clone()).await.unwrap();
    assert_eq!(second.id, created.id);
    assert_eq!(second.name, "Laptop");
}

#[tokio::test]
async fn test_other_users_rows_are_invisible() {
    let (storage, _dir) = create_storage().await;
    let alice = create_user(&storage, "alice").await;
    let bob = create_user(&storage, "bob").await;

    let created = storage.create_profile(profile_for(alice, "Laptop")).await.unwrap();

    assert!(storage.list_profiles(bob, 1, 20).await.unwrap().is_empty());

    let err = storage.get_profile(bob, created.id).await.unwrap_err();
    assert_eq!(map_repo_err("device profile not found", err).kind(), ErrorKind::NotFound);

    let mut hijack = created.clone();
    hijack.user_id = bob;
    hijack.name = "Hijacked".into();
    let err = storage.update_profile(hijack).await.unwrap_err();
    assert_eq!(map_repo_err("update device profile", err).kind(), ErrorKind::NotFound);

    let err = storage
        .patch_profile(
            bob,
            created.id,
            ProfilePatch {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(map_repo_err("update device profile", err).kind(), ErrorKind::NotFound);

    assert_eq!(storage.delete_profile(bob, created.id).await.unwrap(), 0);

    let untouched = storage.get_profile(alice, created.id).await.unwrap();
    assert_eq!(untouched.name, "Laptop");
}

#[tokio::test]
async fn test_update_keeps_owner_and_creation_time() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    let inserted = storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();
    let created = storage.get_profile(user_id, inserted.id).await.unwrap();

    let mut changed = created.clone();
    changed.name = "Workstation".into();
    changed.user_agent = None;
    changed.custom_headers = Headers::new();

    let updated = storage.update_profile(changed).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, user_id);
    assert_eq!(updated.name, "Workstation");
    assert_eq!(updated.user_agent, None);
    assert!(updated.custom_headers.is_empty());
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    let created = storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();

    let patched = storage
        .patch_profile(
            user_id,
            created.id,
            ProfilePatch {
                width: Some(None),
                device_type: Some("mobile".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.name, "Laptop");
    assert_eq!(patched.device_type, "mobile");
    assert_eq!(patched.width, None);
    assert_eq!(patched.height, Some(768));

    let reloaded = storage.get_profile(user_id, created.id).await.unwrap();
    assert_eq!(reloaded.device_type, "mobile");
    assert_eq!(reloaded.width, None);
}

#[tokio::test]
async fn test_patch_rename_into_existing_name_conflicts() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();
    let phone = storage.create_profile(profile_for(user_id, "Phone")).await.unwrap();

    let err = storage
        .patch_profile(
            user_id,
            phone.id,
            ProfilePatch {
                name: Some("Laptop".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        map_repo_err("update device profile", err).kind(),
        ErrorKind::AlreadyExists
    );
}

#[tokio::test]
async fn test_delete_reports_rows() {
    let (storage, _dir) = create_storage().await;
    let user_id = create_user(&storage, "alice").await;
    let created = storage.create_profile(profile_for(user_id, "Laptop")).await.unwrap();

    assert_eq!(storage.delete_profile(user_id, created.id).await.unwrap(), 1);
    assert_eq!(storage.delete_profile(user_id, created.id).await.unwrap(), 0);
    assert!(storage.list_profiles(user_id, 1, 20).await.unwrap().is_empty());
}
