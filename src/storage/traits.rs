//! Persistence seams consumed by the services.
//!
//! Implementations return the raw `DbErr`; classification into domain errors
//! happens in the services through `map_repo_err`.

use sea_orm::DbErr;
use uuid::Uuid;

use super::models::{DeviceProfile, DeviceTemplate, ProfilePatch, StoredCredentials};

/// 凭据存储
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns empty credentials (not an error) when the username is unknown.
    async fn retrieve_credentials(&self, username: &str) -> Result<StoredCredentials, DbErr>;
}

/// 设备模板存储（只读）
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<DeviceTemplate>, DbErr>;

    /// `DbErr::RecordNotFound` when `id` is absent, nil or unknown.
    async fn get_template(&self, id: Option<Uuid>) -> Result<DeviceTemplate, DbErr>;
}

/// 设备 profile 存储，所有操作都按 user_id 限定范围
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Newest first; pages past the end are empty.
    async fn list_profiles(
        &self,
        user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<DeviceProfile>, DbErr>;

    async fn get_profile(&self, user_id: Uuid, id: Uuid) -> Result<DeviceProfile, DbErr>;

    /// Assigns the id and timestamps and returns the stored row.
    async fn create_profile(&self, profile: DeviceProfile) -> Result<DeviceProfile, DbErr>;

    /// Full replace scoped by `id` and `user_id`; `DbErr::RecordNotFound`
    /// when no owned row matched. The template link is never written.
    async fn update_profile(&self, profile: DeviceProfile) -> Result<DeviceProfile, DbErr>;

    async fn patch_profile(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<DeviceProfile, DbErr>;

    /// Returns the number of rows removed.
    async fn delete_profile(&self, user_id: Uuid, id: Uuid) -> Result<u64, DbErr>;
}
