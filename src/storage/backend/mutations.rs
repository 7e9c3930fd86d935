//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::converters::{model_to_profile, profile_to_active_model, template_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::storage::models::{DeviceProfile, DeviceTemplate, ProfilePatch};

use migration::entities::{device_profile, device_template, user};

/// 在给定连接（通常是事务）上按 id + user_id 覆盖写入
///
/// Callers establish ownership with `read_owned` in the same transaction.
/// `rows_affected` is not an ownership signal: MySQL reports 0 for an
/// update that changes nothing.
async fn write_owned<C: ConnectionTrait>(conn: &C, profile: &DeviceProfile) -> Result<(), DbErr> {
    device_profile::Entity::update_many()
        .set(profile_to_active_model(profile, false))
        .filter(device_profile::Column::Id.eq(profile.id))
        .filter(device_profile::Column::UserId.eq(profile.user_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn read_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<DeviceProfile, DbErr> {
    device_profile::Entity::find_by_id(id)
        .filter(device_profile::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .map(model_to_profile)
        .ok_or_else(|| DbErr::RecordNotFound(format!("device profile {}", id)))
}

impl SeaOrmStorage {
    pub async fn insert_profile(&self, mut profile: DeviceProfile) -> Result<DeviceProfile, DbErr> {
        let now = Utc::now();
        profile.id = Uuid::new_v4();
        profile.created_at = now;
        profile.updated_at = now;

        let db = &self.db;
        let active_model = profile_to_active_model(&profile, true);

        retry::with_retry(&format!("insert_profile({})", profile.name), self.retry_config, || {
            let am = active_model.clone();
            async move { device_profile::Entity::insert(am).exec(db).await }
        })
        .await?;

        info!("Device profile created: {} ({})", profile.id, profile.name);
        Ok(profile)
    }

    pub async fn replace_profile(&self, mut profile: DeviceProfile) -> Result<DeviceProfile, DbErr> {
        profile.updated_at = Utc::now();

        let txn = self.db.begin().await?;
        read_owned(&txn, profile.user_id, profile.id).await?;
        write_owned(&txn, &profile).await?;
        let stored = read_owned(&txn, profile.user_id, profile.id).await?;
        txn.commit().await?;

        info!("Device profile replaced: {}", stored.id);
        Ok(stored)
    }

    pub async fn merge_profile(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<DeviceProfile, DbErr> {
        let txn = self.db.begin().await?;

        let mut profile = read_owned(&txn, user_id, id).await?;
        patch.apply_to(&mut profile);
        profile.updated_at = Utc::now();
        write_owned(&txn, &profile).await?;

        txn.commit().await?;

        info!("Device profile patched: {}", profile.id);
        Ok(profile)
    }

    pub async fn remove_profile(&self, user_id: Uuid, id: Uuid) -> Result<u64, DbErr> {
        let db = &self.db;

        let result = retry::with_retry(&format!("remove_profile({})", id), self.retry_config, || async {
            device_profile::Entity::delete_many()
                .filter(device_profile::Column::Id.eq(id))
                .filter(device_profile::Column::UserId.eq(user_id))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected > 0 {
            info!("Device profile deleted: {}", id);
        }
        Ok(result.rows_affected)
    }

    /// 创建用户（账号开通，供 CLI 使用）
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<Uuid, DbErr> {
        let id = Uuid::new_v4();
        let model = user::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
        };

        user::Entity::insert(model).exec(&self.db).await?;
        info!("User created: {} ({})", username, id);
        Ok(id)
    }

    /// 写入设备模板（模板导入，供 CLI 使用）
    pub async fn insert_template(&self, template: &DeviceTemplate) -> Result<Uuid, DbErr> {
        let active_model = template_to_active_model(template);
        let result = device_template::Entity::insert(active_model)
            .exec(&self.db)
            .await?;

        info!("Device template stored: {}", template.name);
        Ok(result.last_insert_id)
    }
}
