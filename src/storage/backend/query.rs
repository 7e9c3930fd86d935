//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use super::converters::{model_to_profile, model_to_template};
use super::{SeaOrmStorage, retry};
use crate::storage::models::{
    DEFAULT_PAGE_SIZE, DeviceProfile, DeviceTemplate, MAX_PAGE_SIZE, StoredCredentials,
};

use migration::entities::{device_profile, device_template, user};

/// page 从 1 开始；page_size 为 0 时取默认值，超过上限时截断
pub(crate) fn effective_page(page: u64, page_size: u64) -> (u64, u64) {
    let page = page.max(1);
    let page_size = match page_size {
        0 => DEFAULT_PAGE_SIZE,
        size => size.min(MAX_PAGE_SIZE),
    };
    (page, page_size)
}

/// 行偏移量；溢出或超出 SQL 可表示范围时返回 None
pub(crate) fn page_offset(page: u64, page_size: u64) -> Option<u64> {
    (page - 1)
        .checked_mul(page_size)
        .filter(|offset| *offset <= i64::MAX as u64)
}

impl SeaOrmStorage {
    pub async fn find_credentials(&self, username: &str) -> Result<StoredCredentials, DbErr> {
        let db = &self.db;

        let found = retry::with_retry("find_credentials", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Username.eq(username))
                .one(db)
                .await
        })
        .await?;

        Ok(found
            .map(|m| StoredCredentials {
                id: m.id.to_string(),
                password_hash: m.password_hash,
            })
            .unwrap_or_default())
    }

    pub async fn load_templates(&self) -> Result<Vec<DeviceTemplate>, DbErr> {
        let db = &self.db;

        let models = retry::with_retry("load_templates", self.retry_config, || async {
            device_template::Entity::find()
                .order_by_asc(device_template::Column::Name)
                .order_by_asc(device_template::Column::Id)
                .all(db)
                .await
        })
        .await?;

        models.into_iter().map(model_to_template).collect()
    }

    pub async fn find_template(&self, id: Option<Uuid>) -> Result<DeviceTemplate, DbErr> {
        let id = match id {
            Some(id) if !id.is_nil() => id,
            _ => return Err(DbErr::RecordNotFound("device template id is empty".to_string())),
        };
        let db = &self.db;

        let model = retry::with_retry(&format!("find_template({})", id), self.retry_config, || async {
            device_template::Entity::find_by_id(id).one(db).await
        })
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("device template {}", id)))?;

        model_to_template(model)
    }

    pub async fn load_profiles_paginated(
        &self,
        user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<DeviceProfile>, DbErr> {
        let (page, page_size) = effective_page(page, page_size);
        if page_offset(page, page_size).is_none() {
            debug!(
                "Page {} (size {}) is past any addressable row for user {}",
                page, page_size, user_id
            );
            return Ok(Vec::new());
        }
        let db = &self.db;

        let models = retry::with_retry("load_profiles_paginated", self.retry_config, || async {
            device_profile::Entity::find()
                .filter(device_profile::Column::UserId.eq(user_id))
                .order_by_desc(device_profile::Column::CreatedAt)
                .order_by_desc(device_profile::Column::Id)
                .paginate(db, page_size)
                .fetch_page(page - 1)
                .await
        })
        .await?;

        debug!(
            "Loaded {} profiles for user {} (page {}, size {})",
            models.len(),
            user_id,
            page,
            page_size
        );
        Ok(models.into_iter().map(model_to_profile).collect())
    }

    pub async fn find_profile(&self, user_id: Uuid, id: Uuid) -> Result<DeviceProfile, DbErr> {
        let db = &self.db;

        retry::with_retry(&format!("find_profile({})", id), self.retry_config, || async {
            device_profile::Entity::find_by_id(id)
                .filter(device_profile::Column::UserId.eq(user_id))
                .one(db)
                .await
        })
        .await?
        .map(model_to_profile)
        .ok_or_else(|| DbErr::RecordNotFound(format!("device profile {}", id)))
    }
}
