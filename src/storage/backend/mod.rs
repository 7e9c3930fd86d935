//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use crate::storage::models::{DeviceProfile, DeviceTemplate, ProfilePatch, StoredCredentials};
use crate::storage::traits::{CredentialStore, ProfileStore, TemplateStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    headers_from_json, headers_to_json, model_to_profile, model_to_template,
    profile_to_active_model, template_to_active_model,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AppError::invalid_argument(format!(
            "cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(AppError::invalid_argument("database_url is not set"));
        }

        let retry_config = retry::RetryConfig {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        };

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url, config.timeout).await?
        } else {
            connect_generic(config, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        info!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（用于测试数据准备等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 健康检查
    pub async fn ping(&self) -> std::result::Result<(), DbErr> {
        self.db.ping().await
    }
}

#[async_trait::async_trait]
impl CredentialStore for SeaOrmStorage {
    async fn retrieve_credentials(
        &self,
        username: &str,
    ) -> std::result::Result<StoredCredentials, DbErr> {
        self.find_credentials(username).await
    }
}

#[async_trait::async_trait]
impl TemplateStore for SeaOrmStorage {
    async fn list_templates(&self) -> std::result::Result<Vec<DeviceTemplate>, DbErr> {
        self.load_templates().await
    }

    async fn get_template(&self, id: Option<Uuid>) -> std::result::Result<DeviceTemplate, DbErr> {
        self.find_template(id).await
    }
}

#[async_trait::async_trait]
impl ProfileStore for SeaOrmStorage {
    async fn list_profiles(
        &self,
        user_id: Uuid,
        page: u64,
        page_size: u64,
    ) -> std::result::Result<Vec<DeviceProfile>, DbErr> {
        self.load_profiles_paginated(user_id, page, page_size).await
    }

    async fn get_profile(&self, user_id: Uuid, id: Uuid) -> std::result::Result<DeviceProfile, DbErr> {
        self.find_profile(user_id, id).await
    }

    async fn create_profile(
        &self,
        profile: DeviceProfile,
    ) -> std::result::Result<DeviceProfile, DbErr> {
        self.insert_profile(profile).await
    }

    async fn update_profile(
        &self,
        profile: DeviceProfile,
    ) -> std::result::Result<DeviceProfile, DbErr> {
        self.replace_profile(profile).await
    }

    async fn patch_profile(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProfilePatch,
    ) -> std::result::Result<DeviceProfile, DbErr> {
        self.merge_profile(user_id, id, patch).await
    }

    async fn delete_profile(&self, user_id: Uuid, id: Uuid) -> std::result::Result<u64, DbErr> {
        self.remove_profile(user_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("device_profiles.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://u:p@h/db").unwrap(), "postgres");
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}
