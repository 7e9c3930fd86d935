//! Device profile service
//!
//! Ownership comes from the explicit `RequestIdentity`, never from the
//! request body. Validation runs before any storage call.

use std::sync::Arc;

use tracing::{error, trace};

use super::validation::{parse_id, require_id, validate_patch, validate_profile};
use crate::errors::{AppError, Result, map_repo_err};
use crate::storage::models::MAX_PAGE_SIZE;
use crate::storage::{DeviceProfile, ProfilePatch, ProfileStore, RequestIdentity, TemplateStore};

pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    templates: Arc<dyn TemplateStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, templates: Arc<dyn TemplateStore>) -> Self {
        Self {
            profiles,
            templates,
        }
    }

    /// Creates a profile for the caller, materializing it from a template when
    /// `template_id` is set.
    pub async fn create_device_profile(
        &self,
        identity: &RequestIdentity,
        mut profile: DeviceProfile,
    ) -> Result<DeviceProfile> {
        trace!(
            "device_profile.create user_id={} name={}",
            identity.as_str(),
            profile.name
        );
        validate_profile(&profile)?;

        if let Some(template_id) = profile.template_id {
            let template = self
                .templates
                .get_template(Some(template_id))
                .await
                .map_err(|e| {
                    error!("device_profile.create template lookup failed: {}", e);
                    map_repo_err("device template not found", e)
                })?;
            // 模板字段优先于请求中的字段
            profile.materialize_from(&template);
        }

        profile.user_id = identity.user_id()?;

        self.profiles.create_profile(profile).await.map_err(|e| {
            error!("device_profile.create failed: {}", e);
            map_repo_err("create device profile", e)
        })
    }

    /// Pages start at 1; sizes above the maximum are clamped.
    pub async fn list_device_profiles(
        &self,
        identity: &RequestIdentity,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<DeviceProfile>> {
        trace!("device_profile.list page={} page_size={}", page, page_size);

        if page < 1 {
            return Err(AppError::invalid_argument("page must be >= 1"));
        }
        if page_size < 1 {
            return Err(AppError::invalid_argument("page_size must be >= 1"));
        }
        let page_size = (page_size as u64).min(MAX_PAGE_SIZE);
        let user_id = identity.user_id()?;

        self.profiles
            .list_profiles(user_id, page as u64, page_size)
            .await
            .map_err(|e| {
                error!("device_profile.list failed: {}", e);
                map_repo_err("list device profiles", e)
            })
    }

    pub async fn get_device_profile(
        &self,
        identity: &RequestIdentity,
        id: &str,
    ) -> Result<DeviceProfile> {
        trace!("device_profile.get id={}", id);
        let id = parse_id("id", id)?;
        let user_id = identity.user_id()?;

        self.profiles.get_profile(user_id, id).await.map_err(|e| {
            error!("device_profile.get failed: {}", e);
            map_repo_err("device profile not found", e)
        })
    }

    /// Full replace of every mutable field.
    pub async fn update_device_profile(
        &self,
        identity: &RequestIdentity,
        mut profile: DeviceProfile,
    ) -> Result<DeviceProfile> {
        trace!(
            "device_profile.update id={} name={}",
            profile.id,
            profile.name
        );

        let owner_matches = matches!(
            identity.user_id(),
            Ok(caller) if !profile.user_id.is_nil() && caller == profile.user_id
        );
        if !owner_matches {
            return Err(AppError::not_authorized(
                "profile does not belong to the caller",
            ));
        }

        require_id("id", profile.id)?;
        require_id("user_id", profile.user_id)?;
        validate_profile(&profile)?;
        // 模板只在创建时复制一次，不保留关联
        profile.template_id = None;

        self.profiles.update_profile(profile).await.map_err(|e| {
            error!("device_profile.update failed: {}", e);
            map_repo_err("update device profile", e)
        })
    }

    /// Selective update; only the supplied fields change.
    pub async fn patch_device_profile(
        &self,
        identity: &RequestIdentity,
        id: &str,
        patch: ProfilePatch,
    ) -> Result<DeviceProfile> {
        trace!("device_profile.patch id={}", id);
        let id = parse_id("id", id)?;

        if patch.is_empty() {
            return Err(AppError::invalid_argument("no fields supplied for update"));
        }
        validate_patch(&patch)?;
        let user_id = identity.user_id()?;

        self.profiles
            .patch_profile(user_id, id, patch)
            .await
            .map_err(|e| {
                error!("device_profile.patch failed: {}", e);
                map_repo_err("update device profile", e)
            })
    }

    pub async fn delete_device_profile(&self, identity: &RequestIdentity, id: &str) -> Result<()> {
        trace!("device_profile.delete id={}", id);
        let id = parse_id("id", id)?;
        let user_id = identity.user_id()?;

        let removed = self.profiles.delete_profile(user_id, id).await.map_err(|e| {
            error!("device_profile.delete failed: {}", e);
            map_repo_err("delete device profile", e)
        })?;

        if removed == 0 {
            return Err(AppError::not_found("device profile not found"));
        }
        Ok(())
    }
}
