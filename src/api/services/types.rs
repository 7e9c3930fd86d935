//! HTTP 请求/响应类型定义
//!
//! Transport DTOs, kept apart from the storage models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::storage::models::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Headers};
use crate::storage::{DeviceProfile, DeviceTemplate, ProfilePatch};

/// `{"code": ..., "message": ...}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ListProfilesQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListProfilesQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE as i64)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64)
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub user_agent: Option<String>,
    pub country_code: Option<String>,
    pub custom_headers: Option<Headers>,
    /// UUID string; an empty string counts as absent.
    pub template_id: Option<String>,
}

impl CreateProfileRequest {
    /// The owner is left nil; the service takes it from the caller identity.
    pub fn into_profile(self) -> Result<DeviceProfile> {
        let template_id = match self.template_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|e| {
                AppError::invalid_argument("invalid template_id").with_cause(e)
            })?),
        };

        Ok(DeviceProfile {
            template_id,
            name: self.name,
            device_type: self.device_type,
            width: self.width,
            height: self.height,
            user_agent: self.user_agent,
            country_code: self.country_code,
            custom_headers: self.custom_headers.unwrap_or_default(),
            ..Default::default()
        })
    }
}

/// Partial document for `PUT /device-profiles/{id}`.
///
/// Nullable fields distinguish "absent" from an explicit `null`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub width: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub height: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub user_agent: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub country_code: Option<Option<String>>,
    pub custom_headers: Option<Headers>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfilePatch {
            name: req.name,
            device_type: req.device_type,
            width: req.width,
            height: req.height,
            user_agent: req.user_agent,
            country_code: req.country_code,
            custom_headers: req.custom_headers,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub name: String,
    pub device_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub user_agent: Option<String>,
    pub country_code: Option<String>,
    pub custom_headers: Headers,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceProfile> for ProfileResponse {
    fn from(p: DeviceProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            template_id: p.template_id,
            name: p.name,
            device_type: p.device_type,
            width: p.width,
            height: p.height,
            user_agent: p.user_agent,
            country_code: p.country_code,
            custom_headers: p.custom_headers,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub device_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub default_headers: Headers,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceTemplate> for TemplateResponse {
    fn from(t: DeviceTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            device_type: t.device_type.to_string(),
            width: t.width,
            height: t.height,
            user_agent: t.user_agent,
            country_code: t.country_code,
            default_headers: t.default_headers,
            created_at: t.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({"width": null, "height": 720})).unwrap();
        assert_eq!(req.width, Some(None));
        assert_eq!(req.height, Some(Some(720)));
        assert_eq!(req.user_agent, None);

        let patch = ProfilePatch::from(req);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_empty_update_request_is_empty_patch() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({})).unwrap();
        assert!(ProfilePatch::from(req).is_empty());
    }

    #[test]
    fn test_create_request_template_id() {
        let req = CreateProfileRequest {
            name: "x".into(),
            template_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(req.into_profile().unwrap().template_id, None);

        let req = CreateProfileRequest {
            template_id: Some("nope".into()),
            ..Default::default()
        };
        assert!(req.into_profile().is_err());

        let id = Uuid::new_v4();
        let req = CreateProfileRequest {
            template_id: Some(id.to_string()),
            ..Default::default()
        };
        assert_eq!(req.into_profile().unwrap().template_id, Some(id));
    }

    #[test]
    fn test_list_query_defaults() {
        let q = ListProfilesQuery::default();
        assert_eq!((q.page(), q.page_size()), (1, 20));
    }
}
