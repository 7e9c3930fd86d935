use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::errors::{AppError, Result};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

pub type Headers = BTreeMap<String, String>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
}

/// Shared, read-only preset a profile can be materialized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTemplate {
    pub id: Uuid,
    pub name: String,
    pub device_type: DeviceType,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub user_agent: String,
    pub country_code: Option<String>,
    #[serde(default)]
    pub default_headers: Headers,
    pub created_at: DateTime<Utc>,
}

/// A user-owned device configuration.
///
/// `device_type` stays a raw string so that an unknown class is reported by
/// validation rather than rejected while decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub name: String,
    pub device_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub user_agent: Option<String>,
    pub country_code: Option<String>,
    #[serde(default)]
    pub custom_headers: Headers,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeviceProfile {
    /// Copies every template value over the profile and drops the template link.
    pub fn materialize_from(&mut self, template: &DeviceTemplate) {
        self.name = template.name.clone();
        self.device_type = template.device_type.to_string();
        self.width = template.width;
        self.height = template.height;
        self.user_agent = Some(template.user_agent.clone());
        self.country_code = template.country_code.clone();
        self.custom_headers = template.default_headers.clone();
        self.template_id = None;
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            template_id: None,
            name: String::new(),
            device_type: String::new(),
            width: None,
            height: None,
            user_agent: None,
            country_code: None,
            custom_headers: Headers::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Selective update of a profile.
///
/// Outer `Some` marks a field as supplied; for nullable columns an inner
/// `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub width: Option<Option<i32>>,
    pub height: Option<Option<i32>>,
    pub user_agent: Option<Option<String>>,
    pub country_code: Option<Option<String>>,
    pub custom_headers: Option<Headers>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.device_type.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.user_agent.is_none()
            && self.country_code.is_none()
            && self.custom_headers.is_none()
    }

    /// Merges the supplied fields into `profile`, leaving the rest untouched.
    pub fn apply_to(&self, profile: &mut DeviceProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(device_type) = &self.device_type {
            profile.device_type = device_type.clone();
        }
        if let Some(width) = self.width {
            profile.width = width;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(user_agent) = &self.user_agent {
            profile.user_agent = user_agent.clone();
        }
        if let Some(country_code) = &self.country_code {
            profile.country_code = country_code.clone();
        }
        if let Some(headers) = &self.custom_headers {
            profile.custom_headers = headers.clone();
        }
    }
}

/// Stored login material; empty strings mean "no such user".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub id: String,
    pub password_hash: String,
}

/// Caller identity resolved at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    user_id: String,
}

impl RequestIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.user_id
    }

    /// Parses the opaque id; an empty identity fails closed.
    pub fn user_id(&self) -> Result<Uuid> {
        if self.user_id.is_empty() {
            return Err(AppError::not_authorized("missing caller identity"));
        }
        Uuid::parse_str(&self.user_id)
            .map_err(|e| AppError::invalid_argument("invalid user id").with_cause(e))
    }
}
