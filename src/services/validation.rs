//! Structural validation applied before any storage call.
//!
//! Each check returns the first violation as `InvalidArgument` naming the field.

use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::storage::models::{DeviceProfile, DeviceType, ProfilePatch};

pub const MAX_NAME_LEN: usize = 100;

pub fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 {
        return Err(AppError::invalid_argument("name is required"));
    }
    if len > MAX_NAME_LEN {
        return Err(AppError::invalid_argument(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_device_type(device_type: &str) -> Result<DeviceType> {
    device_type.parse::<DeviceType>().map_err(|_| {
        AppError::invalid_argument(format!(
            "device_type must be one of: desktop, mobile (got '{}')",
            device_type
        ))
    })
}

pub fn validate_dimension(field: &str, value: Option<i32>) -> Result<()> {
    match value {
        Some(v) if v <= 0 => Err(AppError::invalid_argument(format!(
            "{} must be a positive integer",
            field
        ))),
        _ => Ok(()),
    }
}

pub fn validate_user_agent(user_agent: Option<&str>) -> Result<()> {
    match user_agent {
        Some(ua) if ua.is_empty() => Err(AppError::invalid_argument(
            "user_agent must not be empty when provided",
        )),
        _ => Ok(()),
    }
}

pub fn validate_country_code(country_code: Option<&str>) -> Result<()> {
    match country_code {
        Some(cc) if cc.len() != 2 || !cc.bytes().all(|b| b.is_ascii_uppercase()) => {
            Err(AppError::invalid_argument(
                "country_code must be two uppercase letters",
            ))
        }
        _ => Ok(()),
    }
}

/// Parses an identifier; the nil UUID counts as missing.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid> {
    let id = Uuid::parse_str(raw)
        .map_err(|e| AppError::invalid_argument(format!("invalid {}", field)).with_cause(e))?;
    require_id(field, id)
}

pub fn require_id(field: &str, id: Uuid) -> Result<Uuid> {
    if id.is_nil() {
        return Err(AppError::invalid_argument(format!("invalid {}", field)));
    }
    Ok(id)
}

pub fn validate_profile(profile: &DeviceProfile) -> Result<()> {
    validate_name(&profile.name)?;
    validate_device_type(&profile.device_type)?;
    validate_dimension("width", profile.width)?;
    validate_dimension("height", profile.height)?;
    validate_user_agent(profile.user_agent.as_deref())?;
    validate_country_code(profile.country_code.as_deref())?;
    if let Some(template_id) = profile.template_id {
        require_id("template_id", template_id)?;
    }
    Ok(())
}

/// Validates only the fields present in the patch.
pub fn validate_patch(patch: &ProfilePatch) -> Result<()> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(device_type) = &patch.device_type {
        validate_device_type(device_type)?;
    }
    if let Some(width) = patch.width {
        validate_dimension("width", width)?;
    }
    if let Some(height) = patch.height {
        validate_dimension("height", height)?;
    }
    if let Some(user_agent) = &patch.user_agent {
        validate_user_agent(user_agent.as_deref())?;
    }
    if let Some(country_code) = &patch.country_code {
        validate_country_code(country_code.as_deref())?;
    }
    Ok(())
}
