use chrono::Utc;
use sea_orm::DbErr;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::storage::models::{DeviceProfile, DeviceTemplate, DeviceType, Headers};
use migration::entities::{device_profile, device_template};

/// Reads a JSON object column into a header map; non-string values are skipped.
pub fn headers_from_json(value: &Value) -> Headers {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
        _ => Headers::new(),
    }
}

pub fn headers_to_json(headers: &Headers) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<String, Value>>(),
    )
}

/// 将 Sea-ORM Model 转换为 DeviceProfile
pub fn model_to_profile(model: device_profile::Model) -> DeviceProfile {
    DeviceProfile {
        id: model.id,
        user_id: model.user_id,
        template_id: model.template_id,
        name: model.name,
        device_type: model.device_type,
        width: model.width,
        height: model.height,
        user_agent: model.user_agent,
        country_code: model.country_code,
        custom_headers: headers_from_json(&model.custom_headers),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 DeviceProfile 转换为 ActiveModel
///
/// For updates the key columns, `template_id` and `created_at` stay `NotSet`
/// so that an `update_many().set(..)` never rewrites ownership, the template
/// link or creation time.
pub fn profile_to_active_model(profile: &DeviceProfile, is_new: bool) -> device_profile::ActiveModel {
    use sea_orm::ActiveValue::*;

    device_profile::ActiveModel {
        id: if is_new { Set(profile.id) } else { NotSet },
        user_id: if is_new { Set(profile.user_id) } else { NotSet },
        template_id: if is_new { Set(profile.template_id) } else { NotSet },
        name: Set(profile.name.clone()),
        device_type: Set(profile.device_type.clone()),
        width: Set(profile.width),
        height: Set(profile.height),
        user_agent: Set(profile.user_agent.clone()),
        country_code: Set(profile.country_code.clone()),
        custom_headers: Set(headers_to_json(&profile.custom_headers)),
        created_at: if is_new { Set(profile.created_at) } else { NotSet },
        updated_at: Set(profile.updated_at),
    }
}

pub fn model_to_template(model: device_template::Model) -> Result<DeviceTemplate, DbErr> {
    let device_type: DeviceType = model.device_type.parse().map_err(|_| {
        DbErr::Type(format!(
            "device template {} has unknown device type '{}'",
            model.id, model.device_type
        ))
    })?;

    Ok(DeviceTemplate {
        id: model.id,
        name: model.name,
        device_type,
        width: model.width,
        height: model.height,
        user_agent: model.user_agent,
        country_code: model.country_code,
        default_headers: headers_from_json(&model.default_headers),
        created_at: model.created_at,
    })
}

pub fn template_to_active_model(template: &DeviceTemplate) -> device_template::ActiveModel {
    use sea_orm::ActiveValue::*;

    device_template::ActiveModel {
        id: Set(if template.id.is_nil() {
            Uuid::new_v4()
        } else {
            template.id
        }),
        name: Set(template.name.clone()),
        device_type: Set(template.device_type.to_string()),
        width: Set(template.width),
        height: Set(template.height),
        user_agent: Set(template.user_agent.clone()),
        country_code: Set(template.country_code.clone()),
        default_headers: Set(headers_to_json(&template.default_headers)),
        created_at: Set(Utc::now()),
    }
}
