//! 模板导入 CLI 命令

use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use serde::Deserialize;
use uuid::Uuid;

use crate::interfaces::cli::CliError;
use crate::services::validation;
use crate::storage::models::Headers;
use crate::storage::{DeviceTemplate, DeviceType, SeaOrmStorage};

/// One entry of a template import file.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSeed {
    pub name: String,
    pub device_type: DeviceType,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    pub user_agent: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub default_headers: Headers,
}

impl TemplateSeed {
    fn validate(&self) -> crate::errors::Result<()> {
        validation::validate_name(&self.name)?;
        validation::validate_dimension("width", self.width)?;
        validation::validate_dimension("height", self.height)?;
        validation::validate_user_agent(Some(&self.user_agent))?;
        validation::validate_country_code(self.country_code.as_deref())
    }

    fn into_template(self) -> DeviceTemplate {
        DeviceTemplate {
            id: Uuid::new_v4(),
            name: self.name,
            device_type: self.device_type,
            width: self.width,
            height: self.height,
            user_agent: self.user_agent,
            country_code: self.country_code,
            default_headers: self.default_headers,
            created_at: Utc::now(),
        }
    }
}

/// Parses and validates a JSON array of templates.
pub fn parse_template_seeds(content: &str) -> Result<Vec<TemplateSeed>, CliError> {
    let seeds: Vec<TemplateSeed> = serde_json::from_str(content)
        .map_err(|e| CliError::ParseError(format!("Invalid template file: {}", e)))?;

    for (index, seed) in seeds.iter().enumerate() {
        seed.validate().map_err(|e| {
            CliError::ParseError(format!("Template #{} ({}): {}", index, seed.name, e))
        })?;
    }
    Ok(seeds)
}

pub async fn import_templates(
    storage: Arc<SeaOrmStorage>,
    file_path: String,
) -> Result<(), CliError> {
    let content = std::fs::read_to_string(&file_path).map_err(|e| {
        CliError::CommandError(format!("Failed to read '{}': {}", file_path, e))
    })?;
    let seeds = parse_template_seeds(&content)?;

    let total = seeds.len();
    for seed in seeds {
        let template = seed.into_template();
        storage
            .insert_template(&template)
            .await
            .map_err(|e| crate::errors::map_repo_err("import device template", e))?;
    }

    println!(
        "{} Imported {} device template(s) from {}",
        "✓".green().bold(),
        total,
        file_path.cyan()
    );
    Ok(())
}
