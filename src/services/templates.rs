use std::sync::Arc;

use tracing::{error, trace};

use crate::errors::{Result, map_repo_err};
use crate::storage::{DeviceTemplate, TemplateStore};

pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub async fn list_templates(&self) -> Result<Vec<DeviceTemplate>> {
        trace!("device_template.list");

        self.store.list_templates().await.map_err(|e| {
            error!("device_template.list failed: {}", e);
            map_repo_err("list device templates", e)
        })
    }
}
