use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::services::{CredentialVerifier, ProfileService, TemplateService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// Everything the HTTP server needs, built once before binding.
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub verifier: Arc<CredentialVerifier>,
    pub profile_service: Arc<ProfileService>,
    pub template_service: Arc<TemplateService>,
}

impl StartupContext {
    /// Wires the services on top of an already connected storage.
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        let verifier = Arc::new(CredentialVerifier::new(storage.clone()));
        let profile_service = Arc::new(ProfileService::new(storage.clone(), storage.clone()));
        let template_service = Arc::new(TemplateService::new(storage.clone()));

        Self {
            storage,
            verifier,
            profile_service,
            template_service,
        }
    }
}

/// 准备服务器启动的上下文
///
/// Connects the storage backend (running pending migrations) and builds
/// the services on top of it.
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::from_storage(storage);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
