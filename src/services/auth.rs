//! Credential verification
//!
//! Resolves a username/password pair to the opaque user id. Storage failures
//! and unknown users surface as `NotAuthorized`; a wrong password is the
//! ordinary `Ok(None)` outcome.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::errors::{AppError, Result};
use crate::storage::CredentialStore;
use crate::utils::password::{is_argon2_hash, verify_password};

pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn check_credentials(&self, username: &str, password: &str) -> Result<Option<String>> {
        trace!("auth.check_credentials username={}", username);

        let creds = self.store.retrieve_credentials(username).await.map_err(|e| {
            warn!("Credential lookup failed for '{}': {}", username, e);
            AppError::not_authorized("invalid credentials").with_cause(e)
        })?;

        if creds.id.is_empty() || creds.password_hash.is_empty() {
            return Err(AppError::not_authorized("invalid credentials"));
        }

        if !is_argon2_hash(&creds.password_hash) {
            warn!("Stored hash for '{}' is not an Argon2 hash", username);
            return Ok(None);
        }

        // Argon2 比较开销较大，放到阻塞线程池执行
        let password = password.to_string();
        let hash = creds.password_hash;
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal("password verification aborted").with_cause(e))?;

        match verified {
            Ok(true) => Ok(Some(creds.id)),
            Ok(false) => {
                debug!("Password mismatch for '{}'", username);
                Ok(None)
            }
            Err(e) => {
                warn!("Stored hash for '{}' is unusable: {}", username, e);
                Ok(None)
            }
        }
    }
}
