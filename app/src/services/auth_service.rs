// catalog_app/src/services/auth_service.rs

//! API key hashing and the argon2-backed `AuthGate`.
//!
//! Keys are never stored in clear. Operators configure argon2 PHC strings
//! (produced with `catalog_server hash-key <key>`), and each request's
//! credential is verified against them.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use async_trait::async_trait;
use catalog_core::{AuthGate, CatalogError, Identity, Role};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Hashes a plain-text API key using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_key", skip(key), err(Display))]
pub fn hash_key(key: &str) -> Result<String, AppError> {
  if key.is_empty() {
    return Err(CatalogError::Validation("API key cannot be empty for hashing.".to_string()).into());
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(key.as_bytes(), &salt) {
    Ok(hash) => {
      debug!("API key hashed successfully.");
      Ok(hash.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 hashing failed.");
      Err(AppError::Internal(format!("API key hashing failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text key against a stored Argon2 hash.
///
/// `Ok(false)` means the key simply does not match; errors are reserved for
/// unusable hashes and internal argon2 failures.
pub fn verify_key(stored_hash: &str, provided_key: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(stored_hash)
    .map_err(|e| AppError::Internal(format!("Invalid stored key hash format: {}", e)))?;

  match Argon2::default().verify_password(provided_key.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other) => {
      error!(error = %other, "Argon2 verification encountered an error.");
      Err(AppError::Internal(format!("API key verification failed: {}", other)))
    }
  }
}

#[derive(Debug)]
struct KeyEntry {
  subject: String,
  role: Role,
  hash: String,
}

/// Resolves bearer API keys to identities by checking them against the
/// configured admin and user key hashes.
#[derive(Debug, Clone)]
pub struct ApiKeyGate {
  entries: Arc<Vec<KeyEntry>>,
}

impl ApiKeyGate {
  /// Fails on any hash that is not a valid PHC string.
  pub fn new(admin_hashes: &[String], user_hashes: &[String]) -> Result<Self, AppError> {
    let mut entries = Vec::with_capacity(admin_hashes.len() + user_hashes.len());
    for (role, hashes) in [(Role::Admin, admin_hashes), (Role::User, user_hashes)] {
      for (index, hash) in hashes.iter().enumerate() {
        PasswordHash::new(hash)
          .map_err(|e| AppError::Config(format!("Invalid {} API key hash #{}: {}", role, index + 1, e)))?;
        entries.push(KeyEntry {
          subject: format!("{}-key-{}", role, index + 1),
          role,
          hash: hash.clone(),
        });
      }
    }
    Ok(Self {
      entries: Arc::new(entries),
    })
  }

  pub fn key_count(&self) -> usize {
    self.entries.len()
  }

  fn find(entries: &[KeyEntry], credential: &str) -> Result<Option<Identity>, CatalogError> {
    for entry in entries {
      let matched = verify_key(&entry.hash, credential)
        .map_err(|e| CatalogError::storage("verifying API key", anyhow::anyhow!(e.to_string())))?;
      if matched {
        return Ok(Some(Identity::new(entry.subject.clone(), entry.role)));
      }
    }
    Ok(None)
  }
}

#[async_trait]
impl AuthGate for ApiKeyGate {
  #[instrument(name = "auth_service::identify", skip(self, credential), fields(has_credential = credential.is_some()))]
  async fn identify(&self, credential: Option<&str>) -> Result<Identity, CatalogError> {
    let credential = match credential.map(str::trim).filter(|c| !c.is_empty()) {
      Some(c) => c.to_string(),
      None => return Ok(Identity::guest()),
    };

    // argon2 verification is CPU bound; keep it off the async workers.
    let entries = self.entries.clone();
    let found = tokio::task::spawn_blocking(move || Self::find(&entries, &credential))
      .await
      .map_err(|e| CatalogError::storage("verifying API key", e))?;

    match found {
      Ok(Some(identity)) => {
        debug!(subject = %identity.subject, role = %identity.role, "Credential accepted.");
        Ok(identity)
      }
      Ok(None) => {
        warn!("Credential matched no configured API key.");
        Err(CatalogError::Unauthorized("Invalid credentials".to_string()))
      }
      Err(e) => Err(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_key("s3cret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_key(&hash, "s3cret").unwrap());
    assert!(!verify_key(&hash, "guess").unwrap());
    assert!(hash_key("").is_err());
    assert!(verify_key("not-a-hash", "s3cret").is_err());
  }

  #[test]
  fn gate_rejects_malformed_hashes() {
    let err = ApiKeyGate::new(&["plaintext".to_string()], &[]).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[tokio::test]
  async fn gate_resolves_roles() {
    let gate = ApiKeyGate::new(&[hash_key("admin-key").unwrap()], &[hash_key("user-key").unwrap()]).unwrap();
    assert_eq!(gate.key_count(), 2);

    let admin = gate.identify(Some("admin-key")).await.unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.subject, "admin-key-1");

    let user = gate.identify(Some("user-key")).await.unwrap();
    assert_eq!(user.role, Role::User);

    assert_eq!(gate.identify(None).await.unwrap(), Identity::guest());
    assert_eq!(gate.identify(Some("  ")).await.unwrap(), Identity::guest());
    assert!(matches!(
      gate.identify(Some("wrong")).await,
      Err(CatalogError::Unauthorized(_))
    ));
  }
}
