// catalog_core/src/auth.rs

//! Caller identity and the gate that resolves it.
//!
//! Issuing credentials (login, sessions) happens elsewhere. The catalog only
//! needs to turn whatever credential a request carries into an `Identity`,
//! and it re-checks the role itself on every mutating operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  User,
  Guest,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Admin => "admin",
      Role::User => "user",
      Role::Guest => "guest",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = CatalogError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "admin" => Ok(Role::Admin),
      "user" => Ok(Role::User),
      "guest" => Ok(Role::Guest),
      other => Err(CatalogError::Validation(format!("Unknown role '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
  pub subject: String,
  pub role: Role,
}

impl Identity {
  pub fn new(subject: impl Into<String>, role: Role) -> Self {
    Self {
      subject: subject.into(),
      role,
    }
  }

  pub fn guest() -> Self {
    Self::new("anonymous", Role::Guest)
  }

  /// Succeeds only for admins. Guests get `Unauthorized`, every other role
  /// gets `Forbidden`.
  pub fn require_admin(&self) -> Result<(), CatalogError> {
    match self.role {
      Role::Admin => Ok(()),
      Role::Guest => Err(CatalogError::Unauthorized("Sign in to manage products".to_string())),
      _ => Err(CatalogError::Forbidden(format!(
        "Role '{}' may not manage products",
        self.role
      ))),
    }
  }
}

/// Resolves request credentials into identities.
#[async_trait]
pub trait AuthGate: Send + Sync {
  /// `None` means the request carried no credential and yields a guest.
  /// A credential that is present but not recognised is `Unauthorized`.
  async fn identify(&self, credential: Option<&str>) -> Result<Identity, CatalogError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_admins_pass() {
    assert!(Identity::new("ops", Role::Admin).require_admin().is_ok());
    assert!(matches!(
      Identity::guest().require_admin(),
      Err(CatalogError::Unauthorized(_))
    ));
    assert!(matches!(
      Identity::new("jo", Role::User).require_admin(),
      Err(CatalogError::Forbidden(_))
    ));
  }

  #[test]
  fn roles_parse() {
    assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("user".parse::<Role>().unwrap().to_string(), "user");
    assert!("root".parse::<Role>().is_err());
  }
}
