// catalog_app/src/config.rs

use crate::errors::{AppError, Result};
use catalog_core::image_store::DEFAULT_MAX_IMAGE_BYTES;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// How the CORS layer decides whether a request origin is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsMode {
  /// A fixed list of exact origins.
  Static,
  /// Each request origin is evaluated against the list, which may contain
  /// `*.example.com` style wildcard entries.
  DynamicOriginCheck,
}

impl FromStr for CorsMode {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "static" => Ok(CorsMode::Static),
      "dynamic-origin-check" | "dynamic" => Ok(CorsMode::DynamicOriginCheck),
      other => Err(AppError::Config(format!(
        "Invalid CORS_MODE '{}': expected 'static' or 'dynamic-origin-check'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
  pub mode: CorsMode,
  pub allowed_origins: Vec<String>,
}

impl CorsSettings {
  pub fn new(mode: CorsMode, allowed_origins: Vec<String>) -> Result<Self> {
    if allowed_origins.is_empty() {
      return Err(AppError::Config("CORS_ALLOWED_ORIGINS must list at least one origin".to_string()));
    }
    for origin in &allowed_origins {
      let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
      if !scheme_ok {
        return Err(AppError::Config(format!("Invalid CORS origin '{}'", origin)));
      }
      if origin.contains('*') && mode == CorsMode::Static {
        return Err(AppError::Config(format!(
          "Wildcard origin '{}' requires CORS_MODE=dynamic-origin-check",
          origin
        )));
      }
    }
    Ok(Self { mode, allowed_origins })
  }

  /// Whether a request `origin` passes the configured list.
  pub fn allows(&self, origin: &str) -> bool {
    self.allowed_origins.iter().any(|allowed| {
      if allowed == origin {
        return true;
      }
      if self.mode == CorsMode::Static {
        return false;
      }
      // "https://*.shop.test" matches "https://eu.shop.test", not "https://shop.test"
      match allowed.split_once("*.") {
        Some((scheme, suffix)) => origin
          .strip_prefix(scheme)
          .and_then(|host| host.strip_suffix(suffix))
          .is_some_and(|label| label.ends_with('.') && label.len() > 1),
        None => false,
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  pub upload_dir: PathBuf,
  pub max_image_bytes: usize,

  pub cors: CorsSettings,

  // argon2 PHC strings, never the keys themselves
  pub admin_key_hashes: Vec<String>,
  pub user_key_hashes: Vec<String>,
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) if !value.trim().is_empty() => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    _ => Ok(default),
  }
}

fn split_list(raw: Option<String>, separator: fn(char) -> bool) -> Vec<String> {
  raw
    .unwrap_or_default()
    .split(separator)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", lookup("SERVER_PORT"), 5000u16)?;
    let database_url = lookup("DATABASE_URL")
      .filter(|v| !v.trim().is_empty())
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 5u32)?;

    let upload_dir = PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()));
    let max_image_bytes = parse_var("MAX_IMAGE_BYTES", lookup("MAX_IMAGE_BYTES"), DEFAULT_MAX_IMAGE_BYTES)?;

    let cors_mode = parse_var("CORS_MODE", lookup("CORS_MODE"), CorsMode::Static)?;
    let mut origins = split_list(lookup("CORS_ALLOWED_ORIGINS"), |c| c == ',');
    if origins.is_empty() {
      origins.push(DEFAULT_ALLOWED_ORIGIN.to_string());
    }
    let cors = CorsSettings::new(cors_mode, origins)?;

    let admin_key_hashes = split_list(lookup("ADMIN_API_KEY_HASHES"), char::is_whitespace);
    let user_key_hashes = split_list(lookup("USER_API_KEY_HASHES"), char::is_whitespace);
    if admin_key_hashes.is_empty() {
      tracing::warn!("ADMIN_API_KEY_HASHES is empty; product mutations will be rejected.");
    }

    tracing::info!(
      host = %server_host,
      port = server_port,
      upload_dir = %upload_dir.display(),
      cors_mode = ?cors.mode,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      upload_dir,
      max_image_bytes,
      cors,
      admin_key_hashes,
      user_key_hashes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| map.get(name).cloned())
  }

  #[test]
  fn defaults_apply() {
    let cfg = load(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap();
    assert_eq!(cfg.server_host, "127.0.0.1");
    assert_eq!(cfg.server_port, 5000);
    assert_eq!(cfg.database_max_connections, 5);
    assert_eq!(cfg.upload_dir, PathBuf::from("uploads"));
    assert_eq!(cfg.max_image_bytes, 5 * 1024 * 1024);
    assert_eq!(cfg.cors.mode, CorsMode::Static);
    assert_eq!(cfg.cors.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
    assert!(cfg.admin_key_hashes.is_empty());
  }

  #[test]
  fn database_url_is_required() {
    assert!(matches!(load(&[]), Err(AppError::Config(_))));
  }

  #[test]
  fn invalid_values_are_config_errors() {
    let base = ("DATABASE_URL", "postgres://x");
    assert!(matches!(load(&[base, ("SERVER_PORT", "http")]), Err(AppError::Config(_))));
    assert!(matches!(load(&[base, ("MAX_IMAGE_BYTES", "-1")]), Err(AppError::Config(_))));
    assert!(matches!(load(&[base, ("CORS_MODE", "open")]), Err(AppError::Config(_))));
    assert!(matches!(
      load(&[base, ("CORS_ALLOWED_ORIGINS", "localhost:5173")]),
      Err(AppError::Config(_))
    ));
    assert!(matches!(
      load(&[base, ("CORS_ALLOWED_ORIGINS", "https://*.shop.test")]),
      Err(AppError::Config(_))
    ));
  }

  #[test]
  fn lists_are_split() {
    let cfg = load(&[
      ("DATABASE_URL", "postgres://x"),
      ("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test"),
      ("ADMIN_API_KEY_HASHES", "$argon2id$one\n$argon2id$two"),
    ])
    .unwrap();
    assert_eq!(cfg.cors.allowed_origins, vec!["https://a.test", "https://b.test"]);
    assert_eq!(cfg.admin_key_hashes.len(), 2);
  }

  #[test]
  fn origin_matching() {
    let fixed = CorsSettings::new(CorsMode::Static, vec!["https://shop.test".to_string()]).unwrap();
    assert!(fixed.allows("https://shop.test"));
    assert!(!fixed.allows("https://eu.shop.test"));

    let dynamic = CorsSettings::new(
      CorsMode::DynamicOriginCheck,
      vec!["https://*.shop.test".to_string(), "http://localhost:5173".to_string()],
    )
    .unwrap();
    assert!(dynamic.allows("https://eu.shop.test"));
    assert!(dynamic.allows("http://localhost:5173"));
    assert!(!dynamic.allows("https://shop.test"));
    assert!(!dynamic.allows("http://eu.shop.test"));
    assert!(!dynamic.allows("https://evilshop.test"));
  }
}
