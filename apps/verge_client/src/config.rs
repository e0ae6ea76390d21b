// verge_client/src/config.rs

use crate::errors::{ClientError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use verge_checkout::Currency;

pub const DEFAULT_MERCHANT_NAME: &str = "VERGE 2026";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Base URL of the festival backend, without a trailing slash.
  pub api_url: String,
  /// Public key id handed to the hosted payment checkout.
  pub gateway_key_id: String,
  pub merchant_name: String,
  pub currency: Currency,
  pub http_timeout: Duration,
  /// Emit logs as JSON lines instead of the human-readable format.
  pub log_json: bool,
}

impl AppConfig {
  /// Config with defaults for everything but the two required values.
  pub fn new(api_url: impl Into<String>, gateway_key_id: impl Into<String>) -> Self {
    Self {
      api_url: normalize_url(api_url.into()),
      gateway_key_id: gateway_key_id.into(),
      merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
      currency: Currency::Inr,
      http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
      log_json: false,
    }
  }

  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ClientError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let api_url = get_env("VERGE_API_URL")?;
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
      return Err(ClientError::Config(format!("Invalid VERGE_API_URL: '{}'", api_url)));
    }
    let gateway_key_id = get_env("VERGE_GATEWAY_KEY_ID")?;

    let merchant_name = get_env("VERGE_MERCHANT_NAME").unwrap_or_else(|_| DEFAULT_MERCHANT_NAME.to_string());
    let currency = get_env("VERGE_CURRENCY")
      .unwrap_or_else(|_| Currency::Inr.code().to_string())
      .parse::<Currency>()
      .map_err(|e| ClientError::Config(format!("Invalid VERGE_CURRENCY: {}", e)))?;
    let http_timeout_secs = get_env("VERGE_HTTP_TIMEOUT_SECS")
      .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
      .parse::<u64>()
      .map_err(|e| ClientError::Config(format!("Invalid VERGE_HTTP_TIMEOUT_SECS: {}", e)))?;
    let log_json = get_env("VERGE_LOG_JSON")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| ClientError::Config(format!("Invalid VERGE_LOG_JSON value: {}", e)))?;

    tracing::info!("Client configuration loaded successfully.");
    // Key id stays out of logs.
    tracing::debug!(api_url = %api_url, merchant = %merchant_name, "Loaded config details");

    Ok(Self {
      api_url: normalize_url(api_url),
      gateway_key_id,
      merchant_name,
      currency,
      http_timeout: Duration::from_secs(http_timeout_secs),
      log_json,
    })
  }

  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.api_url, path.trim_start_matches('/'))
  }
}

fn normalize_url(url: String) -> String {
  url.trim_end_matches('/').to_string()
}
