// tests/config_env_tests.rs

use serial_test::serial;
use std::env;
use std::time::Duration;
use verge_client::{AppConfig, ClientError};

const VARS: [&str; 6] = [
  "VERGE_API_URL",
  "VERGE_GATEWAY_KEY_ID",
  "VERGE_MERCHANT_NAME",
  "VERGE_CURRENCY",
  "VERGE_HTTP_TIMEOUT_SECS",
  "VERGE_LOG_JSON",
];

fn clear_env() {
  for var in VARS {
    env::remove_var(var);
  }
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
  clear_env();
  env::set_var("VERGE_API_URL", "https://api.verge.test/");
  env::set_var("VERGE_GATEWAY_KEY_ID", "rzp_test_abc");
  env::set_var("VERGE_HTTP_TIMEOUT_SECS", "5");
  env::set_var("VERGE_LOG_JSON", "true");

  let config = AppConfig::from_env().unwrap();
  clear_env();

  assert_eq!(config.api_url, "https://api.verge.test");
  assert_eq!(config.endpoint("/api/orders/create"), "https://api.verge.test/api/orders/create");
  assert_eq!(config.merchant_name, "VERGE 2026");
  assert_eq!(config.http_timeout, Duration::from_secs(5));
  assert!(config.log_json);
}

#[test]
#[serial]
fn from_env_requires_api_url() {
  clear_env();
  env::set_var("VERGE_GATEWAY_KEY_ID", "rzp_test_abc");

  let err = AppConfig::from_env().unwrap_err();
  clear_env();

  match err {
    ClientError::Config(message) => assert!(message.contains("VERGE_API_URL")),
    other => panic!("expected Config error, got {:?}", other),
  }
}
