// verge_client/src/telemetry.rs

use crate::config::AppConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber for the host app.
///
/// INFO by default, `RUST_LOG` overrides. Span closes are logged so the
/// duration of each checkout step shows up.
pub fn init(config: &AppConfig) -> anyhow::Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);

  let installed = if config.log_json {
    builder.json().try_init()
  } else {
    builder.try_init()
  };
  installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

  tracing::info!(json = config.log_json, "Tracing initialised.");
  Ok(())
}
