//! HTTP collaborator that fetches destination records and triggers backend refreshes.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::GalleryConfig;
use crate::models::{DestinationsEnvelope, RawRecord};

/// Source of destination records and the backend refresh side effect.
///
/// Failures are reported once and never retried. Transport, status and decoding failures are
/// not distinguished by callers.
pub trait DestinationBackend {
  /// Fetch every raw destination record.
  fn fetch_destinations(&self) -> Result<Vec<RawRecord>>;

  /// Ask the backend to regenerate its data. The response body is ignored.
  fn trigger_refresh(&self) -> Result<()>;
}

/// Blocking HTTP implementation of [`DestinationBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
  client: Client,
  base_url: String,
}

impl HttpBackend {
  /// Build a backend client for `base_url`.
  pub fn new(base_url: impl Into<String>, timeout: Option<std::time::Duration>) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  /// Build a backend client from the gallery configuration.
  pub fn from_config(config: &GalleryConfig) -> Result<Self> {
    Self::new(&config.backend_url, config.request_timeout())
  }

  /// Full URL for a backend path.
  pub fn endpoint(&self, path: &str) -> String {
    format!(
      "{}/{}",
      self.base_url.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
  }
}

impl DestinationBackend for HttpBackend {
  fn fetch_destinations(&self) -> Result<Vec<RawRecord>> {
    let url = self.endpoint("destinations");
    debug!(%url, "fetching destinations");

    let body = self
      .client
      .get(&url)
      .send()
      .with_context(|| format!("request to {url} failed"))?
      .error_for_status()
      .with_context(|| format!("{url} returned an error status"))?
      .text()
      .with_context(|| format!("failed to read response from {url}"))?;

    let records = parse_destinations(&body).with_context(|| format!("invalid payload from {url}"))?;
    info!(count = records.len(), "fetched destinations");
    Ok(records)
  }

  fn trigger_refresh(&self) -> Result<()> {
    let url = self.endpoint("admin/refresh");
    debug!(%url, "requesting backend refresh");

    self
      .client
      .get(&url)
      .send()
      .with_context(|| format!("request to {url} failed"))?
      .error_for_status()
      .with_context(|| format!("{url} returned an error status"))?;
    Ok(())
  }
}

/// Decode a destinations response body.
pub fn parse_destinations(body: &str) -> Result<Vec<RawRecord>> {
  let envelope: DestinationsEnvelope =
    serde_json::from_str(body).context("failed to parse destinations JSON")?;
  Ok(envelope.destinations)
}
