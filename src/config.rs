//! Configuration loader describing the backend location and image asset layout.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::asset_paths::AssetBase;

const DEFAULT_CONFIG_FILE: &str = "gallery.config.json";

/// Environment variable that overrides [`GalleryConfig::backend_url`] when set.
pub const BACKEND_ENV: &str = "DESTINATION_GALLERY_BACKEND";

/// Discoverable configuration for the gallery client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base URL of the backend serving `/destinations` and `/admin/refresh`.
    pub backend_url: String,
    /// Directory every image source is joined onto.
    pub asset_base_dir: String,
    /// Placeholder filename within the asset directory.
    pub placeholder_image: String,
    /// How long the success message stays visible after a refresh, in milliseconds.
    pub status_message_ttl_ms: u64,
    /// Optional request timeout in seconds. Requests never time out when unset.
    pub request_timeout_secs: Option<u64>,
    /// Heading printed above the destination list.
    pub title: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            asset_base_dir: "assets/images".into(),
            placeholder_image: "placeholder.jpg".into(),
            status_message_ttl_ms: 1500,
            request_timeout_secs: None,
            title: "Top 10 USA Vacation Destinations".into(),
        }
    }
}

impl GalleryConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or unparsable file falls back to defaults. The backend URL can then be
    /// replaced through [`BACKEND_ENV`].
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate)
            .unwrap_or_default()
            .with_backend_override(std::env::var(BACKEND_ENV).ok())
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Replace the backend URL when an override is present and non-empty.
    pub fn with_backend_override(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|value| !value.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    /// Asset directory and placeholder used for image sources.
    pub fn asset_base(&self) -> AssetBase {
        AssetBase::new(&self.asset_base_dir, &self.placeholder_image)
    }

    /// Lifetime of the transient refresh message.
    pub fn status_message_ttl(&self) -> Duration {
        Duration::from_millis(self.status_message_ttl_ms)
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("failed to create temp dir");
        assert_eq!(GalleryConfig::from_path(&temp.path().join(DEFAULT_CONFIG_FILE)), None);

        let config = GalleryConfig::from_path(&temp.path().join(DEFAULT_CONFIG_FILE))
            .unwrap_or_default()
            .with_backend_override(None);
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"{"asset_base_dir": "static/img/", "request_timeout_secs": 5}"#,
        )
        .expect("failed to write config");

        let config = GalleryConfig::from_path(&path).expect("config should parse");
        assert_eq!(config.asset_base_dir, "static/img/");
        assert_eq!(config.backend_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.asset_base().join("a.jpg"), "static/img/a.jpg");
    }

    #[test]
    fn invalid_json_is_ignored() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "{ not json").expect("failed to write config");
        assert_eq!(GalleryConfig::from_path(&path), None);
    }

    #[test]
    fn backend_override_ignores_blank_values() {
        let config = GalleryConfig::default().with_backend_override(Some("  ".into()));
        assert_eq!(config.backend_url, "http://127.0.0.1:8000");

        let config =
            GalleryConfig::default().with_backend_override(Some(" http://api.local:9000 ".into()));
        assert_eq!(config.backend_url, "http://api.local:9000");
    }

    #[test]
    fn default_message_ttl_matches_refresh_banner() {
        let config = GalleryConfig::default();
        assert_eq!(config.status_message_ttl(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), None);
    }
}
