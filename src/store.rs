//! Destination list state: the normalised records, the loading flag and the status banner.

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::asset_paths::{AssetBase, ImageSlot, fallback_candidates};
use crate::backend::DestinationBackend;
use crate::config::GalleryConfig;
use crate::models::Destination;
use crate::normalize::normalize_records;

const REFRESHING_MESSAGE: &str = "Refreshing data...";
const REFRESHED_MESSAGE: &str = "Data refreshed!";
const REFRESH_FAILED_MESSAGE: &str = "Failed to refresh.";

/// User-visible status text, optionally expiring at a fixed instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  text: String,
  expires_at: Option<Instant>,
}

impl StatusMessage {
  fn sticky(text: &str) -> Self {
    Self {
      text: text.to_string(),
      expires_at: None,
    }
  }

  fn expiring(text: &str, expires_at: Instant) -> Self {
    Self {
      text: text.to_string(),
      expires_at: Some(expires_at),
    }
  }

  /// Message text.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// Whether the message should still be shown at `now`.
  pub fn is_visible(&self, now: Instant) -> bool {
    self.expires_at.is_none_or(|deadline| now < deadline)
  }
}

/// Result of reloading the destination list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// The list was replaced with this many destinations.
  Updated(usize),
  /// The fetch failed and the previous list was kept.
  Unchanged,
}

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
  /// The backend refreshed and the list was reloaded.
  Refreshed(LoadOutcome),
  /// The backend refresh request failed.
  Failed,
  /// Another refresh was still in flight, so nothing was issued.
  AlreadyInFlight,
}

/// Holds the normalised destinations and orchestrates fetches against a backend.
#[derive(Debug)]
pub struct DestinationStore<B> {
  backend: B,
  asset_base: AssetBase,
  message_ttl: Duration,
  destinations: Vec<Destination>,
  is_loading: bool,
  message: Option<StatusMessage>,
}

impl<B: DestinationBackend> DestinationStore<B> {
  /// Create an empty store.
  pub fn new(backend: B, asset_base: AssetBase, message_ttl: Duration) -> Self {
    Self {
      backend,
      asset_base,
      message_ttl,
      destinations: Vec::new(),
      is_loading: false,
      message: None,
    }
  }

  /// Create an empty store using the asset layout and message lifetime from `config`.
  pub fn from_config(backend: B, config: &GalleryConfig) -> Self {
    Self::new(backend, config.asset_base(), config.status_message_ttl())
  }

  /// Current destinations in backend order.
  pub fn destinations(&self) -> &[Destination] {
    &self.destinations
  }

  /// Whether a refresh is in flight.
  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  /// Asset layout used for image sources.
  pub fn asset_base(&self) -> &AssetBase {
    &self.asset_base
  }

  /// Backend this store reads from.
  pub fn backend(&self) -> &B {
    &self.backend
  }

  /// Status text visible at `now`, if any.
  pub fn status_message(&self, now: Instant) -> Option<&str> {
    self
      .message
      .as_ref()
      .filter(|message| message.is_visible(now))
      .map(StatusMessage::text)
  }

  /// Toggle the expanded flag of the destination at `index`.
  pub fn toggle_expanded(&mut self, index: usize) -> Option<bool> {
    self
      .destinations
      .get_mut(index)
      .map(Destination::toggle_expanded)
  }

  /// Fetch and normalise the destinations, keeping the previous list on failure.
  pub fn load(&mut self) -> LoadOutcome {
    match self.backend.fetch_destinations() {
      Ok(records) => {
        self.destinations = normalize_records(records);
        info!(count = self.destinations.len(), "destination list updated");
        LoadOutcome::Updated(self.destinations.len())
      }
      Err(err) => {
        error!("failed to load destinations: {err:#}");
        LoadOutcome::Unchanged
      }
    }
  }

  /// Mark a refresh as started. Returns `false` when one is already in flight.
  pub fn begin_refresh(&mut self) -> bool {
    if self.is_loading {
      warn!("refresh requested while another refresh is in flight");
      return false;
    }
    self.is_loading = true;
    self.message = Some(StatusMessage::sticky(REFRESHING_MESSAGE));
    true
  }

  /// Complete a refresh started with [`Self::begin_refresh`].
  ///
  /// On success the list is reloaded and a success message is shown until `now` plus the
  /// configured lifetime. The loading flag is cleared either way.
  pub fn finish_refresh(&mut self, result: anyhow::Result<()>, now: Instant) -> RefreshOutcome {
    let outcome = match result {
      Ok(()) => {
        let loaded = self.load();
        self.message = Some(StatusMessage::expiring(
          REFRESHED_MESSAGE,
          now + self.message_ttl,
        ));
        RefreshOutcome::Refreshed(loaded)
      }
      Err(err) => {
        error!("backend refresh failed: {err:#}");
        self.message = Some(StatusMessage::sticky(REFRESH_FAILED_MESSAGE));
        RefreshOutcome::Failed
      }
    };
    self.is_loading = false;
    outcome
  }

  /// Trigger a backend refresh and reload the list when it succeeds.
  pub fn refresh(&mut self) -> RefreshOutcome {
    if !self.begin_refresh() {
      return RefreshOutcome::AlreadyInFlight;
    }
    let result = self.backend.trigger_refresh();
    self.finish_refresh(result, Instant::now())
  }

  /// Fresh image state for every destination, one independent slot per element.
  pub fn image_slots(&self) -> Vec<ImageSlot> {
    self
      .destinations
      .iter()
      .map(|destination| ImageSlot::for_destination(destination, &self.asset_base))
      .collect()
  }

  /// Every reachable image source for each destination.
  pub fn image_candidates(&self) -> Vec<(&Destination, Vec<String>)> {
    self
      .destinations
      .iter()
      .map(|destination| (destination, fallback_candidates(destination, &self.asset_base)))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};
  use std::collections::VecDeque;

  use anyhow::anyhow;

  use super::*;
  use crate::asset_paths::{AttemptMarker, FallbackState};
  use crate::models::RawRecord;

  #[derive(Default)]
  struct FakeBackend {
    fetches: RefCell<VecDeque<Option<Vec<RawRecord>>>>,
    refresh_ok: bool,
    fetch_calls: Cell<usize>,
    refresh_calls: Cell<usize>,
  }

  impl FakeBackend {
    fn with_fetches(fetches: Vec<Option<Vec<RawRecord>>>, refresh_ok: bool) -> Self {
      Self {
        fetches: RefCell::new(fetches.into()),
        refresh_ok,
        ..Self::default()
      }
    }
  }

  impl DestinationBackend for FakeBackend {
    fn fetch_destinations(&self) -> anyhow::Result<Vec<RawRecord>> {
      self.fetch_calls.set(self.fetch_calls.get() + 1);
      self
        .fetches
        .borrow_mut()
        .pop_front()
        .flatten()
        .ok_or_else(|| anyhow!("connection refused"))
    }

    fn trigger_refresh(&self) -> anyhow::Result<()> {
      self.refresh_calls.set(self.refresh_calls.get() + 1);
      if self.refresh_ok {
        Ok(())
      } else {
        Err(anyhow!("connection refused"))
      }
    }
  }

  fn record(name: &str, image: &str) -> RawRecord {
    RawRecord {
      name: Some(name.into()),
      hero_image: Some(image.into()),
      tags: Some("a, b".into()),
      ..RawRecord::default()
    }
  }

  fn store(backend: FakeBackend) -> DestinationStore<FakeBackend> {
    DestinationStore::new(backend, AssetBase::default(), Duration::from_millis(1500))
  }

  #[test]
  fn load_replaces_list() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Miami", "miami.jpg"), record("Chicago", "chicago.jpg")])],
      true,
    ));

    assert_eq!(store.load(), LoadOutcome::Updated(2));
    assert_eq!(store.destinations()[1].name, "Chicago");
    assert_eq!(store.destinations()[0].tags(), ["a", "b"]);
  }

  #[test]
  fn failed_load_keeps_previous_list() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Miami", "miami.jpg")]), None],
      true,
    ));

    store.load();
    assert_eq!(store.load(), LoadOutcome::Unchanged);
    assert_eq!(store.destinations().len(), 1);
    assert_eq!(store.backend().fetch_calls.get(), 2);
  }

  #[test]
  fn successful_refresh_reloads_and_shows_expiring_message() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Honolulu", "honolulu.jpg")])],
      true,
    ));

    assert!(store.begin_refresh());
    assert!(store.is_loading());
    assert_eq!(store.status_message(Instant::now()), Some("Refreshing data..."));

    let now = Instant::now();
    let outcome = store.finish_refresh(Ok(()), now);
    assert_eq!(outcome, RefreshOutcome::Refreshed(LoadOutcome::Updated(1)));
    assert!(!store.is_loading());
    assert_eq!(store.status_message(now), Some("Data refreshed!"));
    assert_eq!(store.status_message(now + Duration::from_millis(1500)), None);
  }

  #[test]
  fn failed_refresh_clears_loading_and_keeps_message() {
    let mut store = store(FakeBackend::with_fetches(Vec::new(), false));

    assert_eq!(store.refresh(), RefreshOutcome::Failed);
    assert!(!store.is_loading());
    assert_eq!(store.backend().fetch_calls.get(), 0);
    let later = Instant::now() + Duration::from_secs(60);
    assert_eq!(store.status_message(later), Some("Failed to refresh."));
  }

  #[test]
  fn refresh_with_failed_reload_still_completes() {
    let mut store = store(FakeBackend::with_fetches(vec![None], true));
    assert_eq!(
      store.refresh(),
      RefreshOutcome::Refreshed(LoadOutcome::Unchanged)
    );
    assert!(!store.is_loading());
  }

  #[test]
  fn concurrent_refresh_is_rejected() {
    let mut store = store(FakeBackend::with_fetches(Vec::new(), true));

    assert!(store.begin_refresh());
    assert_eq!(store.refresh(), RefreshOutcome::AlreadyInFlight);
    assert_eq!(store.backend().refresh_calls.get(), 0);
    assert!(store.is_loading());
  }

  #[test]
  fn image_slots_are_independent() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Miami", " mi ami.jpg "), record("", "x.png")])],
      true,
    ));
    store.load();

    let mut slots = store.image_slots();
    assert_eq!(slots[0].source(), "assets/images/miami.jpg");
    assert_eq!(slots[1].source(), "assets/images/x.png");

    slots[1].on_load_failure(store.asset_base());
    assert_eq!(slots[1].state(), FallbackState::Placeholder);
    assert_eq!(slots[0].marker(), AttemptMarker::NotTried);
    assert_eq!(store.image_slots()[1].marker(), AttemptMarker::NotTried);
  }

  #[test]
  fn lists_candidates_per_destination() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Chicago", "chi.jpeg")])],
      true,
    ));
    store.load();

    let candidates = store.image_candidates();
    assert_eq!(candidates[0].1, vec![
      "assets/images/chi.jpeg".to_string(),
      "assets/images/chi.jpg".to_string(),
      "assets/images/chicago.jpg".to_string(),
    ]);
  }

  #[test]
  fn toggles_expanded_by_index() {
    let mut store = store(FakeBackend::with_fetches(
      vec![Some(vec![record("Miami", "miami.jpg")])],
      true,
    ));
    store.load();
    assert_eq!(store.toggle_expanded(0), Some(true));
    assert_eq!(store.toggle_expanded(5), None);
  }
}
