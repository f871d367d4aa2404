//! Per-element state machine that picks the next image source after a load failure.

use tracing::{debug, warn};

use crate::asset_paths::{AssetBase, display_name_slug, image_source};
use crate::models::Destination;

/// Records whether the `.jpg`/`.jpeg` swap has been tried for a single image element.
///
/// The marker only ever moves from [`AttemptMarker::NotTried`] to [`AttemptMarker::SwapTried`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttemptMarker {
    /// No load failure has been handled yet.
    #[default]
    NotTried,
    /// The extension swap step has run, whether or not a swap was possible.
    SwapTried,
}

/// Observable position of an element within the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// Showing the source built from the record's image filename.
    Initial,
    /// Showing the initial source with its `.jpg`/`.jpeg` extension swapped.
    ExtSwapped,
    /// Showing `<base>/<slug>.jpg` derived from the display name.
    NameFallback,
    /// Showing the placeholder asset. Only reached when the slug is empty.
    Placeholder,
}

/// Result of a single transition of the fallback state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackStep {
    /// Source to assign to the element.
    pub source: String,
    /// Marker to store alongside the element.
    pub marker: AttemptMarker,
    /// State the element is in after the transition.
    pub state: FallbackState,
}

/// Compute the next image source for an element whose current source failed to load.
///
/// While the marker is unset the extension swap is tried first and the marker is set even when
/// the source has no `.jpg`/`.jpeg` extension, in which case the name-derived slug is used in the
/// same call. Once the marker is set, every failure yields the slug path again (or the
/// placeholder when the slug is empty), so an unloadable slug image never advances to the
/// placeholder.
pub fn resolve_fallback(
    current: &str,
    marker: AttemptMarker,
    display_name: &str,
    base: &AssetBase,
) -> FallbackStep {
    if marker == AttemptMarker::NotTried {
        if let Some(source) = swap_jpeg_extension(current) {
            return FallbackStep {
                source,
                marker: AttemptMarker::SwapTried,
                state: FallbackState::ExtSwapped,
            };
        }
    }

    let slug = display_name_slug(display_name);
    if slug.is_empty() {
        FallbackStep {
            source: base.placeholder_source(),
            marker: AttemptMarker::SwapTried,
            state: FallbackState::Placeholder,
        }
    } else {
        FallbackStep {
            source: base.join(&format!("{slug}.jpg")),
            marker: AttemptMarker::SwapTried,
            state: FallbackState::NameFallback,
        }
    }
}

/// Swap a trailing `.jpg` for `.jpeg` or vice versa, matching case-insensitively.
fn swap_jpeg_extension(source: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets, so the suffix lengths below are valid boundaries.
    let lower = source.to_ascii_lowercase();
    if lower.ends_with(".jpg") {
        Some(format!("{}.jpeg", &source[..source.len() - 4]))
    } else if lower.ends_with(".jpeg") {
        Some(format!("{}.jpg", &source[..source.len() - 5]))
    } else {
        None
    }
}

/// What happened to an [`ImageSlot`] after a load failure was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// A different source was assigned, so a new load attempt follows.
    Retry(FallbackState),
    /// The computed source equals the one that just failed. Reassigning it does not trigger
    /// another load, so the element stays broken in this state.
    Stalled(FallbackState),
}

impl FallbackOutcome {
    /// State the slot ended up in.
    pub fn state(self) -> FallbackState {
        match self {
            Self::Retry(state) | Self::Stalled(state) => state,
        }
    }
}

/// Image state owned by whatever renders a single destination.
///
/// Each rendered element gets its own slot; slots are never shared between elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    display_name: String,
    source: String,
    marker: AttemptMarker,
    state: FallbackState,
}

impl ImageSlot {
    /// Create a slot showing `source` for an element labelled `display_name`.
    pub fn new(display_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            source: source.into(),
            marker: AttemptMarker::NotTried,
            state: FallbackState::Initial,
        }
    }

    /// Create a slot for a destination with its initial image source.
    pub fn for_destination(destination: &Destination, base: &AssetBase) -> Self {
        Self::new(destination.name.clone(), image_source(destination, base))
    }

    /// Source currently assigned to the element.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current attempt marker.
    pub fn marker(&self) -> AttemptMarker {
        self.marker
    }

    /// Current position in the fallback chain.
    pub fn state(&self) -> FallbackState {
        self.state
    }

    /// Display name the slug fallback is derived from.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Handle a load-failure event for the current source.
    pub fn on_load_failure(&mut self, base: &AssetBase) -> FallbackOutcome {
        let step = resolve_fallback(&self.source, self.marker, &self.display_name, base);
        let changed = step.source != self.source;

        debug!(
            name = %self.display_name,
            from = %self.source,
            to = %step.source,
            state = ?step.state,
            "image load failed"
        );

        self.source = step.source;
        self.marker = step.marker;
        self.state = step.state;

        if changed {
            FallbackOutcome::Retry(self.state)
        } else {
            warn!(
                name = %self.display_name,
                source = %self.source,
                "image fallback stalled on an unloadable source"
            );
            FallbackOutcome::Stalled(self.state)
        }
    }
}
