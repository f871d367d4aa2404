//! Helpers for building hero image sources and recovering from failed image loads.
//!
//! The responsibilities are split into focused submodules: cleaning filenames and display
//! names, joining them onto the configured asset directory, and the per-element fallback state
//! machine that picks the next source after a load failure. Each piece is pure so it can be
//! tested without a rendering surface.

mod base;
mod candidates;
mod fallback;
mod sanitize;

pub use base::{AssetBase, image_source};
pub use candidates::fallback_candidates;
pub use fallback::{
    AttemptMarker, FallbackOutcome, FallbackState, FallbackStep, ImageSlot, resolve_fallback,
};
pub use sanitize::{display_name_slug, sanitize_filename};
