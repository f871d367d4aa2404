#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod backend;
pub mod config;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod store;
pub mod tags;

pub use asset_paths::{AssetBase, AttemptMarker, FallbackState, ImageSlot, resolve_fallback};
pub use backend::{DestinationBackend, HttpBackend};
pub use config::GalleryConfig;
pub use models::{Destination, RawRecord};
pub use store::{DestinationStore, LoadOutcome, RefreshOutcome};
