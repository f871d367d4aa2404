use std::collections::BTreeSet;

use crate::asset_paths::{AssetBase, FallbackOutcome, ImageSlot};
use crate::models::Destination;

/// List the distinct sources the fallback chain can assign for a destination.
///
/// The list is produced by driving an [`ImageSlot`] through successive failures until it stalls,
/// so it contains exactly the reachable candidates: the placeholder only shows up when the display
/// name yields an empty slug. Each source appears once, at its first assignment. A chain that
/// retries a source it already showed (the slug path matching the initial filename) still lists
/// that source only once.
pub fn fallback_candidates(destination: &Destination, base: &AssetBase) -> Vec<String> {
    let mut slot = ImageSlot::for_destination(destination, base);
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();

    push_unique(&mut seen, &mut result, slot.source());
    // Once the marker is set the resolver output is fixed, so this ends after at most two retries.
    while let FallbackOutcome::Retry(_) = slot.on_load_failure(base) {
        push_unique(&mut seen, &mut result, slot.source());
    }

    result
}

fn push_unique(seen: &mut BTreeSet<String>, result: &mut Vec<String>, candidate: &str) {
    if seen.insert(candidate.to_string()) {
        result.push(candidate.to_string());
    }
}
