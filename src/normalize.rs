//! Mapping backend records into the canonical [`Destination`] model.

use crate::models::{Destination, RawRecord};
use crate::tags::split_tags;

/// Normalise a single backend record.
///
/// Field renames are fixed (`short_desc` becomes `summary`, `best_months` becomes `best_time`,
/// `hero_image` becomes `image`). The image filename is trimmed here; removing inner whitespace
/// happens when the image source is built. Numeric fields are passed through unchecked.
pub fn normalize_record(record: RawRecord) -> Destination {
  let tags_raw = record.tags.unwrap_or_default();
  let tag_list = split_tags(&tags_raw);

  Destination {
    id: record.id,
    name: record.name.unwrap_or_default(),
    state: record.state.unwrap_or_default(),
    region: record.region.unwrap_or_default(),
    lat: record.lat,
    lon: record.lon,
    summary: record.short_desc.unwrap_or_default(),
    best_time: record.best_months.unwrap_or_default(),
    tags_raw,
    tag_list,
    image: record
      .hero_image
      .as_deref()
      .unwrap_or_default()
      .trim()
      .to_string(),
    expanded: false,
  }
}

/// Normalise every record returned by a fetch, keeping order.
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<Destination> {
  records.into_iter().map(normalize_record).collect()
}
