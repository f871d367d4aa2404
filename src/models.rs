//! Backend record shapes and the canonical destination model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Destination entry as supplied by the backend, prior to normalisation.
///
/// Decoding is best-effort: missing fields fall back to defaults, string fields accept numbers and
/// booleans, and numeric fields are kept as raw JSON values without validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
  /// Backend identifier, passed through untouched.
  #[serde(default)]
  pub id: Value,
  /// Display name.
  #[serde(default, deserialize_with = "lenient_string")]
  pub name: Option<String>,
  /// State the destination belongs to.
  #[serde(default, deserialize_with = "lenient_string")]
  pub state: Option<String>,
  /// Broad region label.
  #[serde(default, deserialize_with = "lenient_string")]
  pub region: Option<String>,
  /// Latitude, passed through untouched.
  #[serde(default)]
  pub lat: Value,
  /// Longitude, passed through untouched.
  #[serde(default)]
  pub lon: Value,
  /// Free text summary.
  #[serde(default, deserialize_with = "lenient_string")]
  pub short_desc: Option<String>,
  /// Free text describing when to visit.
  #[serde(default, deserialize_with = "lenient_string")]
  pub best_months: Option<String>,
  /// Comma-joined tag string.
  #[serde(default, deserialize_with = "lenient_string")]
  pub tags: Option<String>,
  /// Hero image filename, possibly padded with whitespace.
  #[serde(default, deserialize_with = "lenient_string")]
  pub hero_image: Option<String>,
}

/// Response body of the destinations endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationsEnvelope {
  /// Records returned by the backend. Absent or `null` decodes as empty, and elements that are not
  /// records decode as blank ones.
  #[serde(default, deserialize_with = "lenient_records")]
  pub destinations: Vec<RawRecord>,
}

/// Normalised, display-ready destination.
///
/// Everything except [`Destination::expanded`] is fixed once the record has been normalised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
  /// Backend identifier.
  pub id: Value,
  /// Display name.
  pub name: String,
  /// State the destination belongs to.
  pub state: String,
  /// Broad region label.
  pub region: String,
  /// Latitude as supplied.
  pub lat: Value,
  /// Longitude as supplied.
  pub lon: Value,
  /// Summary text, taken from `short_desc`.
  pub summary: String,
  /// Best time to visit, taken from `best_months`.
  pub best_time: String,
  /// Raw comma-joined tag string as received.
  #[serde(skip)]
  pub(crate) tags_raw: String,
  /// Tags parsed once at normalisation.
  #[serde(rename = "tags")]
  pub(crate) tag_list: Vec<String>,
  /// Hero image filename, trimmed but not yet fully sanitised.
  pub image: String,
  /// UI-only flag toggled when the card is opened.
  pub expanded: bool,
}

impl Destination {
  /// Parsed tags in source order.
  pub fn tags(&self) -> &[String] {
    &self.tag_list
  }

  /// Comma-joined tag string as received from the backend.
  pub fn tags_raw(&self) -> &str {
    &self.tags_raw
  }

  /// Flip the expanded flag and return the new value.
  pub fn toggle_expanded(&mut self) -> bool {
    self.expanded = !self.expanded;
    self.expanded
  }

  /// Best-effort numeric read of the identifier.
  pub fn id_i64(&self) -> Option<i64> {
    self
      .id
      .as_i64()
      .or_else(|| self.id.as_str().and_then(|value| value.trim().parse().ok()))
  }

  /// Best-effort numeric read of the latitude.
  pub fn lat_f64(&self) -> Option<f64> {
    numeric_value(&self.lat)
  }

  /// Best-effort numeric read of the longitude.
  pub fn lon_f64(&self) -> Option<f64> {
    numeric_value(&self.lon)
  }
}

fn numeric_value(value: &Value) -> Option<f64> {
  value
    .as_f64()
    .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(coerce_string))
}

fn coerce_string(value: Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(text) => Some(text),
    Value::Number(number) => Some(number.to_string()),
    Value::Bool(flag) => Some(flag.to_string()),
    Value::Array(items) => Some(
      items
        .into_iter()
        .filter_map(coerce_string)
        .collect::<Vec<_>>()
        .join(","),
    ),
    other @ Value::Object(_) => Some(other.to_string()),
  }
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
  D: Deserializer<'de>,
{
  let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
  Ok(items.into_iter().map(coerce_record).collect())
}

fn coerce_record(value: Value) -> RawRecord {
  match value {
    record @ Value::Object(_) => serde_json::from_value(record).unwrap_or_default(),
    _ => RawRecord::default(),
  }
}
