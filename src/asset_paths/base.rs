use crate::asset_paths::sanitize_filename;
use crate::models::Destination;

const DEFAULT_ASSET_DIR: &str = "assets/images";
const DEFAULT_PLACEHOLDER: &str = "placeholder.jpg";

/// Fixed directory that every resolved image source lives under, plus the placeholder filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBase {
    dir: String,
    placeholder: String,
}

impl AssetBase {
    /// Create a base from a directory and placeholder filename.
    ///
    /// Backslashes are normalised to forward slashes and trailing slashes are dropped so joined
    /// sources never contain a doubled separator.
    pub fn new(dir: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let dir = dir.into().replace('\\', "/");
        Self {
            dir: dir.trim_end_matches('/').to_string(),
            placeholder: placeholder.into(),
        }
    }

    /// Directory prefix without a trailing slash.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Placeholder filename shown when no better candidate exists.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Produce `<dir>/<filename>`.
    pub fn join(&self, filename: &str) -> String {
        format!("{}/{}", self.dir, filename)
    }

    /// Full source of the placeholder asset.
    pub fn placeholder_source(&self) -> String {
        self.join(&self.placeholder)
    }
}

impl Default for AssetBase {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_DIR, DEFAULT_PLACEHOLDER)
    }
}

/// Initial image source for a destination, assigned before any load is attempted.
pub fn image_source(destination: &Destination, base: &AssetBase) -> String {
    base.join(&sanitize_filename(&destination.image))
}

#[cfg(test)]
mod tests {
    use super::{AssetBase, image_source};
    use crate::models::RawRecord;
    use crate::normalize::normalize_record;

    fn destination_with_image(image: &str) -> crate::models::Destination {
        normalize_record(RawRecord {
            name: Some("New York City".into()),
            hero_image: Some(image.into()),
            ..RawRecord::default()
        })
    }

    #[test]
    fn joins_sanitised_filename_onto_base() {
        let base = AssetBase::new("assets/images", "placeholder.jpg");
        let destination = destination_with_image("  New York City.jpg ");
        assert_eq!(image_source(&destination, &base), "assets/images/NewYorkCity.jpg");
    }

    #[test]
    fn empty_image_yields_bare_directory() {
        let base = AssetBase::default();
        let destination = destination_with_image("");
        assert_eq!(image_source(&destination, &base), "assets/images/");
    }

    #[test]
    fn normalises_trailing_and_windows_separators() {
        let base = AssetBase::new("static\\images//", "none.jpg");
        assert_eq!(base.dir(), "static/images");
        assert_eq!(base.join("a.jpg"), "static/images/a.jpg");
        assert_eq!(base.placeholder_source(), "static/images/none.jpg");
    }

    #[test]
    fn root_directory_keeps_leading_slash() {
        let base = AssetBase::new("/", "placeholder.jpg");
        assert_eq!(base.join("x.jpg"), "/x.jpg");
    }
}
