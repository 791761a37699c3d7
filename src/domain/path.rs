use std::fmt::{Display, Formatter};

use lazy_regex::regex_is_match;

use crate::domain::error::PathError;

/// A dot-separated path addressing an element relative to the document root.
///
/// `devices.disk.driver` on a `<domain>` document addresses
/// `<domain><devices><disk><driver>`. Segments cannot contain literal dots
/// and there is no way to address attributes or a single element out of
/// repeated siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedPath {
    raw: String,
    segments: Vec<String>,
}

impl DottedPath {
    /// Split a path into its segments.
    ///
    /// Only emptiness of the whole path is checked here. Segment names are
    /// validated by the tree operations, which decide whether an invalid
    /// segment is fatal or not.
    ///
    /// # Arguments
    ///
    /// * `path`: The dotted path, e.g. `devices.disk.driver`
    ///
    /// returns: Result<DottedPath, PathError>
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments leading to the parent of the addressed element.
    pub fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The last segment, naming the addressed element itself.
    pub fn leaf(&self) -> &str {
        // parse() never produces an empty segment list
        &self.segments[self.segments.len() - 1]
    }

    /// The dotted prefix made of the first `len` segments.
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len].join(".")
    }

    /// Check that the segment at `index` is a plain element name.
    pub(crate) fn check_segment(&self, index: usize) -> Result<&str, PathError> {
        let segment = self.segments[index].as_str();
        if is_valid_segment(segment) {
            Ok(segment)
        } else {
            Err(PathError::InvalidSegment {
                path: self.raw.clone(),
                segment: segment.to_string(),
            })
        }
    }
}

impl Display for DottedPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether a segment can be used as an element name.
/// Namespace prefixes are not addressable.
pub fn is_valid_segment(segment: &str) -> bool {
    regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_\-]*$", segment)
}
