//! Normalized asset paths and the containment relation between them.
//!
//! The same optimized image is referenced from many places: a stylesheet
//! three directories deep, a page at the site root, a rewrite record built
//! from the source tree. [`AssetLocation::containment`] answers whether two
//! such references name the same asset and which path prefix turns one into
//! the other.
//!
//! ## Normalization
//!
//! [`AssetPath`] keeps two things from a raw path string:
//!
//! - whether it was absolute (leading `/`)
//! - the relative remainder: all leading slashes removed, then exactly one
//!   trailing slash removed
//!
//! ```text
//! "Resources/img/"   → relative, "Resources/img"
//! "/img-optimized"   → absolute, "img-optimized"
//! "//img//"          → absolute, "img/"
//! ```
//!
//! Equality and containment only ever look at the normalized form.

use crate::format::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directory path in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct AssetPath {
    absolute: bool,
    relative: String,
}

impl AssetPath {
    pub fn new(raw: &str) -> Self {
        let absolute = raw.starts_with('/');
        let stripped = raw.trim_start_matches('/');
        let relative = stripped.strip_suffix('/').unwrap_or(stripped);
        Self {
            absolute,
            relative: relative.to_string(),
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// The path with leading slashes removed.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// The path as written: the remainder, with a leading `/` when absolute.
    pub fn as_str(&self) -> String {
        if self.absolute {
            format!("/{}", self.relative)
        } else {
            self.relative.clone()
        }
    }

    /// The remainder with a leading `/`, regardless of absoluteness.
    pub fn absolute_string(&self) -> String {
        format!("/{}", self.relative)
    }

    pub fn is_empty(&self) -> bool {
        self.relative.is_empty()
    }

    /// Non-empty `/`-separated components.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative.split('/').filter(|s| !s.is_empty())
    }

    /// Append a relative path, keeping this path's absoluteness.
    pub fn join(&self, child: &str) -> AssetPath {
        let child = AssetPath::new(child);
        if child.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return AssetPath {
                absolute: self.absolute,
                relative: child.relative,
            };
        }
        AssetPath {
            absolute: self.absolute,
            relative: format!("{}/{}", self.relative, child.relative),
        }
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl From<&str> for AssetPath {
    fn from(raw: &str) -> Self {
        AssetPath::new(raw)
    }
}

impl From<String> for AssetPath {
    fn from(raw: String) -> Self {
        AssetPath::new(&raw)
    }
}

impl From<AssetPath> for String {
    fn from(path: AssetPath) -> Self {
        path.as_str()
    }
}

/// Prefix that converts one location's directory into another's.
///
/// Non-empty deltas always end with `/` so they can be prepended to a file
/// path directly. An empty delta means "same location".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PathDelta(String);

impl PathDelta {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prepend this delta to `path`.
    pub fn apply(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

impl fmt::Display for PathDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a file name into its base name and format.
///
/// The base name is the text before the first `.`, the format the text after
/// the last `.`. Returns `None` for an empty base name, a missing extension,
/// or an unrecognized format.
pub fn split_file_name(file_name: &str) -> Option<(&str, ImageFormat)> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let base = file_name.split('.').next()?;
    if base.is_empty() {
        return None;
    }
    let format = extension.parse().ok()?;
    Some((base, format))
}

/// Identity of an image file: directory, base name, format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetLocation {
    pub path: AssetPath,
    /// File name without extension, including any size suffix.
    pub file_name: String,
    pub format: ImageFormat,
}

impl AssetLocation {
    pub fn new(path: impl Into<AssetPath>, file_name: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            format,
        }
    }

    /// Parse a referenced file path such as `../img/background.jpg`.
    pub fn parse(file_path: &str) -> Option<Self> {
        let (dir, file) = file_path.rsplit_once('/').unwrap_or(("", file_path));
        let (base, format) = split_file_name(file)?;
        let dir = if dir.is_empty() && file_path.starts_with('/') {
            "/"
        } else {
            dir
        };
        Some(Self::new(dir, base, format))
    }

    /// File name with extension, e.g. `background-small.webp`.
    pub fn full_file_name(&self) -> String {
        format!("{}.{}", self.file_name, self.format)
    }

    /// Directory and file name joined, e.g. `img-optimized/background-small.webp`.
    pub fn file_path(&self) -> String {
        if self.path.is_empty() {
            if self.path.is_absolute() {
                format!("/{}", self.full_file_name())
            } else {
                self.full_file_name()
            }
        } else {
            format!("{}/{}", self.path, self.full_file_name())
        }
    }

    /// Relate this location to `other` when both name the same asset.
    ///
    /// Returns `None` when base name or format differ. Otherwise the two
    /// directories are compared from their ends: the longest common trailing
    /// run (character-wise, so partial segments count) is removed from the
    /// longer one and what remains is the delta.
    ///
    /// `self` must be the path at least as long as `other`; the comparison is
    /// not symmetric and a shorter `self` always yields `None`.
    ///
    /// The delta loses its leading `/` when `other` is relative, whatever
    /// `self` is. The Publish plugin this model comes from keys that on
    /// `self` instead, so mixed pairs differ: `site/Resources/img` against
    /// `/img` gives `/site/Resources/` here and `site/Resources/` there.
    ///
    /// ```
    /// # use responsive_images::{AssetLocation, ImageFormat};
    /// let deep = AssetLocation::new("Resources/img", "background", ImageFormat::Jpg);
    /// let root = AssetLocation::new("img", "background", ImageFormat::Jpg);
    /// assert_eq!(deep.containment(&root).unwrap().as_str(), "Resources/");
    /// assert!(root.containment(&deep).is_none());
    /// ```
    pub fn containment(&self, other: &AssetLocation) -> Option<PathDelta> {
        if self.file_name != other.file_name || self.format != other.format {
            return None;
        }
        if self.path.as_str().chars().count() < other.path.as_str().chars().count() {
            return None;
        }

        let own: Vec<char> = self.path.absolute_string().chars().collect();
        let theirs: Vec<char> = other.path.absolute_string().chars().collect();
        if own.len() == theirs.len() {
            return Some(PathDelta::default());
        }

        let (longer, shorter) = if own.len() > theirs.len() {
            (&own, &theirs)
        } else {
            (&theirs, &own)
        };
        let common = longer
            .iter()
            .rev()
            .zip(shorter.iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        let mut delta: String = longer[..longer.len() - common].iter().collect();
        if !other.path.is_absolute() && !delta.is_empty() {
            delta.remove(0);
        }
        delta.push('/');
        Some(PathDelta(delta))
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_path())
    }
}
