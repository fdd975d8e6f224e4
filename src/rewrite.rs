//! Rewrite records: which variant replaces which source reference.
//!
//! An [`ImageConfiguration`] describes what to produce for one source image;
//! [`rewrites`] expands it into one [`ImageRewrite`] per requested size class.
//! Records are pure data. Resizing and writing files is driven from them by
//! [`crate::imaging::operations`].

use crate::format::ImageFormat;
use crate::location::{AssetLocation, AssetPath, split_file_name};
use crate::size_class::SizeClass;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Desired transformation of one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfiguration {
    pub source: PathBuf,
    /// Base file name, without extension.
    pub file_name: String,
    pub format: ImageFormat,
    pub target_format: ImageFormat,
    pub target_sizes: Vec<SizeClass>,
}

impl ImageConfiguration {
    /// Returns `None` when the file name has no recognized image extension.
    pub fn new(
        source: &Path,
        target_format: ImageFormat,
        target_sizes: Vec<SizeClass>,
    ) -> Option<Self> {
        let name = source.file_name()?.to_str()?;
        let (file_name, format) = split_file_name(name)?;
        Some(Self {
            source: source.to_path_buf(),
            file_name: file_name.to_string(),
            format,
            target_format,
            target_sizes,
        })
    }

    /// Variant file name for a size class, e.g. `background-extra-small`.
    pub fn file_name_for(&self, size: SizeClass) -> String {
        format!("{}-{}", self.file_name, size.file_suffix())
    }
}

/// One source reference paired with the variant that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRewrite {
    pub source: AssetLocation,
    pub target: AssetLocation,
    pub size_class: SizeClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_name_suffix: Option<String>,
}

impl ImageRewrite {
    pub fn new(source: AssetLocation, target: AssetLocation, size_class: SizeClass) -> Self {
        Self {
            source,
            target,
            size_class,
            variable_name_suffix: None,
        }
    }

    /// Disambiguate the variable name when several rewrites share a base name.
    pub fn with_variable_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.variable_name_suffix = Some(suffix.into());
        self
    }

    /// CSS custom property carrying the variant URL: `--<name>[-<suffix>]-img-url`.
    pub fn variable_name(&self) -> String {
        match &self.variable_name_suffix {
            Some(suffix) => format!("--{}-{}-img-url", self.source.file_name, suffix),
            None => format!("--{}-img-url", self.source.file_name),
        }
    }

    /// Delta from a reference to this record's source, if they name the same asset.
    ///
    /// The reference is expected to be written with the longer directory
    /// path (see [`AssetLocation::containment`]).
    pub fn relation_to(&self, reference: &AssetLocation) -> Option<crate::location::PathDelta> {
        reference.containment(&self.source)
    }
}

/// Expand a configuration into one record per target size, in order.
pub fn rewrites(
    source_dir: &AssetPath,
    target_dir: &AssetPath,
    config: &ImageConfiguration,
) -> Vec<ImageRewrite> {
    config
        .target_sizes
        .iter()
        .map(|&size| {
            ImageRewrite::new(
                AssetLocation::new(source_dir.clone(), config.file_name.clone(), config.format),
                AssetLocation::new(
                    target_dir.clone(),
                    config.file_name_for(size),
                    config.target_format,
                ),
                size,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background_config(sizes: Vec<SizeClass>) -> ImageConfiguration {
        ImageConfiguration::new(
            Path::new("/site/Resources/img/background.jpg"),
            ImageFormat::Webp,
            sizes,
        )
        .unwrap()
    }

    fn rewrites_for_bounds(bounds: &[u32]) -> Vec<ImageRewrite> {
        bounds
            .iter()
            .flat_map(|&bound| {
                rewrites(
                    &AssetPath::new("Resources/img"),
                    &AssetPath::new("img-optimized"),
                    &background_config(vec![SizeClass::from_upper_bound(bound)]),
                )
            })
            .collect()
    }

    // =========================================================================
    // ImageConfiguration
    // =========================================================================

    #[test]
    fn configuration_parses_name_and_format() {
        let config = background_config(vec![]);
        assert_eq!(config.file_name, "background");
        assert_eq!(config.format, ImageFormat::Jpg);
        assert_eq!(config.target_format, ImageFormat::Webp);
    }

    #[test]
    fn configuration_rejects_unsupported_files() {
        for name in ["img/icons/favicon.ico", "img/README", "img/.jpg"] {
            assert!(
                ImageConfiguration::new(Path::new(name), ImageFormat::Webp, vec![]).is_none(),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn file_name_for_appends_kebab_suffix() {
        let config = background_config(vec![]);
        assert_eq!(config.file_name_for(SizeClass::ExtraSmall), "background-extra-small");
        assert_eq!(config.file_name_for(SizeClass::Large), "background-large");
    }

    // =========================================================================
    // rewrites
    // =========================================================================

    #[test]
    fn upper_bound_1200_yields_single_normal_record() {
        let expected = vec![ImageRewrite::new(
            AssetLocation::new("Resources/img", "background", ImageFormat::Jpg),
            AssetLocation::new("img-optimized", "background-normal", ImageFormat::Webp),
            SizeClass::Normal,
        )];
        assert_eq!(rewrites_for_bounds(&[1200]), expected);
    }

    #[test]
    fn upper_bound_600_yields_single_extra_small_record() {
        let expected = vec![ImageRewrite::new(
            AssetLocation::new("Resources/img", "background", ImageFormat::Jpg),
            AssetLocation::new("img-optimized", "background-extra-small", ImageFormat::Webp),
            SizeClass::ExtraSmall,
        )];
        assert_eq!(rewrites_for_bounds(&[600]), expected);
    }

    #[test]
    fn trailing_slash_in_source_dir_is_irrelevant() {
        let expected = ImageRewrite::new(
            AssetLocation::new("Resources/img/", "background", ImageFormat::Jpg),
            AssetLocation::new("img-optimized", "background-normal", ImageFormat::Webp),
            SizeClass::Normal,
        );
        assert_eq!(rewrites_for_bounds(&[1200]), vec![expected]);
    }

    #[test]
    fn absolute_target_dir_is_a_different_record() {
        let absolute = ImageRewrite::new(
            AssetLocation::new("Resources/img", "background", ImageFormat::Jpg),
            AssetLocation::new("/img-optimized", "background-normal", ImageFormat::Webp),
            SizeClass::Normal,
        );
        assert_ne!(rewrites_for_bounds(&[1200]), vec![absolute]);
    }

    #[test]
    fn all_size_classes_in_order() {
        let records = rewrites(
            &AssetPath::new("Resources/img"),
            &AssetPath::new("img-optimized"),
            &background_config(SizeClass::ALL.to_vec()),
        );
        let names: Vec<&str> = records.iter().map(|r| r.target.file_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "background-extra-small",
                "background-small",
                "background-normal",
                "background-large"
            ]
        );
        assert!(records.iter().all(|r| r.target.format == ImageFormat::Webp));
        let classes: Vec<SizeClass> = records.iter().map(|r| r.size_class).collect();
        assert_eq!(classes, SizeClass::ALL);
    }

    #[test]
    fn order_follows_configuration_not_size() {
        let records = rewrites(
            &AssetPath::new("img"),
            &AssetPath::new("out"),
            &background_config(vec![SizeClass::Large, SizeClass::ExtraSmall]),
        );
        assert_eq!(records[0].size_class, SizeClass::Large);
        assert_eq!(records[1].size_class, SizeClass::ExtraSmall);
    }

    // =========================================================================
    // Variable names and relations
    // =========================================================================

    #[test]
    fn variable_name_without_suffix() {
        let record = &rewrites_for_bounds(&[900])[0];
        assert_eq!(record.variable_name(), "--background-img-url");
    }

    #[test]
    fn variable_name_with_suffix() {
        let record = rewrites_for_bounds(&[900]).remove(0).with_variable_suffix("hero");
        assert_eq!(record.variable_name(), "--background-hero-img-url");
    }

    #[test]
    fn relation_to_deeper_reference() {
        let record = &rewrites_for_bounds(&[900])[0];
        let reference = AssetLocation::parse("build/Resources/img/background.jpg").unwrap();
        assert_eq!(record.relation_to(&reference).unwrap().as_str(), "build/");

        let unrelated = AssetLocation::parse("build/Resources/img/hero.jpg").unwrap();
        assert!(record.relation_to(&unrelated).is_none());
    }
}
