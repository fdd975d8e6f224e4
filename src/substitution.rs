//! Substitution data rendered from rewrite records.
//!
//! Two outputs, both built only from [`ImageRewrite`]s (no CSS or HTML is
//! parsed here):
//!
//! - **CSS custom properties**: one `:root` block per size class, wrapped in a
//!   `min-width` media query for every class above the smallest. A stylesheet
//!   then uses `background-image: var(--background-img-url)`.
//! - **`srcset` / `sizes`** attribute values for `<img>` tags.
//!
//! ```text
//! :root {
//!     --background-img-url: url("img-optimized/background-extra-small.webp");
//! }
//!
//! @media (min-width: 600px) {
//!     :root {
//!         --background-img-url: url("img-optimized/background-small.webp");
//!     }
//! }
//! ```

use crate::location::{AssetLocation, PathDelta};
use crate::rewrite::ImageRewrite;

fn sorted_by_size(rewrites: &[ImageRewrite]) -> Vec<&ImageRewrite> {
    let mut sorted: Vec<&ImageRewrite> = rewrites.iter().collect();
    sorted.sort_by_key(|r| r.size_class);
    sorted
}

/// Render custom-property blocks, smallest size class first.
///
/// `url_prefix` is prepended to every target file path, e.g. `"../"` for a
/// stylesheet one directory below the site root.
pub fn css_custom_properties(rewrites: &[ImageRewrite], url_prefix: &str) -> String {
    sorted_by_size(rewrites)
        .into_iter()
        .map(|rewrite| {
            let declaration = format!(
                "{}: url(\"{}{}\");",
                rewrite.variable_name(),
                url_prefix,
                rewrite.target.file_path()
            );
            match rewrite.size_class.min_width() {
                0 => format!(":root {{\n    {declaration}\n}}"),
                min => format!(
                    "@media (min-width: {min}px) {{\n    :root {{\n        {declaration}\n    }}\n}}"
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a `srcset` value: `<url> <bound>w` entries, smallest first.
pub fn srcset(rewrites: &[ImageRewrite], url_prefix: &str) -> String {
    sorted_by_size(rewrites)
        .into_iter()
        .map(|r| {
            format!(
                "{}{} {}w",
                url_prefix,
                r.target.file_path(),
                r.size_class.upper_bound()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a `sizes` value matching [`srcset`]; the largest bound is the default.
pub fn sizes_attribute(rewrites: &[ImageRewrite]) -> String {
    let sorted = sorted_by_size(rewrites);
    let Some((largest, rest)) = sorted.split_last() else {
        return String::new();
    };
    rest.iter()
        .map(|r| {
            let bound = r.size_class.upper_bound();
            format!("(max-width: {bound}px) {bound}px")
        })
        .chain(std::iter::once(format!("{}px", largest.size_class.upper_bound())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrites whose source is the asset `reference` points at, with the delta
/// from the reference's directory to the rewrite source.
pub fn matching_rewrites<'a>(
    reference: &AssetLocation,
    rewrites: &'a [ImageRewrite],
) -> Vec<(&'a ImageRewrite, PathDelta)> {
    rewrites
        .iter()
        .filter_map(|rewrite| rewrite.relation_to(reference).map(|delta| (rewrite, delta)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ImageFormat;
    use crate::location::AssetPath;
    use crate::rewrite::{ImageConfiguration, rewrites};
    use crate::size_class::SizeClass;
    use std::path::Path;

    fn background(sizes: Vec<SizeClass>) -> Vec<ImageRewrite> {
        let config =
            ImageConfiguration::new(Path::new("Resources/img/background.jpg"), ImageFormat::Webp, sizes)
                .unwrap();
        rewrites(
            &AssetPath::new("Resources/img"),
            &AssetPath::new("img-optimized"),
            &config,
        )
    }

    #[test]
    fn css_smallest_class_is_unconditional() {
        let css = css_custom_properties(&background(vec![SizeClass::ExtraSmall]), "");
        assert_eq!(
            css,
            ":root {\n    --background-img-url: url(\"img-optimized/background-extra-small.webp\");\n}"
        );
    }

    #[test]
    fn css_larger_classes_use_min_width_queries() {
        let css = css_custom_properties(&background(vec![SizeClass::Large, SizeClass::Small]), "../");
        let expected = "@media (min-width: 600px) {\n    :root {\n        --background-img-url: url(\"../img-optimized/background-small.webp\");\n    }\n}\n\n@media (min-width: 1200px) {\n    :root {\n        --background-img-url: url(\"../img-optimized/background-large.webp\");\n    }\n}";
        assert_eq!(css, expected);
    }

    #[test]
    fn css_uses_variable_suffix() {
        let rewrites: Vec<ImageRewrite> = background(vec![SizeClass::Normal])
            .into_iter()
            .map(|r| r.with_variable_suffix("hero"))
            .collect();
        assert!(css_custom_properties(&rewrites, "").contains("--background-hero-img-url"));
    }

    #[test]
    fn srcset_lists_all_classes_smallest_first() {
        let value = srcset(&background(vec![SizeClass::Normal, SizeClass::ExtraSmall]), "/");
        assert_eq!(
            value,
            "/img-optimized/background-extra-small.webp 600w, /img-optimized/background-normal.webp 1200w"
        );
    }

    #[test]
    fn sizes_attribute_ends_with_largest_bound() {
        assert_eq!(
            sizes_attribute(&background(SizeClass::ALL.to_vec())),
            "(max-width: 600px) 600px, (max-width: 900px) 900px, (max-width: 1200px) 1200px, 1800px"
        );
        assert_eq!(sizes_attribute(&background(vec![SizeClass::Small])), "900px");
        assert_eq!(sizes_attribute(&[]), "");
    }

    #[test]
    fn matching_rewrites_pairs_records_with_delta() {
        let all = background(SizeClass::ALL.to_vec());
        let reference = AssetLocation::parse("Output/Resources/img/background.jpg").unwrap();
        let matches = matching_rewrites(&reference, &all);
        assert_eq!(matches.len(), 4);
        assert!(matches.iter().all(|(_, delta)| delta.as_str() == "Output/"));

        let other = AssetLocation::parse("Output/Resources/img/sub-background.jpg").unwrap();
        assert!(matching_rewrites(&other, &all).is_empty());
    }
}
