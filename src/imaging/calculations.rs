//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::rewrite::ImageRewrite;
use crate::size_class::SizeClass;

/// Scale dimensions so the longer edge equals `upper_bound`.
///
/// The shorter edge is scaled by the same ratio and truncated toward zero.
/// Square images use the width as the reference edge. Zero-sized originals
/// produce `(0, 0)`.
///
/// # Examples
/// ```
/// # use responsive_images::imaging::fit;
/// // 2000x1500 landscape within 1200 → 1200x900
/// assert_eq!(fit((2000, 1500), 1200), (1200, 900));
///
/// // 1000x3000 portrait within 600 → 200x600
/// assert_eq!(fit((1000, 3000), 600), (200, 600));
/// ```
pub fn fit(original: (u32, u32), upper_bound: u32) -> (u32, u32) {
    let (width, height) = original;
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = |edge: u32, reference: u32| -> u32 {
        (u64::from(edge) * u64::from(upper_bound) / u64::from(reference)) as u32
    };

    if width >= height {
        (upper_bound, scale(height, width))
    } else {
        (scale(width, height), upper_bound)
    }
}

/// A single variant to produce, with its computed dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedVariant {
    pub size_class: SizeClass,
    pub width: u32,
    pub height: u32,
}

/// Compute output dimensions for every rewrite, preserving order.
pub fn plan_variants(original: (u32, u32), rewrites: &[ImageRewrite]) -> Vec<PlannedVariant> {
    rewrites
        .iter()
        .map(|rewrite| {
            let (width, height) = fit(original, rewrite.size_class.upper_bound());
            PlannedVariant {
                size_class: rewrite.size_class,
                width,
                height,
            }
        })
        .collect()
}
