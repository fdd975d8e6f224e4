//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! 001 background (--background-img-url)
//!     Source: Resources/img/background.jpg
//!     extraSmall → img-optimized/background-extra-small.webp
//!     small → img-optimized/background-small.webp
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 background
//!     Source: Resources/img/background.jpg
//!     extraSmall: 600x400
//!     small: 900x600
//! ```

use crate::process::{PlannedImage, ProcessEvent, ProcessManifest};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// File name component of a site-relative path.
fn file_stem(source_path: &str) -> String {
    Path::new(source_path)
        .file_stem()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.to_string())
}

// ============================================================================
// plan
// ============================================================================

/// Format planned rewrites, one entry per source image.
pub fn format_plan(planned: &[PlannedImage]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, image) in planned.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            file_stem(&image.source_path),
            image.variable_name
        ));
        lines.push(format!("    Source: {}", image.source_path));
        for rewrite in &image.rewrites {
            lines.push(format!(
                "    {} \u{2192} {}",
                rewrite.size_class,
                rewrite.target.file_path()
            ));
        }
    }
    if planned.is_empty() {
        lines.push("No images found".to_string());
    }
    lines
}

pub fn print_plan(planned: &[PlannedImage]) {
    for line in format_plan(planned) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ImageProcessed {
            index,
            source_path,
            variants,
        } => {
            let mut lines = vec![
                format!("{} {}", format_index(*index), file_stem(source_path)),
                format!("    Source: {}", source_path),
            ];
            for variant in variants {
                lines.push(format!(
                    "    {}: {}x{}",
                    variant.size_class, variant.width, variant.height
                ));
            }
            lines
        }
        ProcessEvent::ImageFailed {
            index,
            source_path,
            error,
        } => vec![
            format!("{} {} (failed)", format_index(*index), file_stem(source_path)),
            format!("    Source: {}", source_path),
            format!("    Error: {}", error),
        ],
        ProcessEvent::ImageSkipped { source_path } => {
            vec![format!("Skipped: {}", source_path)]
        }
    }
}

/// Format the closing summary of a build.
pub fn format_build_summary(manifest: &ProcessManifest, output_dir: &Path) -> Vec<String> {
    let variant_count: usize = manifest.images.iter().map(|i| i.variants.len()).sum();
    let mut summary = format!(
        "Generated {} variants for {} images \u{2192} {}",
        variant_count,
        manifest.images.len(),
        output_dir.display()
    );
    if !manifest.skipped.is_empty() {
        summary.push_str(&format!(", {} skipped", manifest.skipped.len()));
    }
    if !manifest.failed.is_empty() {
        summary.push_str(&format!(", {} failed", manifest.failed.len()));
    }
    vec![summary]
}

pub fn print_build_summary(manifest: &ProcessManifest, output_dir: &Path) {
    for line in format_build_summary(manifest, output_dir) {
        println!("{}", line);
    }
}
