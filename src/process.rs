//! Variant generation for a directory of source images.
//!
//! Walks `<root>/<source_dir>`, builds an [`ImageConfiguration`] per file,
//! derives its rewrite records, and encodes one variant per record.
//!
//! ## Output Structure
//!
//! ```text
//! Output/
//! └── img-optimized/
//!     ├── background-extra-small.webp
//!     ├── background-small.webp
//!     ├── background-normal.webp
//!     ├── background-large.webp
//!     └── subfolder/                     # mirrors Resources/img/subfolder/
//!         └── sub-background-small.webp
//! ```
//!
//! ## Failure Handling
//!
//! Files without a recognized image extension are skipped. A file that fails
//! to decode or encode is recorded as failed; the remaining files are still
//! processed. A file whose variants would overwrite another file's (same base
//! name in the same directory) is recorded as failed and never resized. Only an unreadable source directory aborts the run.
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon).
//! Progress is reported through an optional channel of [`ProcessEvent`]s.

use crate::config::BuildConfig;
use crate::imaging::{
    BackendError, GeneratedVariant, ImageBackend, RustBackend, create_variants, get_dimensions,
};
use crate::location::AssetPath;
use crate::rewrite::{ImageConfiguration, ImageRewrite, rewrites};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Per-file failure: decoding, encoding or writing one image.
#[derive(Error, Debug)]
enum ImageError {
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("variant {variant} is already produced by {owner}")]
    Conflict { variant: String, owner: String },
}

/// Progress events emitted while processing.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    ImageProcessed {
        /// 1-based position among discovered images.
        index: usize,
        source_path: String,
        variants: Vec<GeneratedVariant>,
    },
    ImageSkipped {
        source_path: String,
    },
    ImageFailed {
        index: usize,
        source_path: String,
        error: String,
    },
}

/// Result of a processing run.
#[derive(Debug, Default, Serialize)]
pub struct ProcessManifest {
    pub images: Vec<ProcessedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedImage>,
}

#[derive(Debug, Serialize)]
pub struct ProcessedImage {
    /// Path relative to the site root, e.g. `Resources/img/background.jpg`.
    pub source_path: String,
    /// Original dimensions (width, height).
    pub dimensions: (u32, u32),
    pub variable_name: String,
    pub rewrites: Vec<ImageRewrite>,
    pub variants: Vec<GeneratedVariant>,
}

#[derive(Debug, Serialize)]
pub struct FailedImage {
    pub source_path: String,
    pub error: String,
}

/// A discovered source file and where its variants go.
#[derive(Debug)]
struct SourceImage {
    path: PathBuf,
    /// Site-relative source path, `/`-separated.
    source_path: String,
    /// Site-relative sub-directory below `source_dir`, `/`-separated.
    sub_dir: String,
}

/// Rewrite records for one source image, before any file is touched.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedImage {
    /// Path relative to the site root, e.g. `Resources/img/background.jpg`.
    pub source_path: String,
    pub variable_name: String,
    pub rewrites: Vec<ImageRewrite>,
}

/// Outcome of walking the source directory.
///
/// An image whose variants would overwrite those of an earlier image (same
/// base name and directory, e.g. `hero.png` and `hero.min.png`) carries a
/// [`ImageError::Conflict`] instead of a plan.
#[derive(Debug, Default)]
struct Discovery {
    images: Vec<(SourceImage, Result<PlannedImage, ImageError>)>,
    skipped: Vec<String>,
}

/// Rewrite records for every image below `<root>/<source_dir>`, without
/// decoding anything.
pub fn plan(root: &Path, config: &BuildConfig) -> Result<Vec<PlannedImage>, ProcessError> {
    let discovery = discover_images(root, config)?;
    for skipped in &discovery.skipped {
        warn!(source = %skipped, "skipping file without a supported image extension");
    }
    Ok(discovery
        .images
        .into_iter()
        .filter_map(|(source, planned)| match planned {
            Ok(planned) => Some(planned),
            Err(e) => {
                warn!(source = %source.source_path, error = %e, "image left out of plan");
                None
            }
        })
        .collect())
}

/// Process all images below `<root>/<source_dir>` into `<output_dir>/<target_dir>`.
pub fn process(
    root: &Path,
    output_dir: &Path,
    config: &BuildConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessManifest, ProcessError> {
    process_with_backend(&RustBackend::new(), root, output_dir, config, events)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    output_dir: &Path,
    config: &BuildConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessManifest, ProcessError> {
    let discovery = discover_images(root, config)?;

    for skipped in &discovery.skipped {
        warn!(source = %skipped, "skipping file without a supported image extension");
        emit(
            &events,
            ProcessEvent::ImageSkipped {
                source_path: skipped.clone(),
            },
        );
    }

    let results: Vec<Result<ProcessedImage, FailedImage>> = discovery
        .images
        .par_iter()
        .enumerate()
        .map(|(i, (source, planned))| {
            let index = i + 1;
            let variant_dir = output_dir.join(&config.target_dir).join(&source.sub_dir);
            let outcome = match planned {
                Ok(planned) => process_image(backend, source, &variant_dir, planned)
                    .map_err(|e| e.to_string()),
                Err(conflict) => Err(conflict.to_string()),
            };
            match outcome {
                Ok(processed) => {
                    emit(
                        &events,
                        ProcessEvent::ImageProcessed {
                            index,
                            source_path: processed.source_path.clone(),
                            variants: processed.variants.clone(),
                        },
                    );
                    Ok(processed)
                }
                Err(e) => {
                    warn!(source = %source.source_path, error = %e, "image processing failed");
                    emit(
                        &events,
                        ProcessEvent::ImageFailed {
                            index,
                            source_path: source.source_path.clone(),
                            error: e.clone(),
                        },
                    );
                    Err(FailedImage {
                        source_path: source.source_path.clone(),
                        error: e,
                    })
                }
            }
        })
        .collect();

    let mut manifest = ProcessManifest {
        skipped: discovery.skipped,
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(processed) => manifest.images.push(processed),
            Err(failed) => manifest.failed.push(failed),
        }
    }

    Ok(manifest)
}

fn process_image(
    backend: &impl ImageBackend,
    source: &SourceImage,
    variant_dir: &Path,
    planned: &PlannedImage,
) -> Result<ProcessedImage, ImageError> {
    debug!(source = %source.source_path, variants = planned.rewrites.len(), "processing image");

    let dimensions = get_dimensions(backend, &source.path)?;
    std::fs::create_dir_all(variant_dir)?;
    let variants = create_variants(
        backend,
        &source.path,
        variant_dir,
        &planned.rewrites,
        dimensions,
    )?;

    Ok(ProcessedImage {
        source_path: planned.source_path.clone(),
        dimensions,
        variable_name: planned.variable_name.clone(),
        rewrites: planned.rewrites.clone(),
        variants,
    })
}

/// Walk the source directory and derive rewrite records per image.
fn discover_images(root: &Path, config: &BuildConfig) -> Result<Discovery, ProcessError> {
    let source_root = root.join(&config.source_dir);
    if !source_root.is_dir() {
        return Err(ProcessError::SourceNotFound(source_root));
    }

    let source_dir = AssetPath::new(&config.source_dir);
    let target_dir = AssetPath::new(&config.target_dir);
    let mut discovery = Discovery::default();
    // Variant file path -> source that claimed it first.
    let mut claimed: HashMap<String, String> = HashMap::new();

    for source in discover(&source_root, &config.source_dir)? {
        let Some(image_config) =
            ImageConfiguration::new(&source.path, config.target_format, config.sizes.clone())
        else {
            discovery.skipped.push(source.source_path);
            continue;
        };

        let records = rewrites(
            &source_dir.join(&source.sub_dir),
            &target_dir.join(&source.sub_dir),
            &image_config,
        );
        let collision = records.iter().find_map(|r| {
            let variant = r.target.file_path();
            claimed.get(&variant).map(|owner| ImageError::Conflict {
                variant,
                owner: owner.clone(),
            })
        });
        if let Some(conflict) = collision {
            discovery.images.push((source, Err(conflict)));
            continue;
        }
        for record in &records {
            claimed.insert(record.target.file_path(), source.source_path.clone());
        }

        let planned = PlannedImage {
            source_path: source.source_path.clone(),
            variable_name: records
                .first()
                .map(ImageRewrite::variable_name)
                .unwrap_or_default(),
            rewrites: records,
        };
        discovery.images.push((source, Ok(planned)));
    }

    Ok(discovery)
}

/// All files below `source_root`, sorted by name within each directory.
fn discover(source_root: &Path, source_dir: &str) -> Result<Vec<SourceImage>, ProcessError> {
    let public_root = AssetPath::new(source_dir);
    let mut found = Vec::new();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let relative = path.strip_prefix(source_root).unwrap_or(&path);
        let sub_dir = relative
            .parent()
            .map(slash_joined)
            .unwrap_or_default();
        let source_path = public_root.join(&slash_joined(relative)).as_str();

        found.push(SourceImage {
            path,
            source_path,
            sub_dir,
        });
    }

    Ok(found)
}

fn slash_joined(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is printing progress.
        let _ = tx.send(event);
    }
}
