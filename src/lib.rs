//! # Responsive Images
//!
//! Size-class image variants for static sites. Every source image is resized
//! once per size class, and a rewrite record tells downstream CSS and markup
//! rewriters which variant replaces which source reference.
//!
//! # Size Classes
//!
//! | Class | Longer edge | Served from viewport width |
//! |-------|-------------|----------------------------|
//! | `extraSmall` | 600px | 0 |
//! | `small` | 900px | 600px |
//! | `normal` | 1200px | 900px |
//! | `large` | 1800px | 1200px |
//!
//! ```text
//! Resources/img/background.jpg
//!   ├── img-optimized/background-extra-small.webp
//!   ├── img-optimized/background-small.webp
//!   ├── img-optimized/background-normal.webp
//!   └── img-optimized/background-large.webp
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`size_class`] | Breakpoint buckets and dimension classification |
//! | [`format`] | Supported image formats and their encoder settings |
//! | [`location`] | Normalized directory paths, asset identity, containment |
//! | [`rewrite`] | Per-image configuration expanded into rewrite records |
//! | [`case`] | camelCase → kebab/snake conversion for file suffixes |
//! | [`imaging`] | Dimension math, the [`imaging::ImageBackend`] trait, pure-Rust backend |
//! | [`deferred`] | Cancellable, time-bounded results delivered from worker threads |
//! | [`process`] | Directory walk and parallel variant generation |
//! | [`substitution`] | CSS custom properties and `srcset`/`sizes` from rewrite records |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Example
//!
//! ```
//! use responsive_images::{AssetPath, ImageConfiguration, ImageFormat, SizeClass, rewrites};
//! use std::path::Path;
//!
//! let config = ImageConfiguration::new(
//!     Path::new("Resources/img/background.jpg"),
//!     ImageFormat::Webp,
//!     SizeClass::ALL.to_vec(),
//! )
//! .unwrap();
//! let records = rewrites(
//!     &AssetPath::new("Resources/img"),
//!     &AssetPath::new("img-optimized"),
//!     &config,
//! );
//! assert_eq!(records.len(), 4);
//! assert_eq!(records[0].target.file_path(), "img-optimized/background-extra-small.webp");
//! assert_eq!(records[0].variable_name(), "--background-img-url");
//! ```

pub mod case;
pub mod config;
pub mod deferred;
pub mod format;
pub mod imaging;
pub mod location;
pub mod output;
pub mod process;
pub mod rewrite;
pub mod size_class;
pub mod substitution;

pub use case::{CaseStyle, change_case};
pub use deferred::{Deferred, DeferredError, Resolver, deferred};
pub use format::{EncodeParams, ImageFormat};
pub use location::{AssetLocation, AssetPath, PathDelta};
pub use rewrite::{ImageConfiguration, ImageRewrite, rewrites};
pub use size_class::SizeClass;
