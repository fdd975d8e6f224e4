//! Image processing in pure Rust on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize → variant** | Lanczos3 + per-format encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{PlannedVariant, fit, plan_variants};
pub use operations::{
    GeneratedVariant, create_variants, get_dimensions, plan_resizes, resize_deferred,
};
pub use params::ResizeParams;
pub use rust_backend::RustBackend;
