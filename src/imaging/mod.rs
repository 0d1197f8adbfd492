//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory_with_format` |
//! | **Resize** | Lanczos3, width-constrained, aspect preserved |
//! | **Encode** | `image` JPEG/PNG encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`Quality`]
//! - **Backend**: [`ImageTransform`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{ImageTransform, TransformError};
pub use calculations::scaled_dimensions;
pub use params::Quality;
pub use rust_backend::RustBackend;
