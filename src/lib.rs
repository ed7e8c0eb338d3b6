// Library exports for cover-builder

pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod pipeline;

pub use error::{CoverError, Result};
pub use pipeline::{
    BuildReport,
    CommandRasterizer,
    CoverBuilder,
    Rasterizer,
    ResvgRasterizer,
};
