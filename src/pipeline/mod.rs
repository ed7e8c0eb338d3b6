pub mod builder;
pub mod fs_ops;
pub mod rasterizer;
pub mod svg_render;

pub use builder::{BuildReport, CoverBuilder, EntryOutcome};
pub use rasterizer::{CommandRasterizer, Rasterizer};
pub use svg_render::ResvgRasterizer;
