pub mod cover;

pub use cover::{CoverEntry, CoverManifest};
