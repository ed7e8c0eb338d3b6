// In-process SVG rasterization with resvg, for machines without rsvg-convert.

use anyhow::{Context, anyhow};
use image::{ImageFormat, Rgba, RgbaImage};
use log::trace;
use std::path::Path;
use std::sync::Arc;

use super::rasterizer::Rasterizer;
use crate::error::{CoverError, Result};

const MAX_DIM: u32 = 16_384;

pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    fn parse(&self, input: &Path) -> anyhow::Result<usvg::Tree> {
        let data = std::fs::read(input)
            .with_context(|| format!("failed to read {}", input.display()))?;

        let options = usvg::Options {
            resources_dir: input
                .canonicalize()
                .ok()
                .and_then(|p| p.parent().map(Path::to_path_buf)),
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };

        usvg::Tree::from_data(&data, &options)
            .with_context(|| format!("failed to parse {}", input.display()))
    }
}

/// Renders `tree` stretched to exactly `width`x`height`, like `rsvg-convert -w -h`.
pub fn render_to_image(tree: &usvg::Tree, width: u32, height: u32) -> anyhow::Result<RgbaImage> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(anyhow!(
            "raster size {width}x{height} out of range (max {MAX_DIM}x{MAX_DIM})"
        ));
    }

    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() {
        return Err(anyhow!("svg has invalid width/height"));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("failed to allocate {width}x{height} pixmap"))?;

    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut image = RgbaImage::new(width, height);
    for (dst, px) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = px.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(image)
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &str {
        "resvg"
    }

    fn probe(&self) -> Result<String> {
        Ok(format!("resvg (built-in, {} font faces)", self.fontdb.len()))
    }

    fn rasterize(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()> {
        trace!("resvg {} -> {} at {}x{}", input.display(), output.display(), width, height);

        let tree = self.parse(input).map_err(CoverError::Render)?;
        let image = render_to_image(&tree, width, height).map_err(CoverError::Render)?;
        image
            .save_with_format(output, ImageFormat::Png)
            .with_context(|| format!("failed to write {}", output.display()))
            .map_err(CoverError::Render)?;
        Ok(())
    }
}
