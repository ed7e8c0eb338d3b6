use log::debug;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::cover::CoverManifest;
use crate::pipeline::builder::CoverBuilder;
use crate::pipeline::rasterizer::{CommandRasterizer, DEFAULT_PROGRAM, Rasterizer};
use crate::pipeline::svg_render::ResvgRasterizer;

pub const ASSETS_SUBDIR: &str = "assets/cover";
pub const OUTPUT_SUBDIR: &str = "output";
pub const MANIFEST_FILE: &str = "covers.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    RsvgConvert,
    Resvg,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub root: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub backend: Backend,
    pub program: String,
    pub program_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            assets_dir: None,
            output_dir: None,
            manifest_path: None,
            backend: Backend::default(),
            program: DEFAULT_PROGRAM.to_string(),
            program_args: Vec::new(),
        }
    }
}

impl Config {
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| self.root.join(ASSETS_SUBDIR))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.root.join(OUTPUT_SUBDIR))
    }

    /// An explicit manifest must exist; otherwise `<root>/covers.toml` is
    /// used when present, falling back to the built-in covers.
    pub fn load_manifest(&self) -> Result<CoverManifest> {
        if let Some(path) = &self.manifest_path {
            return load_from(path);
        }

        let implicit = self.root.join(MANIFEST_FILE);
        if implicit.is_file() {
            return load_from(&implicit);
        }

        debug!("using built-in cover manifest");
        Ok(CoverManifest::default())
    }

    pub fn builder(&self) -> Result<CoverBuilder> {
        Ok(CoverBuilder::new(
            self.assets_dir(),
            self.output_dir(),
            self.load_manifest()?,
        ))
    }

    pub fn rasterizer(&self) -> Box<dyn Rasterizer> {
        match self.backend {
            Backend::RsvgConvert => Box::new(
                CommandRasterizer::new(&self.program).with_leading_args(&self.program_args),
            ),
            Backend::Resvg => Box::new(ResvgRasterizer::new()),
        }
    }
}

fn load_from(path: &Path) -> Result<CoverManifest> {
    debug!("loading cover manifest from {}", path.display());
    CoverManifest::load_from_file(path)
}
