use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CoverError, Result};

/// One cover face to rasterize: `source_name` under the assets directory
/// becomes `output_name` under the output directory at `width`x`height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverEntry {
    #[serde(rename = "source")]
    pub source_name: String,
    #[serde(rename = "output")]
    pub output_name: String,
    pub width: u32,
    pub height: u32,
}

impl CoverEntry {
    pub fn new(
        source_name: impl Into<String>,
        output_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            output_name: output_name.into(),
            width,
            height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoverError::InvalidEntry(format!(
                "{} has non-positive size {}x{}",
                self.source_name, self.width, self.height
            )));
        }
        if self.source_name.trim().is_empty() || self.output_name.trim().is_empty() {
            return Err(CoverError::InvalidEntry(
                "source and output names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ordered list of covers to build. Order only affects reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverManifest {
    #[serde(rename = "cover", default = "default_covers")]
    pub entries: Vec<CoverEntry>,
}

impl Default for CoverManifest {
    fn default() -> Self {
        Self {
            entries: default_covers(),
        }
    }
}

impl CoverManifest {
    pub fn new(entries: Vec<CoverEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoverEntry> {
        self.entries.iter()
    }

    pub fn validate(&self) -> Result<()> {
        self.entries.iter().try_for_each(CoverEntry::validate)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parses and validates a manifest.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl<'a> IntoIterator for &'a CoverManifest {
    type Item = &'a CoverEntry;
    type IntoIter = std::slice::Iter<'a, CoverEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn default_covers() -> Vec<CoverEntry> {
    vec![
        CoverEntry::new("front-cover.svg", "front-cover.png", 1600, 2286),
        CoverEntry::new("spine.svg", "spine.png", 228, 2286),
        CoverEntry::new("back-cover.svg", "back-cover.png", 1600, 2286),
    ]
}
