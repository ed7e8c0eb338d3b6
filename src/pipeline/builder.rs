use log::{debug, info};
use std::path::{Path, PathBuf};

use super::fs_ops::{ensure_dir, file_size};
use super::rasterizer::Rasterizer;
use crate::error::Result;
use crate::event::BuildEvent;
use crate::model::cover::{CoverEntry, CoverManifest};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    Skipped,
    Converted { output: PathBuf, bytes: u64 },
}

/// Per-entry outcomes in manifest order.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<(CoverEntry, EntryOutcome)>,
}

impl BuildReport {
    pub fn converted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::Converted { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::Skipped))
            .count()
    }
}

pub struct CoverBuilder {
    assets_dir: PathBuf,
    output_dir: PathBuf,
    manifest: CoverManifest,
}

impl CoverBuilder {
    pub fn new<A: Into<PathBuf>, O: Into<PathBuf>>(
        assets_dir: A,
        output_dir: O,
        manifest: CoverManifest,
    ) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            output_dir: output_dir.into(),
            manifest,
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn manifest(&self) -> &CoverManifest {
        &self.manifest
    }

    /// Probes the rasterizer, prepares the output directory and converts every
    /// entry in order. Stops at the first failure; missing sources are skipped.
    pub fn run<R, F>(&self, rasterizer: &R, mut on_event: F) -> Result<BuildReport>
    where
        R: Rasterizer + ?Sized,
        F: FnMut(BuildEvent),
    {
        let version = rasterizer.probe()?;
        info!("rasterizer: {} ({})", rasterizer.name(), version);

        on_event(BuildEvent::Started);

        ensure_dir(&self.output_dir)?;
        debug!("output directory: {}", self.output_dir.display());

        let mut report = BuildReport::default();
        for entry in &self.manifest {
            let outcome = self.build_entry(rasterizer, entry, &mut on_event)?;
            report.outcomes.push((entry.clone(), outcome));
        }

        on_event(BuildEvent::Finished);
        Ok(report)
    }

    pub fn build_entry<R, F>(
        &self,
        rasterizer: &R,
        entry: &CoverEntry,
        on_event: &mut F,
    ) -> Result<EntryOutcome>
    where
        R: Rasterizer + ?Sized,
        F: FnMut(BuildEvent),
    {
        let source = self.assets_dir.join(&entry.source_name);
        let output = self.output_dir.join(&entry.output_name);

        if !source.exists() {
            debug!("{} does not exist", source.display());
            on_event(BuildEvent::Skipped {
                source_name: entry.source_name.clone(),
            });
            return Ok(EntryOutcome::Skipped);
        }

        rasterizer.rasterize(&source, &output, entry.width, entry.height)?;

        let bytes = file_size(&output)?;
        on_event(BuildEvent::Converted {
            source_name: entry.source_name.clone(),
            output_name: entry.output_name.clone(),
            bytes,
        });

        Ok(EntryOutcome::Converted { output, bytes })
    }
}
