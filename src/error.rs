use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, CoverError>;

#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    #[error("{program} not found. {hint}")]
    MissingDependency { program: String, hint: String },

    #[error("{program} --version failed ({status})")]
    DependencyProbe { program: String, status: ExitStatus },

    #[error("could not create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{program} failed to convert {} ({status}){}", .input.display(), stderr_suffix(.stderr))]
    Conversion {
        program: String,
        input: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("render error: {0:#}")]
    Render(anyhow::Error),

    #[error("invalid cover entry: {0}")]
    InvalidEntry(String),

    #[error("invalid manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("could not serialize manifest: {0}")]
    ManifestSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
