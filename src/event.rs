use std::fmt;

/// Progress messages emitted by the builder, one console line (or banner) each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildEvent {
    Started,
    Skipped {
        source_name: String,
    },
    Converted {
        source_name: String,
        output_name: String,
        bytes: u64,
    },
    Finished,
}

impl fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildEvent::Started => writeln!(f, "Building cover images..."),
            BuildEvent::Skipped { source_name } => {
                write!(f, "  Skipping {} (not found)", source_name)
            }
            BuildEvent::Converted {
                source_name,
                output_name,
                bytes,
            } => write!(
                f,
                "  {} -> {} ({:.0} KB)",
                source_name,
                output_name,
                *bytes as f64 / 1024.0
            ),
            BuildEvent::Finished => write!(f, "\nDone."),
        }
    }
}
