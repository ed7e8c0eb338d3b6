// Rasterizer backends: the external rsvg-convert command and anything
// else that can turn an SVG file into a PNG of a given size.

use log::{debug, trace};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{CoverError, Result};

pub const DEFAULT_PROGRAM: &str = "rsvg-convert";

pub const INSTALL_HINT: &str =
    "Install librsvg (apt install librsvg2-bin, brew install librsvg) and try again.";

pub trait Rasterizer {
    fn name(&self) -> &str;

    /// Checks the backend is usable and returns its version line.
    fn probe(&self) -> Result<String>;

    /// Writes `input` as a `width`x`height` PNG at `output`, overwriting it.
    fn rasterize(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()>;
}

/// Shells out to an rsvg-convert compatible command.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: OsString,
    name: String,
    leading_args: Vec<OsString>,
}

impl Default for CommandRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandRasterizer {
    pub fn new(program: impl Into<OsString>) -> Self {
        let program = program.into();
        Self {
            name: program.to_string_lossy().to_string(),
            program,
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before `--version` or the conversion arguments,
    /// e.g. a script path when `program` is an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args).stdin(Stdio::null());
        cmd
    }

    fn spawn_error(&self, err: std::io::Error) -> CoverError {
        debug!("failed to spawn {}: {}", self.name, err);
        if err.kind() != ErrorKind::NotFound {
            return CoverError::Io(err);
        }
        CoverError::MissingDependency {
            program: self.name.clone(),
            hint: INSTALL_HINT.to_string(),
        }
    }
}

pub fn conversion_args(input: &Path, output: &Path, width: u32, height: u32) -> Vec<OsString> {
    vec![
        "-w".into(),
        width.to_string().into(),
        "-h".into(),
        height.to_string().into(),
        input.as_os_str().to_owned(),
        "-o".into(),
        output.as_os_str().to_owned(),
    ]
}

impl Rasterizer for CommandRasterizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> Result<String> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(CoverError::DependencyProbe {
                program: self.name.clone(),
                status: output.status,
            });
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        debug!("using {}", version);
        Ok(version)
    }

    fn rasterize(&self, input: &Path, output: &Path, width: u32, height: u32) -> Result<()> {
        let args = conversion_args(input, output, width, height);
        trace!("{} {:?}", self.name, args);

        let result = self
            .command()
            .args(&args)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !result.status.success() {
            return Err(CoverError::Conversion {
                program: self.name.clone(),
                input: input.to_path_buf(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_conversion_args_order() {
        let args = conversion_args(Path::new("in/a.svg"), Path::new("out/a.png"), 1600, 2286);
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            ["-w", "1600", "-h", "2286", "in/a.svg", "-o", "out/a.png"]
        );
    }

    #[test]
    fn test_default_program() {
        let r = CommandRasterizer::default();
        assert_eq!(r.name(), "rsvg-convert");
    }

    #[test]
    fn test_missing_program() {
        let r = CommandRasterizer::new("cover-builder-no-such-rasterizer");
        let err = r.probe().unwrap_err();
        match err {
            CoverError::MissingDependency { program, hint } => {
                assert_eq!(program, "cover-builder-no-such-rasterizer");
                assert_eq!(hint, INSTALL_HINT);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = r
            .rasterize(Path::new("a.svg"), Path::new("a.png"), 1, 1)
            .unwrap_err();
        assert!(matches!(err, CoverError::MissingDependency { .. }));
    }

    #[cfg(unix)]
    mod script {
        use super::*;
        use tempfile::tempdir;

        // Run through `sh` so the script never needs the exec bit.
        fn script_rasterizer(dir: &Path, body: &str) -> CommandRasterizer {
            let script = dir.join("fake-rsvg-convert.sh");
            std::fs::write(&script, body).unwrap();
            CommandRasterizer::new("sh").with_leading_args([script])
        }

        fn recording_script(log: &PathBuf) -> String {
            format!(
                r#"if [ "$1" = "--version" ]; then
    echo "rsvg-convert version 2.58.0"
    exit 0
fi
printf '%s\n' "$@" > '{}'
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then shift; out="$1"; fi
    shift
done
printf 'not really a png' > "$out"
"#,
                log.display()
            )
        }

        #[test]
        fn test_probe_reports_version() {
            let dir = tempdir().unwrap();
            let log = dir.path().join("args.log");
            let r = script_rasterizer(dir.path(), &recording_script(&log));

            assert_eq!(r.probe().unwrap(), "rsvg-convert version 2.58.0");
        }

        #[test]
        fn test_probe_nonzero_exit() {
            let dir = tempdir().unwrap();
            let r = script_rasterizer(dir.path(), "exit 3\n");

            let err = r.probe().unwrap_err();
            assert!(matches!(err, CoverError::DependencyProbe { .. }));
        }

        #[test]
        fn test_unexecutable_program_is_io_error() {
            let dir = tempdir().unwrap();
            let program = dir.path().join("rsvg-convert");
            std::fs::write(&program, "echo never runs\n").unwrap();

            let err = CommandRasterizer::new(&program).probe().unwrap_err();
            match err {
                CoverError::Io(e) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn test_non_utf8_program_name() {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let r = CommandRasterizer::new(OsStr::from_bytes(b"rsvg-\xffconvert"));
            assert_eq!(r.name(), "rsvg-\u{fffd}convert");
        }

        #[test]
        fn test_rasterize_passes_arguments() {
            let dir = tempdir().unwrap();
            let log = dir.path().join("args.log");
            let r = script_rasterizer(dir.path(), &recording_script(&log));

            let input = dir.path().join("spine.svg");
            let output = dir.path().join("spine.png");
            r.rasterize(&input, &output, 228, 2286).unwrap();

            let logged = std::fs::read_to_string(&log).unwrap();
            let logged: Vec<_> = logged.lines().collect();
            assert_eq!(
                logged,
                [
                    "-w",
                    "228",
                    "-h",
                    "2286",
                    input.to_str().unwrap(),
                    "-o",
                    output.to_str().unwrap(),
                ]
            );
            assert_eq!(std::fs::read(&output).unwrap(), b"not really a png");
        }

        #[test]
        fn test_rasterize_failure_carries_stderr() {
            let dir = tempdir().unwrap();
            let r = script_rasterizer(dir.path(), "echo 'Error reading SVG' >&2\nexit 1\n");

            let input = dir.path().join("front-cover.svg");
            let err = r
                .rasterize(&input, &dir.path().join("front-cover.png"), 10, 10)
                .unwrap_err();
            match &err {
                CoverError::Conversion { input: i, stderr, .. } => {
                    assert_eq!(i, &input);
                    assert!(stderr.contains("Error reading SVG"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(err.to_string().contains("Error reading SVG"));
        }
    }
}
