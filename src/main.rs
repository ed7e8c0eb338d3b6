use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use cover_builder::config::{Backend, Config};
use cover_builder::pipeline::rasterizer::DEFAULT_PROGRAM;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    /// External rsvg-convert command
    RsvgConvert,
    /// Built-in resvg renderer
    Resvg,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::RsvgConvert => Backend::RsvgConvert,
            BackendArg::Resvg => Backend::Resvg,
        }
    }
}

/// Build cover PNGs from SVG sources.
#[derive(Parser, Debug)]
#[command(name = "build-cover", version, about, long_about = None)]
struct Args {
    /// Project root containing assets/cover and output
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory holding the SVG sources (default: <root>/assets/cover)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Directory the PNGs are written to (default: <root>/output)
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML cover manifest (default: <root>/covers.toml if present)
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "rsvg-convert")]
    backend: BackendArg,

    /// Rasterizer program for the rsvg-convert backend
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    rasterizer: String,

    /// Extra argument passed to the rasterizer before its own (repeatable)
    #[arg(long = "rasterizer-arg", value_name = "ARG")]
    rasterizer_args: Vec<String>,

    /// Print the effective manifest as TOML and exit
    #[arg(long, default_value_t = false)]
    dump_manifest: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            root: args.root,
            assets_dir: args.assets,
            output_dir: args.output,
            manifest_path: args.manifest,
            backend: args.backend.into(),
            program: args.rasterizer,
            program_args: args.rasterizer_args,
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let dump = args.dump_manifest;
    let config = Config::from(args);

    if dump {
        print!("{}", config.load_manifest()?.to_toml_string()?);
        return Ok(());
    }

    let builder = config.builder()?;
    log::info!(
        "{} covers from {} into {}",
        builder.manifest().len(),
        builder.assets_dir().display(),
        builder.output_dir().display()
    );
    let rasterizer = config.rasterizer();
    builder.run(&*rasterizer, |event| println!("{}", event))?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
