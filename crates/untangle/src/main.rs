use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use untangle::{config::Config, pipeline};

#[derive(Parser)]
#[command(name = "untangle", version, about = "Regroup a Python package by call-graph community")]
struct Cli {
    /// Root of the package to read.
    src_root: PathBuf,

    /// Root the rewritten package is written under.
    dst_root: PathBuf,

    /// Skip the `ruff format` post-pass.
    #[arg(long)]
    no_format: bool,

    /// Increase log verbosity (stackable: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// File extension (without the dot) the input language uses.
    #[arg(long, default_value = "py")]
    source_suffix: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let config = Config {
        src_root: cli.src_root,
        dst_root: cli.dst_root,
        source_suffix: cli.source_suffix,
        package_marker: "__init__".to_string(),
        format_output: !cli.no_format,
    };

    match pipeline::run(&config).map_err(anyhow::Error::from) {
        Ok(files) => {
            log::info!("untangle: wrote {} files", files.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("untangle: {err:#}");
            ExitCode::FAILURE
        }
    }
}
