//! `mods2json`: map MODS XML files to one JSON record dictionary per line.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use modsmap::parallel::map_paths_parallel;
use modsmap::{MapperConfig, ModsMapper, RecoveryMode};

const USAGE: &str = "Usage: mods2json [--skip-malformed] [--pretty] [--keep-whitespace] <FILE>...";

#[derive(Debug, Default)]
struct Options {
    config: MapperConfig,
    pretty: bool,
    files: Vec<PathBuf>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--skip-malformed" => {
                options.config = options.config.with_recovery_mode(RecoveryMode::Skip);
            },
            "--keep-whitespace" => {
                options.config = options.config.with_trim_whitespace(false);
            },
            "--pretty" => options.pretty = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            file => options.files.push(PathBuf::from(file)),
        }
    }
    if options.files.is_empty() {
        bail!("no input files\n{USAGE}");
    }
    Ok(options)
}

fn run(options: &Options) -> Result<()> {
    let mapper = ModsMapper::new(options.config.clone());
    let results = map_paths_parallel(&mapper, &options.files);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (path, result) in options.files.iter().zip(results) {
        let outcome = result.with_context(|| format!("failed to map {}", path.display()))?;
        for skipped in &outcome.skipped {
            warn!(
                "{}: skipped record {}: {}",
                path.display(),
                skipped.position,
                skipped.reason
            );
        }
        info!("{}: {} record(s)", path.display(), outcome.records.len());
        for record in &outcome.records {
            let json = if options.pretty {
                record.to_json_pretty()?
            } else {
                record.to_json()?
            };
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let result = parse_args(std::env::args().skip(1)).and_then(|options| run(&options));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mods2json: {err:#}");
            ExitCode::FAILURE
        },
    }
}
