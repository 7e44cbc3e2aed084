use anyhow::{Context, Result};
use appwrapper_pack::{
    fs::write_atomic, wrap_reader, AppWrapperHeader, Config, LoadOptions, WrapSummary,
};
use clap::{ArgAction, Parser};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, IsTerminal, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "awpack", version, about = "Wrap Resources in an AppWrapper", long_about = None)]
pub struct Cli {
    /// Input YAML file ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Name of the AppWrapper [default: sample-appwrapper]
    #[arg(short, long)]
    name: Option<String>,

    /// Output file ("-" writes stdout)
    #[arg(short, long, value_name = "FILE", default_value = "aw.yaml")]
    output: PathBuf,

    /// Kueue queue the AppWrapper is submitted to [default: default-queue]
    #[arg(short, long)]
    queue: Option<String>,

    /// Explicit configuration file, applied over .awpack.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let header = resolve_header(&cli)?;
    for warning in header.name_warnings() {
        warn!("{warning}");
    }

    let summary = if is_stdio(&cli.output) {
        match write_stdout(&cli.input, &header)? {
            Some(summary) => summary,
            // downstream reader went away
            None => return Ok(()),
        }
    } else {
        write_file(&cli.input, &cli.output, &header)?
    };

    if summary.documents == 0 {
        warn!(
            "no documents found in {}, writing an empty components list",
            cli.input.display()
        );
    }
    info!(
        "wrapped {} document(s) into AppWrapper '{}'",
        summary.documents, header.name
    );

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn resolve_header(cli: &Cli) -> Result<AppWrapperHeader> {
    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }

    let config = Config::load(options).context("Unable to load configuration")?;
    for source in &config.sources {
        info!("using {} at {}", source.kind, source.path.display());
    }

    let mut header = config.header;
    if let Some(name) = &cli.name {
        header = header.with_name(name.as_str());
    }
    if let Some(queue) = &cli.queue {
        header = header.with_queue_name(queue.as_str());
    }
    header.validate().context("Invalid AppWrapper header")?;
    Ok(header)
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path)
        .with_context(|| format!("Unable to open input file: {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn write_file(input: &Path, output: &Path, header: &AppWrapperHeader) -> Result<WrapSummary> {
    let mut reader = open_input(input)?;
    let mut buffer = Vec::new();
    let summary = wrap_reader(&mut reader, &mut buffer, header)
        .with_context(|| format!("Unable to read input: {}", input.display()))?;

    write_atomic(output, &buffer)
        .with_context(|| format!("Unable to write output file: {}", output.display()))?;

    info!("wrote {}", output.display());
    Ok(summary)
}

/// Returns `None` when stdout was closed before the output was complete.
fn write_stdout(input: &Path, header: &AppWrapperHeader) -> Result<Option<WrapSummary>> {
    let mut reader = open_input(input)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let summary = match wrap_reader(&mut reader, &mut handle, header) {
        Ok(summary) => summary,
        Err(err) if should_ignore_pipe_error(&err) => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Unable to wrap input: {}", input.display()))
        }
    };

    match handle.flush() {
        Ok(_) => Ok(Some(summary)),
        Err(err) if should_ignore_pipe_error(&err) => Ok(None),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
