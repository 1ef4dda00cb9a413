use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use lightscript::{parse, tokenize, Host, HostConfig};

#[derive(Debug, ClapParser)]
#[command(
    name = "lightscript",
    about = "Runs a LightScript program, driving its frames and timers.",
    version
)]
struct Args {
    /// Path to a LightScript source file, or `-` for stdin.
    file: PathBuf,

    /// Print the token stream as JSON instead of running.
    #[arg(long)]
    dump_tokens: bool,

    /// Print the parsed program as JSON instead of running.
    #[arg(long)]
    dump_ast: bool,

    /// TOML file with host settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override `max_frames` from the config.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Seed for `rand()`.
    #[arg(long)]
    seed: Option<u64>,

    /// Log steps and calls (same as RUST_LOG=lightscript=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lightscript=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let source = read_source(&args.file)?;

    let tokens = tokenize(&source)?;
    if args.dump_tokens {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    let program = parse(tokens)?;
    if args.dump_ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    if let Some(max_frames) = args.max_frames {
        config.max_frames = max_frames;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut host = Host::echoing(config);
    host.run_program(program)?;
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
