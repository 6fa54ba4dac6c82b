//! puz - interactively choose package specific USE flags
//!
//! Runs `emerge -pvO <package>`, shows the active USE flags of every package
//! in the report, lets the user pick new flags for each and writes the
//! resulting package.use to a new file.

mod session;

use anyhow::{Context, Result};
use clap::Parser;
use config::{env_vars, FlagStore, Settings, SettingsLoader};
use console::style;
use package::{parse_report, Emerge};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "puz",
    about = "Interactively choose package specific USE flags",
    version
)]
struct Cli {
    /// The package to be operated on
    package: String,

    /// Settings file path
    #[arg(short, long, env = env_vars::CONFIG)]
    config: Option<PathBuf>,

    /// package.use file to read (overrides the settings file)
    #[arg(short = 'f', long = "use-file")]
    use_file: Option<PathBuf>,

    /// Write the new package.use here instead of a new file next to the original
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Replace the original package.use once the new one is written
    #[arg(short, long)]
    in_place: bool,

    /// Start from an empty package.use if the file does not exist
    #[arg(short = 'n', long)]
    create: bool,

    /// Show full output from emerge
    #[arg(short, long = "show-emerge")]
    show_emerge: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let loader = match &cli.config {
        Some(path) => SettingsLoader::with_path(path),
        None => SettingsLoader::new(),
    };
    let mut settings: Settings = loader.load().context("Failed to load settings")?;
    if let Some(use_file) = &cli.use_file {
        settings.use_file = use_file.clone();
    }

    let mut store = if cli.create && !settings.use_file.exists() {
        warn!(
            "{} does not exist, starting from an empty package.use",
            settings.use_file.display()
        );
        FlagStore::empty(&settings.use_file)
    } else {
        FlagStore::load(&settings.use_file).context("Unable to read package.use file")?
    };

    let emerge = Emerge::from_settings(&settings.emerge);
    let output = emerge.pretend(&cli.package)?;

    if cli.show_emerge {
        println!("Output from emerge:");
        println!("{}", output);
    }

    let entries = parse_report(&output)?;

    for entry in entries {
        match entry {
            Ok(record) => session::select_use_flags(&mut store, &record)?,
            Err(e) => warn!("Skipping package: {}", e),
        }
    }

    let written = if cli.in_place {
        store.commit_to(&settings.use_file)
    } else if let Some(path) = &cli.output {
        store.commit_to(path)
    } else {
        store.commit()
    }
    .context("Unable to write to file")?;

    println!(
        "{} New package.use file is {}",
        style("Done!").green().bold(),
        written.display()
    );
    Ok(())
}
