use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod terminal;

use signpack_core::SignpackError;
use signpack_core::signing::Keytool;
use signpack_core::workflow::{self, RunSummary};
use terminal::{SpinningGenerator, TerminalPrompter};

#[derive(Parser, Debug)]
#[command(name = "signpack")]
#[command(
    version,
    about = "Create an Android signing keystore and package it for CI secrets",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to ./signpack.huml when present)
    #[arg(long, short = 'c', env = "SIGNPACK_CONFIG")]
    config: Option<PathBuf>,

    /// keytool executable to run
    #[arg(long, env = "SIGNPACK_KEYTOOL")]
    keytool: Option<String>,

    /// Directory holding the keystore and the sign/ output
    #[arg(long = "dir", short = 'C', default_value = ".")]
    dir: PathBuf,

    /// Log debug details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "signpack=debug,signpack_core=debug"
    } else {
        "warn"
    };

    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Path for display, relative to the working directory when possible.
fn display_path<'a>(path: &'a Path, root: &Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

fn print_summary(summary: &RunSummary, root: &Path) {
    let artifacts = &summary.artifacts;

    println!();
    println!(
        "{} Created base64 files for CI secrets:",
        style("✓").green().bold()
    );
    for (index, artifact) in artifacts.iter().enumerate() {
        println!(
            "  {}. {} - {} (from {})",
            index + 1,
            display_path(&artifact.path, root),
            style(artifact.secret_name).cyan(),
            display_path(&artifact.source, root)
        );
    }

    println!();
    println!("Add the contents of these files to your repository secrets:");
    for artifact in artifacts.iter() {
        let file_name = artifact
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("  {}: contents of {}", artifact.secret_name, file_name);
    }

    println!();
    println!(
        "{}",
        style(format!(
            "{} stores passwords in plain text. Keep it and {} out of version control.",
            display_path(&summary.properties_file, root),
            summary.credentials.path.display()
        ))
        .dim()
    );
    println!();
    println!("===== All done! =====");
    println!("CI builds signed with these secrets can be installed over local release builds.");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let file_config = config::load_config(cli.config.as_deref(), &cli.dir)?;
    let resolved = config::resolve_config(&cli.dir, cli.keytool.as_deref(), file_config)?;

    let mut prompter = TerminalPrompter::new();
    let generator = SpinningGenerator::new(Keytool);

    println!("===== Android signing setup =====");
    println!();

    match workflow::run(&mut prompter, &generator, &resolved.layout, &resolved.settings).await {
        Ok(summary) => {
            print_summary(&summary, &resolved.layout.root);
            Ok(())
        }
        Err(SignpackError::Keytool { status, stderr }) => {
            let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
            eprintln!("{} keytool failed (exit {})", style("x").red(), status);
            eprintln!("Error output: {}", stderr.trim_end());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
