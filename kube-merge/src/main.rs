mod cli;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing::{debug, info};

use cli::{is_stdin, Cli};
use rustkube::{default_config_path, KubeConfig, LinePrompter, Merger, NamePrompter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // stdin may be spent on a config, so answers then come from the terminal
    if cli.sources.iter().any(|path| is_stdin(path)) {
        let prompter = LinePrompter::tty()
            .context("Standard input is a source, so new names are read from /dev/tty")?;
        run(cli, prompter)
    } else {
        run(cli, LinePrompter::terminal())
    }
}

/// Merges every source into the destination and writes it once at the end.
fn run<P: NamePrompter>(cli: Cli, prompter: P) -> anyhow::Result<()> {
    if cli.sources.iter().filter(|path| is_stdin(path)).count() > 1 {
        bail!("Standard input (`-`) can only be read once");
    }

    let destination = match cli.destination {
        Some(path) => path,
        None => default_config_path()?,
    };

    let mut kc = KubeConfig::read_from(&destination)?;
    debug!(destination = %destination.display(), "read destination");

    // Everything is parsed before the first prompt, so a bad file fails fast.
    let sources = cli
        .sources
        .iter()
        .map(|path| Ok((path, read_source(path)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut merger = Merger::new(prompter);
    for (path, src) in sources {
        let report = merger
            .merge(&mut kc, src)
            .with_context(|| format!("Merging {}", path.display()))?;
        info!(
            source = %path.display(),
            clusters = report.clusters_added,
            users = report.users_added,
            contexts = report.contexts_added,
            renamed = report.renames(),
            "merged"
        );
    }

    if cli.dry_run {
        return kc.to_writer(io::stdout().lock());
    }

    if cli.backup {
        let backup = backup_path(&destination, Local::now().naive_local());
        fs::copy(&destination, &backup).with_context(|| {
            format!("Backing up {} to {}", destination.display(), backup.display())
        })?;
        info!(backup = %backup.display(), "backed up destination");
    }

    kc.write_to(&destination)?;
    info!(destination = %destination.display(), "wrote merged config");

    Ok(())
}

fn read_source(path: &Path) -> anyhow::Result<KubeConfig> {
    if is_stdin(path) {
        KubeConfig::read(io::stdin().lock()).context("Reading kube config from standard input")
    } else {
        KubeConfig::read_from(path)
    }
}

fn backup_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!("_{now}"));
    path.with_file_name(name)
}

/// Logs go to stderr; stdout is kept for `--dry-run` output.
fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
        .context("Initializing logging")?;

    Ok(())
}
