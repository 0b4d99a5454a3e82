use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{debug, LevelFilter};

use rotolog::{inspect_root, PassStats, RetentionConfig, RetentionManager, RootState};

#[derive(Parser, Debug)]
#[command(name = "rotolog", version, about = "Prune, compress and expire log files")]
struct Cli {
    /// Dry run: report what would be removed or compressed without touching anything
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Root directory of the log tree
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,

    /// Days since last modification before a log is gzipped
    #[arg(short = 'c', long = "compression", value_name = "DAYS")]
    compression: Option<u32>,

    /// Days since last modification before an archive is deleted
    #[arg(short = 'a', long = "archive", value_name = "DAYS")]
    archive: Option<u32>,

    /// Extension exempt from compression (repeatable, replaces the default set)
    #[arg(short = 's', long = "skip-ext", value_name = "EXT")]
    skip_ext: Vec<String>,

    /// JSON config file; flags override its values
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn resolve(&self) -> Result<RetentionConfig> {
        let mut config = match &self.config {
            Some(path) => RetentionConfig::load(path)?,
            None => RetentionConfig::default(),
        };
        if let Some(path) = &self.path {
            config.root = path.clone();
        }
        if let Some(days) = self.compression {
            config.compression_age_days = days;
        }
        if let Some(days) = self.archive {
            config.archive_age_days = days;
        }
        if !self.skip_ext.is_empty() {
            config.skip_extensions = self.skip_ext.clone();
        }
        config.dry_run |= self.debug;
        Ok(config.normalized())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp(None);
    if debug {
        // Dry-run actions are reported through the logger; RUST_LOG must not hide them.
        builder.filter_module("rotolog", LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve()?;
    if config.dry_run {
        println!("dry run, no files will be changed");
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    if inspect_root(&config.root)? == RootState::Empty {
        println!("{} is empty, nothing to do", config.root.display());
        return Ok(());
    }

    let manager = RetentionManager::local(config);
    let config = manager.config();

    println!("remove empty log files...");
    let stats = manager.prune_empty()?;
    report(&stats, "empty logs removed");

    println!(
        "compressing logs older than {} days...",
        config.compression_age_days
    );
    let stats = manager.compress_aged()?;
    report(&stats, "logs compressed");

    println!(
        "expiring archives older than {} days...",
        config.archive_age_days
    );
    let stats = manager.expire_archives()?;
    report(&stats, "archived logs expired");

    Ok(())
}

fn report(stats: &PassStats, what: &str) {
    if stats.matched_count > stats.applied_count {
        println!(
            "{} {} ({} skipped by dry run)",
            stats.applied_count,
            what,
            stats.matched_count - stats.applied_count
        );
    } else {
        println!("{} {}", stats.applied_count, what);
    }
    debug!("{}", stats.summary());
}
