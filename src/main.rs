// Main entrypoint for the treapcache command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use treapcache::config::{Config, ConfigTrait};
use treapcache::{Key, Storage, DB};

const CONFIG_PATH: &str = "cfg/treapcache.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/treapcache.cfg.local.yaml";

/// treapcache - treap-backed key/value index with hash-derived replica placement
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the replica slots of each key
    Replicas {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Load `key<TAB>value` lines (`-<TAB>key` deletes) and report placement stats
    Ingest {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<Config> {
    if let Some(custom_path) = path {
        return Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path));
    }

    match Config::load(PathBuf::from(CONFIG_PATH_LOCAL)) {
        Ok(cfg) => Ok(cfg),
        Err(_) => Config::load(PathBuf::from(CONFIG_PATH))
            .with_context(|| format!("failed to load config from {}", CONFIG_PATH)),
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn print_replicas(db: &DB<Key, String>, keys: &[String]) -> Result<()> {
    for raw in keys {
        let key: Key = raw.parse()?;
        let replicas = db.replicas_for(&key)?;
        println!("{}\t{:?}", key, replicas);
    }
    Ok(())
}

fn ingest(db: &DB<Key, String>, file: &Path) -> Result<()> {
    let reader = BufReader::new(
        std::fs::File::open(file).with_context(|| format!("open ingest file {:?}", file))?,
    );

    let (mut applied, mut skipped) = (0usize, 0usize);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {} of {:?}", lineno + 1, file))?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((head, tail)) = line.split_once('\t') else {
            warn!(component = "ingest", event = "malformed_line", line = lineno + 1, "expected a tab separator");
            skipped += 1;
            continue;
        };

        let result = if head == "-" {
            db.delete(&tail.parse::<Key>()?).map(|_| ())
        } else {
            db.insert(head.parse::<Key>()?, tail.to_string()).map(|_| ())
        };
        match result {
            Ok(()) => applied += 1,
            Err(err) => {
                warn!(component = "ingest", event = "rejected_line", line = lineno + 1, error = %err, "line rejected");
                skipped += 1;
            }
        }
    }

    let loads = db.slot_loads()?;
    let min = loads.iter().copied().min().unwrap_or(0);
    let max = loads.iter().copied().max().unwrap_or(0);
    let mean = loads.iter().sum::<usize>() as f64 / loads.len().max(1) as f64;
    info!(
        component = "ingest",
        event = "done",
        applied,
        skipped,
        keys = db.len(),
        height = db.height(),
        slot_load_min = min,
        slot_load_max = max,
        slot_load_mean = mean,
        "ingest finished"
    );
    for (slot, load) in loads.iter().enumerate() {
        println!("slot {}\t{}", slot, load);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = load_cfg(args.cfg)?;
    configure_logger(&cfg);

    let db: DB<Key, String> = DB::from_config(&cfg)?;
    match &args.command {
        Command::Replicas { keys } => print_replicas(&db, keys),
        Command::Ingest { file } => ingest(&db, file),
    }
}
