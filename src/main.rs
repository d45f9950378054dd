use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use fsstat::util::human::{fmt_bytes, fmt_pct};
use fsstat::{read_mount_table_with, Config, FsStat, MatchMode};
use serde_json::{json, Value};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fsstat", about = "Filesystem statistics and mount resolution for paths", version = "0.1")]
struct Cli {
    /// Paths to inspect
    #[arg(default_value = "/")]
    paths: Vec<String>,

    /// Print a JSON snapshot instead of text
    #[arg(long)]
    json: bool,

    /// List the mount table instead of inspecting paths
    #[arg(long)]
    mounts: bool,

    /// Match mount directories on path boundaries ("/home" does not own "/home2")
    #[arg(long)]
    segments: bool,

    /// Fail a path when the mount table cannot be read
    #[arg(long)]
    strict: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    print_config: bool,

    /// Write a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Print shell completions, then exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "fsstat", &mut io::stdout());
        return Ok(());
    }
    if cli.init_config {
        return run_init_config();
    }

    let mut cfg = Config::load();
    if cli.segments { cfg.resolution.match_mode = MatchMode::Segments; }
    if cli.strict   { cfg.resolution.strict = true; }

    if cli.print_config {
        return run_print_config(&cfg);
    }
    if cli.mounts {
        return run_mounts(&cfg, cli.json);
    }

    let failed = if cli.json {
        run_json_snapshot(&cfg, &cli.paths)?
    } else {
        run_report(&cfg, &cli.paths)
    };
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// One line per path. Returns the number of paths that failed.
fn run_report(cfg: &Config, paths: &[String]) -> usize {
    let mut stat = FsStat::with_config(cfg.clone());
    let mut failed = 0;

    for path in paths {
        if let Err(e) = stat.set_path(path.as_str()) {
            eprintln!("{}: {}", path, e);
            failed += 1;
            continue;
        }
        let fs_type = match stat.mount() {
            Some(m) => m.fs_type.clone(),
            None    => stat.fs_type_name().map(str::to_string).unwrap_or_else(|| format!("{:#x}", stat.fs_type())),
        };
        let mount = stat.mount()
            .map(|m| format!("{} on {}", m.source, m.mount_dir))
            .unwrap_or_else(|| "(mount unknown)".to_string());
        println!(
            "{}  {}  {}  {} total  {} free  {} avail  {}  {}",
            path,
            fs_type,
            mount,
            fmt_bytes(stat.bytes_capacity()),
            fmt_bytes(stat.bytes_free()),
            fmt_bytes(stat.bytes_available()),
            fmt_pct(stat.usage().use_pct()),
            if stat.is_read_only() { "ro" } else { "rw" },
        );
    }
    failed
}

fn run_json_snapshot(cfg: &Config, paths: &[String]) -> Result<usize> {
    let mut stat = FsStat::with_config(cfg.clone());
    let mut failed = 0;

    let results: Vec<Value> = paths.iter().map(|path| {
        match stat.set_path(path.as_str()) {
            Ok(()) => json!({
                "path":          path,
                "capacity":      stat.bytes_capacity(),
                "free":          stat.bytes_free(),
                "available":     stat.bytes_available(),
                "capacity_hr":   fmt_bytes(stat.bytes_capacity()),
                "available_hr":  fmt_bytes(stat.bytes_available()),
                "use_pct":       stat.usage().use_pct(),
                "fs_type":       stat.fs_type(),
                "fs_type_name":  stat.fs_type_name(),
                "flags":         stat.flags(),
                "read_only":     stat.is_read_only(),
                "mount":         stat.mount(),
            }),
            Err(e) => {
                failed += 1;
                json!({ "path": path, "error": e.to_string() })
            }
        }
    }).collect();

    let snapshot = json!({
        "fsstat_version": "0.1",
        "timestamp":      chrono::Local::now().to_rfc3339(),
        "match_mode":     cfg.resolution.match_mode,
        "paths":          results,
    });

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(failed)
}

fn run_mounts(cfg: &Config, as_json: bool) -> Result<()> {
    let entries = read_mount_table_with(&cfg.mount_table).context("reading mount table")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for e in &entries {
        let dev = e.device_number().unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:<32} {:<10} {:<8} {}", e.source, e.mount_dir, e.fs_type, dev, e.options.join(","));
    }
    Ok(())
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("Config: {}", path);
    println!();
    print!("{}", toml::to_string_pretty(cfg).context("serializing config")?);
    Ok(())
}

fn run_init_config() -> Result<()> {
    let path = Config::config_path().context("no config dir")?;
    Config::write_defaults(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
