use anyhow::{Context, Result};
use crossterm::style::Stylize;
use sheet_grid::config::config::Config;
use sheet_grid::data::data_provider::{provider_for_path, DataProvider, DefaultDataProvider};
use sheet_grid::logging::init_tracing;
use sheet_grid::ui::grid_app::run_grid_app;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn print_help() {
    println!("{}", "Sheet Grid - interactive spreadsheet in the terminal".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  sheet-grid [OPTIONS] [FILE.csv|FILE.json]");
    println!();
    println!("  Without a file the built-in team roster is shown.");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}     - Use this config file", "--config PATH".green());
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}          - Show this help", "--help".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  {}  - Focus a cell (Tab focuses the first one)", "Click".green());
    println!("  {} - Move focus", "Arrows".green());
    println!("  {}  - Edit the focused cell, Esc cancels", "Enter".green());
    println!("  {}    - Show or hide a column", "1-9".green());
    println!("  {}    - Resize the focused column", "< >".green());
    println!("  {}     - Help, {} log view, {} quit", "F1".green(), "F12".green(), "q".green());
    println!();
}

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    data_file: Option<PathBuf>,
    generate_config: bool,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => parsed.show_help = true,
            "--generate-config" => parsed.generate_config = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => {
                anyhow::bail!("Unknown option: {}", other);
            }
            file => {
                if parsed.data_file.is_some() {
                    anyhow::bail!("Only one data file can be opened at a time");
                }
                parsed.data_file = Some(PathBuf::from(file));
            }
        }
    }

    Ok(parsed)
}

fn generate_config(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        warn!(target: "config", "Using default config: {:#}", e);
        Config::default()
    })
}

fn run(args: CliArgs) -> Result<()> {
    let config = load_config(args.config_path.as_deref());

    let provider: Box<dyn DataProvider> = match &args.data_file {
        Some(path) => provider_for_path(path, config.grid.default_column_width)?,
        None => Box::new(DefaultDataProvider),
    };
    let table = provider
        .load()
        .with_context(|| format!("Failed to load data from {:?}", provider))?;
    info!(target: "system", "Starting grid with {:?}", provider);

    run_grid_app(table, config)
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            eprintln!("Try 'sheet-grid --help'");
            std::process::exit(2);
        }
    };

    if args.show_help {
        print_help();
        return;
    }

    if args.generate_config {
        if let Err(e) = generate_config(args.config_path.as_deref()) {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
