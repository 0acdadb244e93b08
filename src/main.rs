use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vulnmap::{
    advisory::{AdvisoryLoader, AdvisorySource},
    config::{Config, DiscoveryConfig},
    model::{Diagnostics, DiscoveryReport, IndexReport},
    output::{print_files, print_index, OutputFormat},
};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "vulnmap")]
#[command(
    author,
    version,
    about = "Index a vulnerability advisory database and discover source files to analyze"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an advisory database and print the module index
    Index {
        /// Directory containing advisory files (defaults to the configured one)
        dir: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Write JSON output to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List source files under a project root
    Discover {
        /// Project root to walk
        root: PathBuf,

        /// Extension of source files to collect
        #[arg(short, long)]
        ext: Option<String>,

        /// Directory fragment to exclude (repeatable, replaces configured list)
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,

        /// Follow symbolic links while walking
        #[arg(long)]
        follow_symlinks: bool,

        /// Maximum walk depth below the root
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<u8> {
    let config = Config::load().unwrap_or_default();

    match cli.command {
        Commands::Index {
            dir,
            format,
            output,
        } => {
            let format_str = format.unwrap_or(config.default_format.clone());
            run_index(&config, dir, &format_str, output)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Discover {
            root,
            ext,
            exclude,
            follow_symlinks,
            max_depth,
            format,
        } => {
            let mut discovery = config.discovery.clone();
            if let Some(ext) = ext {
                discovery.extension = ext;
            }
            if !exclude.is_empty() {
                discovery.exclude_dirs = exclude;
            }
            discovery.follow_symlinks |= follow_symlinks;
            if max_depth.is_some() {
                discovery.max_depth = max_depth;
            }

            let format_str = format.unwrap_or(config.default_format.clone());
            run_discover(&discovery, root, &format_str)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn run_index(
    config: &Config,
    dir: Option<PathBuf>,
    format: &str,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table && output_file.is_none();

    let dir = dir
        .or_else(|| config.advisories.dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No advisory directory given. Pass one or set [advisories] dir in the config file.")
        })?;

    let source = config.advisories.source(&dir);
    let progress = is_interactive.then(|| spinner("Loading advisories..."));

    let raw = source.read_all()?;
    let mut diagnostics = Diagnostics::new();
    let (table, index) = AdvisoryLoader::new().load(raw, &mut diagnostics);

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }
    info!(
        source = %source.name(),
        advisories = table.len(),
        modules = index.len(),
        skipped = diagnostics.len(),
        "Advisory database loaded"
    );

    let mut report = IndexReport::new(source.name(), &table, index, diagnostics);
    report.retain_advisories(|id| !config.advisories.should_ignore(id));

    if let Some(path) = output_file {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
        println!("Index written to: {}", path.display());
    } else {
        print_index(&report, format)?;
    }

    Ok(())
}

fn run_discover(
    discovery: &DiscoveryConfig,
    root: PathBuf,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;
    let progress = (format == OutputFormat::Table).then(|| spinner("Discovering files..."));

    info!(
        root = %root.display(),
        extension = %discovery.extension,
        exclusions = ?discovery.exclude_dirs,
        "Walking source tree"
    );

    let mut diagnostics = Diagnostics::new();
    let result = discovery.discoverer().discover(&root, &mut diagnostics);

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let files = result?;

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }

    let report = DiscoveryReport::new(root, files, diagnostics);
    print_files(&report, format)
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'vulnmap config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
