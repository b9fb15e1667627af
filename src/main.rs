use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pkgident::{
    config::Config,
    model::Ecosystem,
    output::{format_result_to_string, print_result, OutputFormat},
    scanner::{get_scanner, scan_image},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const PARTIAL: u8 = 2;
}

#[derive(Parser)]
#[command(name = "pkgident")]
#[command(
    author,
    version,
    about = "Synthesize CPE, PURL and license identities for packages in an extracted image"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an extracted image directory
    Scan {
        /// Root of the extracted image
        dir: PathBuf,

        /// Only run these parsers (conan, hex, rpm); may be repeated
        #[arg(short, long)]
        parser: Vec<String>,

        /// Output format (table, json, cyclonedx)
        #[arg(short, long)]
        format: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<String>,

        /// Exit with a non-zero code when any file could not be read
        #[arg(long)]
        strict: bool,

        /// Disable concurrent scanning (run parsers sequentially)
        #[arg(long)]
        no_parallel: bool,
    },

    /// List available parsers
    ListParsers,

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

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable config file");
            Config::default()
        }
    };

    match cli.command {
        Commands::Scan {
            dir,
            parser,
            format,
            output,
            strict,
            no_parallel,
        } => {
            let mut config = config;
            if !parser.is_empty() {
                config.enabled_parsers = parse_parsers(&parser)?;
            }
            if no_parallel {
                config.parallel = false;
            }

            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            run_scan(dir, &config, format_str, output, strict).await
        }
        Commands::ListParsers => {
            list_parsers(&config);
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(
    dir: PathBuf,
    config: &Config,
    format: String,
    output_file: Option<String>,
    strict: bool,
) -> Result<u8> {
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Scanning {}...", dir.display()));
        Some(pb)
    } else {
        None
    };

    let result = scan_image(&dir, config).await;

    if let Some(pb) = progress {
        pb.finish_with_message(format!("Found {} packages", result.packages.len()));
    }

    // Handle output
    if let Some(path) = output_file {
        std::fs::write(&path, format_result_to_string(&result, format)?)?;
        if is_interactive {
            println!("Results written to: {}", path);
        }
    } else {
        print_result(&result, format)?;
    }

    if strict && !result.errors.is_empty() {
        Ok(exit_codes::PARTIAL)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn list_parsers(config: &Config) {
    println!("Available parsers:");
    println!();

    let parsers = [
        (Ecosystem::Conan, "conanfile.txt, conan.lock"),
        (Ecosystem::Hex, "rebar.lock, mix.lock"),
        (Ecosystem::Rpm, "var/lib/rpm/{Packages, Packages.db, rpmdb.sqlite}"),
    ];

    for (ecosystem, files) in parsers {
        let scanner = get_scanner(ecosystem, config);
        let enabled = if config.is_enabled(ecosystem) { "yes" } else { "no" };

        println!(
            "  {:<8} {:<14} {:<10} [enabled: {}]",
            ecosystem.as_str(),
            scanner.name(),
            ecosystem.display_name(),
            enabled
        );
        println!("  {:<8} Files: {}", "", files);
        println!();
    }
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

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'pkgident config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

fn parse_parsers(names: &[String]) -> Result<Vec<Ecosystem>> {
    let mut ecosystems = Vec::new();
    for name in names {
        let ecosystem = Ecosystem::from_str(name).map_err(|e| anyhow::anyhow!(e))?;
        if !ecosystems.contains(&ecosystem) {
            ecosystems.push(ecosystem);
        }
    }
    Ok(ecosystems)
}
