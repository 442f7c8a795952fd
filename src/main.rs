use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planwrap::cli::commands;
use planwrap::cli::load_config;

#[derive(Parser)]
#[command(name = "planwrap")]
#[command(
    version,
    about = "Group similar requests of a test plan into grouping containers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (skips global/project/env lookup)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document outline with node ids and kinds
    Tree {
        #[arg(help = "Document file (.json, .yaml, .yml)")]
        file: PathBuf,
    },

    /// Group similar requests and save the document
    Wrap {
        #[arg(help = "Document file (.json, .yaml, .yml)")]
        file: PathBuf,
        #[arg(long, short, help = "Container to wrap: node id (#3) or name")]
        root: Option<String>,
        #[arg(long, short, help = "Write here instead of the input file ('-' for stdout)")]
        output: Option<PathBuf>,
        #[arg(long = "dry-run", help = "Show the planned groups only")]
        dry_run: bool,
    },

    /// Interactive wrap/undo/redo session over one document
    Session {
        #[arg(help = "Document file (.json, .yaml, .yml)")]
        file: PathBuf,
        #[arg(long, short, help = "Default container to wrap: node id (#3) or name")]
        root: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mplanwrap encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Tree { file } => {
            let config = load_config(cli.config.as_deref())?;
            commands::tree::run(&file, config)?;
        }
        Commands::Wrap {
            file,
            root,
            output,
            dry_run,
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::wrap::run(
                commands::wrap::WrapOptions {
                    file,
                    root,
                    output,
                    dry_run,
                },
                config,
            )?;
        }
        Commands::Session { file, root } => {
            let config = load_config(cli.config.as_deref())?;
            commands::session::run(&file, root.as_deref(), config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
