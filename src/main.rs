use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use preppy_gateway::cli::commands;
use preppy_gateway::config::{Config, ConfigLoader};

#[derive(Parser)]
#[command(name = "preppy")]
#[command(
    version,
    about = "Prompt-templated AI request gateway for SDLC artifact generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Path to a config file (defaults to ./preppy.toml)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the embedded HTTP server
    Serve {
        #[arg(long, short, help = "Listen port override")]
        port: Option<u16>,
        #[arg(long, help = "Bind address override")]
        bind: Option<String>,
    },

    /// Generate one artifact and print the HTML to stdout
    Generate {
        #[arg(
            long,
            short,
            help = "Artifact kind: analysis, design, erd, lowlevel, website-structure, user-stories, requirements, generic"
        )]
        kind: String,
        #[arg(
            long,
            help = "SDLC phase for kind 'generic': design, development, testing, deployment, maintenance"
        )]
        phase: Option<String>,
        #[arg(long, short, help = "Free-text project description")]
        input: Option<String>,
        #[arg(long, help = "Read the description from a file")]
        input_file: Option<PathBuf>,
    },

    /// Show the merged configuration
    Config {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
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
        eprintln!("\x1b[31mPreppy encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

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
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: Config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    match cli.command {
        Commands::Serve { port, bind } => {
            commands::serve::run(config, port, bind)?;
        }
        Commands::Generate {
            kind,
            phase,
            input,
            input_file,
        } => {
            commands::generate::run(
                config,
                commands::generate::GenerateOptions {
                    kind,
                    phase,
                    input,
                    input_file,
                },
            )?;
        }
        Commands::Config { format } => {
            commands::config::show(&config, &format)?;
        }
    }

    Ok(())
}
