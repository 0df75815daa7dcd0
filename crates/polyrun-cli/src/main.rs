//! Polyrun CLI
//!
//! Runs a local source file through the execution pipeline, or serves the
//! HTTP API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyrun::{Config, EXAMPLE_CONFIG, ExecutionRequest, Pipeline};
use polyrun_server::{PolyrunServer, ServerConfig};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyrun")]
#[command(about = "Compile and run Python, C, C++ and Java code")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: polyrun.toml)
        #[arg(short, long, default_value = "polyrun.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a program (compile if needed, then execute)
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language tag (python, c, cpp, java); inferred from FILE when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Print the execution result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:8000")]
        bind: SocketAddr,

        /// Allowed CORS origin (repeatable; any origin when omitted)
        #[arg(long = "cors-origin", value_name = "ORIGIN")]
        cors_origins: Vec<String>,
    },

    /// List available languages
    Languages,

    /// Show effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            json,
        } => run_file(load_config(cli.config.as_deref())?, &source, language, json).await,
        Commands::Serve { bind, cors_origins } => {
            serve(load_config(cli.config.as_deref())?, bind, cors_origins).await
        }
        Commands::Languages => {
            list_languages(&load_config(cli.config.as_deref())?);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&load_config(cli.config.as_deref())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => info!(?path, "loading configuration"),
        None => debug!("using default configuration"),
    }
    Config::load(path).context("failed to load configuration")
}

async fn run_file(config: Config, source: &Path, language: Option<String>, json: bool) -> Result<()> {
    let code = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("failed to read source file '{}'", source.display()))?;

    let request = match language {
        Some(tag) => ExecutionRequest::from_language(code, tag),
        None => {
            let filename = source
                .file_name()
                .context("source path has no file name")?
                .to_string_lossy()
                .into_owned();
            ExecutionRequest::from_filename(code, filename)
        }
    };

    let result = Pipeline::new(config)
        .execute(&request)
        .await
        .context("execution failed")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to encode result")?
        );
    } else {
        print!("{}", result.output);
        if !result.error.is_empty() {
            eprint!("{}", result.error);
        }
    }

    info!(
        language = %result.language,
        success = result.success,
        time = format_args!("{}s", result.execution_time),
        "execution result"
    );

    if result.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

async fn serve(config: Config, bind: SocketAddr, cors_origins: Vec<String>) -> Result<()> {
    let mut server_config = ServerConfig::new().with_bind_addr(bind);
    if !cors_origins.is_empty() {
        server_config = server_config.with_cors_origins(cors_origins);
    }

    PolyrunServer::with_config(Pipeline::new(config), server_config)
        .serve()
        .await
        .context("server failed")
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    for (language, toolchain) in config.languages.iter() {
        let kind = if toolchain.is_compiled() {
            "compiled"
        } else {
            "interpreted"
        };
        println!(
            "  {:<8} {:<6} {:<12} {}",
            language.as_str(),
            language.extension(),
            kind,
            toolchain.run.command.join(" ")
        );
    }
}

fn show_config(config: &Config) {
    println!("Timeout: {}s", config.timeout);
    println!("Workspace root: {}", config.workspace_root().display());
    println!("Workspace prefix: {}", config.workspace_prefix);
    println!();
    println!("Toolchains:");
    for (language, toolchain) in config.languages.iter() {
        println!("  {language}:");
        println!("    source: {}", toolchain.source_name);
        if let Some(ref compile) = toolchain.compile {
            println!("    compile: {}", compile.command.join(" "));
            println!("    output: {}", compile.output_name);
        }
        println!("    run: {}", toolchain.run.command.join(" "));
    }
}

async fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
