//! YANG Model Inspector CLI
//!
//! Loads compiled model blobs into a registry and reports what it resolves.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yang_runtime::{RuntimeConfig, SchemaModel, YangModelRegistry};

#[derive(Parser)]
#[command(name = "yang-inspect")]
#[command(about = "Inspect compiled YANG models and runtime configuration")]
struct Cli {
    /// Explicit configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the modules and revisions of one or more model blobs
    Modules {
        /// Model blob files (JSON)
        #[arg(required = true)]
        models: Vec<PathBuf>,
    },

    /// Resolve a module by name or name@revision
    Resolve {
        /// Model blob files (JSON)
        #[arg(required = true)]
        models: Vec<PathBuf>,
        /// Module name, optionally with @revision
        #[arg(short, long)]
        name: String,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    let config = match RuntimeConfig::load_from(cli.config.as_deref().and_then(|p| p.to_str())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    if let Err(e) = run(cli.command, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(models: &[PathBuf], config: &RuntimeConfig) -> anyhow::Result<YangModelRegistry> {
    let mut registry = YangModelRegistry::with_config(config.registry.clone());
    for path in models {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let model = SchemaModel::from_json(&json)
            .with_context(|| format!("compiling {}", path.display()))?;
        registry
            .register_model(model, &[])
            .with_context(|| format!("registering {}", path.display()))?;
    }
    Ok(registry)
}

fn run(command: Commands, config: RuntimeConfig) -> anyhow::Result<()> {
    match command {
        Commands::Modules { models } => {
            let registry = load(&models, &config)?;
            for module in registry.modules() {
                let revision = module
                    .revision()
                    .map_or_else(|| "-".to_string(), |r| r.to_string());
                println!(
                    "{:<32} {:<12} {:<40} ({})",
                    module.name(),
                    revision,
                    module.namespace().unwrap_or(""),
                    module.model().id()
                );
            }
            Ok(())
        }

        Commands::Resolve { models, name } => {
            let registry = load(&models, &config)?;
            let Some(module) = registry.get_for_schema_name(&name) else {
                bail!("no module registered for '{}'", name);
            };
            let revision = module
                .revision()
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            println!("{} {} from model {}", module.name(), revision, module.model().id());
            for child in module.children() {
                match child.class_name() {
                    Some(class) => {
                        println!("  {:<14} {:<32} {}", child.kind(), child.name(), class)
                    }
                    None => println!("  {:<14} {}", child.kind(), child.name()),
                }
            }
            Ok(())
        }

        Commands::Config => {
            let rendered = toml::to_string_pretty(&config)?;
            print!("{}", rendered);
            Ok(())
        }
    }
}
