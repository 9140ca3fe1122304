// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! modload CLI - inspect how module specifiers resolve and load

use clap::{Parser, Subcommand};
use modload_core::package_json::{has_declared_type, TraversalState};
use modload_core::{
    classify_type, locate_descriptor, FsHost, LoaderConfig, Location, ModuleLoader,
    ModuleSpecifier, VERSION,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "modload",
    about = "package.json-aware module resolution and loading",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Config file (defaults to $MODLOAD_CONFIG, then ./modload.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory relative specifiers resolve against
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a specifier without loading it
    Resolve {
        specifier: String,
        /// Boundary for the module type lookup
        #[arg(long, value_name = "DIR")]
        basepath: Option<PathBuf>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the module type of a file
    Type {
        path: PathBuf,
        /// Boundary for the module type lookup
        #[arg(long, value_name = "DIR")]
        basepath: Option<PathBuf>,
    },

    /// Find the package.json governing a file
    Locate {
        path: PathBuf,
        /// Stop the walk at this directory
        #[arg(long, value_name = "DIR")]
        basepath: Option<PathBuf>,
        /// Skip descriptors without a "type" field
        #[arg(long)]
        typed: bool,
    },

    /// Resolve and read a module through the filesystem host
    Load {
        specifier: String,
        /// Boundary for the module type lookup
        #[arg(long, value_name = "DIR")]
        basepath: Option<PathBuf>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "modload=debug,modload_core=debug"
    } else {
        "modload=warn,modload_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = LoaderConfig::load(cli.config.as_deref())?;
    if let Some(cwd) = cli.cwd {
        config.cwd = Some(cwd);
    }
    let cwd = config.working_dir()?;
    let in_cwd = |path: Option<PathBuf>| path.map(|p| cwd.join(p));

    match cli.command {
        Command::Resolve {
            specifier,
            basepath,
            json,
        } => {
            let loader = ModuleLoader::with_config(FsHost::from_config(&config)?, config);
            let basepath = in_cwd(basepath);
            let resolved = loader.resolve(&ModuleSpecifier::from(specifier), basepath.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{} {}", resolved.load_kind.cyan(), resolved.load_path);
                if let Some(path) = &resolved.file_path {
                    println!("  {} {}", "file".dimmed(), path.display());
                }
            }
        }

        Command::Type { path, basepath } => {
            let package_type = classify_type(cwd.join(path), in_cwd(basepath).map(Location::from));
            println!("{}", package_type);
        }

        Command::Locate {
            path,
            basepath,
            typed,
        } => {
            let predicate = typed.then_some(&has_declared_type as &dyn Fn(&TraversalState) -> bool);
            let descriptor = locate_descriptor(
                cwd.join(path),
                in_cwd(basepath).map(Location::from),
                predicate,
            )?;

            println!("{}", descriptor.path.display());
            print_field("name", descriptor.name());
            print_field("version", descriptor.version());
            print_field("type", descriptor.package_type());
        }

        Command::Load {
            specifier,
            basepath,
            json,
        } => {
            let loader = ModuleLoader::with_config(FsHost::from_config(&config)?, config);
            let basepath = in_cwd(basepath);
            let loaded = loader.load(specifier, basepath.as_deref()).await?;

            if json {
                let value = serde_json::json!({
                    "specifier": loaded.specifier,
                    "filePath": loaded.file_path,
                    "loadPath": loaded.load_path,
                    "isESM": loaded.is_esm,
                    "loadKind": loaded.load_kind,
                    "module": loaded.module,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} {}", loaded.load_kind.green(), loaded.load_path);
                print!("{}", loaded.module.source);
                if !loaded.module.source.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {} {}", label.dimmed(), value);
    }
}
