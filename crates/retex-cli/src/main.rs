//! ReTex CLI - texture import planning and extraction for glTF documents
//!
//! This binary provides commands for listing the texture slots a glTF
//! document requires and for fetching, recombining, and writing those
//! textures.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

// Use modules from the library crate
use retex_cli::commands;

/// ReTex - Texture Import and Recombination
#[derive(Parser)]
#[command(name = "retex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the texture slots a glTF document would import
    Plan {
        /// Path to the .gltf or .glb document
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Fetch, recombine, and write every planned texture slot
    Extract {
        /// Path to the .gltf or .glb document
        #[arg(short, long)]
        input: String,

        /// Directory converted textures are written into
        #[arg(short, long)]
        out_root: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Substitute neutral defaults for failed non-primary channels
        /// instead of failing the slot
        #[arg(long)]
        substitute_defaults: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { input, json } => commands::plan::run(&input, json),
        Commands::Extract {
            input,
            out_root,
            json,
            substitute_defaults,
        } => commands::extract::run(&input, &out_root, json, substitute_defaults).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
