//! CLI for the gogcheck installation verifier.

mod commands;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use gogcheck_core::config;
use gogcheck_core::options::{Platform, VerifyOptions};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{run_dump_md5sums, run_verify};

/// Top-level CLI for the gogcheck installation verifier.
#[derive(Debug, Parser)]
#[command(name = "gogcheck")]
#[command(about = "Verify a GOG game installation against the official manifest hashes", long_about = None)]
pub struct Cli {
    /// Suppress all output. The exit status still reports the result.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// OS the installation was published for (defaults from config).
    #[arg(short = 'o', long = "os", global = true, value_name = "OS", value_parser = Platform::parse)]
    pub os: Option<Platform>,

    /// Language of the installation; "*" matches every depot (defaults from config).
    #[arg(short = 'l', long, global = true, value_name = "LANG")]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Verify an installed game directory against its published manifest.
    Verify {
        /// Directory where the game is installed.
        path: PathBuf,
    },

    /// Dump all md5 checksums of a build to stdout (md5sum format); no local comparison.
    DumpMd5sums {
        /// Product (game) identifier.
        product_id: String,
        /// Build identifier.
        build_id: String,
    },
}

impl Cli {
    /// Parse arguments, dispatch, and map the result onto the exit status.
    /// Quiet suppresses the error text but never changes the status.
    pub fn run_from_args() -> ExitCode {
        let cli = Cli::parse();
        let quiet = cli.quiet;
        match cli.run() {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(err) => {
                if !quiet {
                    eprintln!("gogcheck error: {err:#}");
                }
                ExitCode::FAILURE
            }
        }
    }

    /// Returns Ok(true) on a clean run, Ok(false) when verification found
    /// problems, Err on fatal preconditions (metadata, build lookup, network).
    fn run(self) -> Result<bool> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let platform = match self.os {
            Some(p) => p,
            None => cfg
                .default_os
                .parse::<Platform>()
                .map_err(|e| anyhow!("default_os in config: {e}"))?,
        };
        let opts = VerifyOptions {
            quiet: self.quiet,
            platform,
            language: self
                .language
                .unwrap_or_else(|| cfg.default_language.clone()),
        };

        match self.command {
            CliCommand::Verify { path } => run_verify(&cfg, &opts, &path),
            CliCommand::DumpMd5sums {
                product_id,
                build_id,
            } => {
                run_dump_md5sums(&cfg, &opts, product_id, build_id)?;
                Ok(true)
            }
        }
    }
}
