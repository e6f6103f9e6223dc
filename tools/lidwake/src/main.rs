//! Host tool for the Surface lid wakeup quirk.
//!
//! Usage:
//!   lidwake table [--json]          - Print the quirk table
//!   lidwake match                   - Report whether this machine needs the quirk
//!   lidwake modalias                - Print the module aliases
//!   lidwake simulate [--fail OP]    - Dry-run the driver against simulated firmware
//!
//! `match` and `simulate` read the machine identity from sysfs unless an
//! identity file or a `[identity]` table in the configuration replaces it.

mod config;
mod logging;
mod report;
mod simulate;
mod sysfs;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lidwake_core::log::LogLevel;
use lidwake_driver_api::SystemIdentity;
use lidwake_driver_api::sim::FirmwareOps;

use crate::config::{Config, IdentityFile};
use crate::simulate::Phase;

#[derive(Parser)]
#[command(name = "lidwake")]
#[command(about = "Inspect and dry-run the Surface lid wakeup quirk")]
struct Cli {
    /// Configuration file (default: lidwake.toml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: fatal, error, warn, info, debug, trace
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the models that need the lid wakeup quirk
    Table {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// Report whether this machine needs the quirk, and with which GPE
    Match {
        #[command(flatten)]
        source: IdentitySource,
    },

    /// Print the dmi: module aliases derived from the table
    Modalias,

    /// Run init, suspend, resume and exit against simulated firmware
    Simulate {
        #[command(flatten)]
        source: IdentitySource,

        /// Firmware operation to fail once: get-handle, mark-wake, enable,
        /// disable, set-wake-mask
        #[arg(long, value_parser = parse_op)]
        fail: Option<FirmwareOps>,

        /// Phase in which the failure is armed
        #[arg(long, value_enum, default_value_t = Phase::Init, requires = "fail")]
        phase: Phase,
    },
}

/// Where the machine identity comes from.
#[derive(Args)]
struct IdentitySource {
    /// Root of the sysfs tree to read DMI attributes from (default: /sys)
    #[arg(long)]
    sysfs_root: Option<PathBuf>,

    /// TOML file with sys-vendor, product-name and product-sku keys
    #[arg(long, conflicts_with = "sysfs_root")]
    identity: Option<PathBuf>,
}

impl IdentitySource {
    /// Resolves the identity: CLI flags first, then the configuration, then `/sys`.
    fn resolve(&self, config: &Config) -> Result<SystemIdentity> {
        if let Some(path) = &self.identity {
            return Ok(IdentityFile::load(path)?.into_identity());
        }
        if let Some(root) = &self.sysfs_root {
            return sysfs::read_identity(root);
        }
        if let Some(identity) = &config.identity {
            return Ok(identity.clone().into_identity());
        }
        sysfs::read_identity(&config.sysfs_root())
    }
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(s).ok_or_else(|| format!("unknown log level '{s}'"))
}

fn parse_op(s: &str) -> Result<FirmwareOps, String> {
    FirmwareOps::from_op_name(s).ok_or_else(|| format!("unknown firmware operation '{s}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let level = match cli.log_level {
        Some(level) => level,
        None => config.log_level()?,
    };
    logging::init(level);

    match cli.command {
        Commands::Table { json } => report::table(json),
        Commands::Match { source } => {
            let identity = source.resolve(&config)?;
            report::matched(&identity);
            Ok(())
        }
        Commands::Modalias => {
            report::modalias();
            Ok(())
        }
        Commands::Simulate {
            source,
            fail,
            phase,
        } => {
            let identity = source.resolve(&config)?;
            simulate::run(&identity, fail.map(|ops| (ops, phase)))
        }
    }
}
