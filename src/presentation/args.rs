//! Command-line surfaces of the three binaries

use crate::domain::settings::Settings;
use crate::infrastructure::rpc::protocol::DEFAULT_ADDRESS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flags of the `zeid` daemon. Every flag that is given overrides the value
/// from the settings file.
#[derive(Parser, Debug, Default)]
#[command(name = "zeid", version, about = "Track time by flipping a ZEI device")]
pub struct DaemonArgs {
    /// Settings file (defaults to <config dir>/zei/settings.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only connect to the device with this serial number
    #[arg(long)]
    pub serial_number: Option<String>,

    #[arg(long, env = "ZEI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ZEI_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Append the device side to "starting" notifications
    #[arg(long)]
    pub show_side: bool,

    /// Address for the local RPC server, e.g. ":8594"
    #[arg(long)]
    pub api_addr: Option<String>,

    /// Base URL of the remote tracking API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Log transitions instead of showing desktop notifications
    #[arg(long)]
    pub no_notifications: bool,
}

impl DaemonArgs {
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(serial) = &self.serial_number {
            settings.serial_number = Some(serial.clone());
        }
        if let Some(key) = &self.api_key {
            settings.api_key = key.clone();
        }
        if let Some(secret) = &self.api_secret {
            settings.api_secret = secret.clone();
        }
        if self.show_side {
            settings.show_side = true;
        }
        if let Some(addr) = &self.api_addr {
            settings.listen_addr = addr.clone();
        }
        if let Some(url) = &self.api_url {
            settings.api_base_url = url.clone();
        }
        if self.no_notifications {
            settings.notifications_enabled = false;
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "zei", version, about = "Query and control a running zeid")]
pub struct CliArgs {
    /// Address of the daemon
    #[arg(long, global = true, default_value = DEFAULT_ADDRESS)]
    pub api: String,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Show the activity being tracked
    Status,
    /// List all activities and their sides
    Activities,
    /// Assign an activity to the side the device shows now
    Assign {
        #[arg(long)]
        id: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "zei-tray", version, about = "ZEI status window")]
pub struct TrayArgs {
    /// Address of the daemon
    #[arg(long, alias = "api-addr", default_value = DEFAULT_ADDRESS)]
    pub api: String,
}
