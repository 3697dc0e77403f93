//! Command-line arguments.

use clap::{Parser, Subcommand};
use customer_core::{ClientConfig, ConfigError};

/// Manage customers from the terminal.
#[derive(Parser, Debug)]
#[command(name = "customer-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the customer API
    #[arg(long, env = "API_BASE_URL")]
    pub base_url: Option<String>,

    /// Login user name
    #[arg(short, long, env = "API_USERNAME")]
    pub username: String,

    /// Login password
    #[arg(short, long, env = "API_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Log HTTP traffic (method, URL and status) to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Client settings from `lookup`, with `--base-url` taking precedence
    /// over `API_BASE_URL`.
    pub fn client_config<F>(&self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        ClientConfig::from_lookup(|key| match (key, &self.base_url) {
            ("API_BASE_URL", Some(base_url)) => Some(base_url.clone()),
            _ => lookup(key),
        })
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every customer
    List,

    /// Register a new customer
    Create(CustomerArgs),

    /// Replace a customer's name and email
    Update {
        /// Customer id
        id: i64,

        #[command(flatten)]
        fields: CustomerArgs,
    },

    /// Delete a customer
    Delete {
        /// Customer id
        id: i64,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct CustomerArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,
}
