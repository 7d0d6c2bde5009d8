use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_PORT, ENV_STORE_API_KEY, ENV_STORE_TIMEOUT_SECS,
    ENV_STORE_URL,
};

#[derive(Parser)]
#[command(name = "puffboard")]
#[command(version, about = "Vector store namespace dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Enable debug logging of compiled query requests
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Base URL of the remote store API
    #[arg(long, global = true, env = ENV_STORE_URL)]
    pub store_url: Option<String>,

    /// API key for the remote store
    #[arg(long, global = true, env = ENV_STORE_API_KEY, hide_env_values = true)]
    pub store_api_key: Option<String>,

    /// Request timeout for store calls, in seconds
    #[arg(long, global = true, env = ENV_STORE_TIMEOUT_SECS)]
    pub store_timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default when no command is given)
    Start,
}

/// CLI configuration extracted from parsed arguments
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub debug: bool,
    pub store_url: Option<String>,
    pub store_api_key: Option<String>,
    pub store_timeout_secs: Option<u64>,
}

/// Parse command-line arguments into config and command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();

    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        debug: cli.debug,
        store_url: cli.store_url,
        store_api_key: cli.store_api_key,
        store_timeout_secs: cli.store_timeout_secs,
    };

    (config, cli.command)
}
