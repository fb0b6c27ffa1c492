//! Server configuration
//!
//! Every option can be given on the command line or through the environment
//! (`PORT`, `HOST`, `NODE_ENV`, ...). The binary loads a `.env` file before
//! parsing, so deployments can keep these next to the executable.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Environment name that turns on production mode
pub const PRODUCTION_ENV: &str = "production";

/// Errors found while validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// At least one worker is needed to serve requests
    #[error("workers must be at least 1")]
    ZeroWorkers,

    /// Production mode needs the client bundle on disk
    #[error("static bundle directory not found: {0}")]
    MissingStaticDir(PathBuf),
}

/// tasklist - in-memory todo list REST service
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklist",
    version,
    about = "In-memory todo list REST service",
    long_about = "Serve a small todo list over a JSON REST API under /api.\n\n\
                  Todos live in memory for the lifetime of the process. In production \
                  mode the prebuilt browser client is served for every other GET path."
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Deployment environment name; `production` serves the client bundle
    #[arg(long = "env", env = "NODE_ENV", default_value = "development")]
    pub environment: String,

    /// Shorthand for `--env production`
    #[arg(long)]
    pub production: bool,

    /// Directory holding the prebuilt client bundle
    #[arg(long, env = "STATIC_DIR", default_value = "build")]
    pub static_dir: PathBuf,

    /// Number of request worker threads
    #[arg(short, long, env = "WORKERS", default_value_t = 1)]
    pub workers: usize,

    /// Start with an empty list instead of the demo todos
    #[arg(long)]
    pub no_seed: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            environment: "development".to_string(),
            production: false,
            static_dir: PathBuf::from("build"),
            workers: 1,
            no_seed: false,
            verbose: false,
        }
    }
}

impl ServerConfig {
    /// Config for tests and embedding: loopback, ephemeral port, empty list
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            no_seed: true,
            ..Self::default()
        }
    }

    /// Whether the client bundle should be served
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.production || self.environment.eq_ignore_ascii_case(PRODUCTION_ENV)
    }

    /// Name of the effective environment, for logging
    #[must_use]
    pub const fn environment_name(&self) -> &str {
        if self.production { PRODUCTION_ENV } else { self.environment.as_str() }
    }

    /// Whether the store should start with the demo todos
    #[must_use]
    pub const fn seed(&self) -> bool {
        !self.no_seed
    }

    /// The `host:port` string to bind
    #[must_use]
    pub fn bind_addr(&self) -> String {
        self.host.parse::<IpAddr>().map_or_else(
            |_| format!("{}:{}", self.host, self.port),
            |ip| SocketAddr::new(ip, self.port).to_string(),
        )
    }

    /// The bundle directory, if production mode is on
    #[must_use]
    pub fn static_root(&self) -> Option<PathBuf> {
        self.is_production().then(|| self.static_dir.clone())
    }

    /// Check the configuration before binding
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.is_production() && !self.static_dir.is_dir() {
            return Err(ConfigError::MissingStaticDir(self.static_dir.clone()));
        }
        Ok(())
    }
}
