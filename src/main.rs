//! tasklist - in-memory todo list REST service
//!
//! Serves the todo API under `/api` and, in production, the prebuilt
//! browser client for every other GET path.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use tasklist::config::ServerConfig;
use tasklist::server::TodoServer;
use tasklist::storage::TodoStore;

/// Main entry point for the tasklist server
fn main() -> anyhow::Result<()> {
    // A missing .env file is normal; an unreadable one is not
    let env_file = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e).context("failed to load .env file"),
    };

    let config = ServerConfig::parse();

    if config.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Some(path) = env_file {
        log::debug!("Loaded environment from {}", path.display());
    }

    let store = if config.seed() {
        TodoStore::seeded()
    } else {
        TodoStore::new()
    };

    let server = TodoServer::bind(&config, Arc::new(store))?;
    let port = server.local_addr().map_or(config.port, |addr| addr.port());

    log::info!("tasklist v{} listening on {}", tasklist::VERSION, config.bind_addr());
    log::info!("Environment: {}", config.environment_name());
    log::info!("Health check: http://localhost:{port}/api/health");
    if let Some(root) = config.static_root() {
        log::info!("Serving client bundle from {}", root.display());
    }

    server.run()?;
    Ok(())
}
