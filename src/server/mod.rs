//! HTTP server
//!
//! Binds a `tiny_http` listener and serves requests from a small pool of
//! worker threads that share one listener and one store.
//!
//! - [`routes`] - routing, body parsing and response conversion
//! - [`static_files`] - the production client bundle

pub mod routes;
pub mod static_files;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tiny_http::Server;

use crate::config::{ConfigError, ServerConfig};
use crate::storage::TodoStore;

pub use routes::AppState;

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: String,
        /// Underlying error from the listener
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A worker thread could not be started
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A bound, not yet running, todo server
pub struct TodoServer {
    http: Arc<Server>,
    state: Arc<AppState>,
    workers: usize,
    stopping: Arc<AtomicBool>,
}

impl std::fmt::Debug for TodoServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoServer")
            .field("addr", &self.local_addr())
            .field("workers", &self.workers)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TodoServer {
    /// Validate the config and bind the listener
    pub fn bind(config: &ServerConfig, store: Arc<TodoStore>) -> Result<Self, ServerError> {
        config.validate()?;

        let addr = config.bind_addr();
        let http = Server::http(&addr).map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            http: Arc::new(http),
            state: Arc::new(AppState {
                store,
                static_root: config.static_root(),
            }),
            workers: config.workers,
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address actually bound (useful with port 0)
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// A handle that can stop [`run`](Self::run) from another thread
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            http: Arc::clone(&self.http),
            workers: self.workers,
            stopping: Arc::clone(&self.stopping),
        }
    }

    /// Serve requests until shut down
    ///
    /// The calling thread is one of the workers.
    pub fn run(self) -> Result<(), ServerError> {
        let mut handles = Vec::with_capacity(self.workers.saturating_sub(1));
        for n in 1..self.workers {
            let http = Arc::clone(&self.http);
            let state = Arc::clone(&self.state);
            let stopping = Arc::clone(&self.stopping);
            let spawned = thread::Builder::new()
                .name(format!("tasklist-worker-{n}"))
                .spawn(move || serve(&http, &state, &stopping));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop_workers(&self.http, &self.stopping, handles);
                    return Err(ServerError::Spawn(e));
                },
            }
        }

        serve(&self.http, &self.state, &self.stopping);

        join_workers(handles);
        log::info!("Server stopped");
        Ok(())
    }
}

/// Wake and join workers that are blocked in `recv`
fn stop_workers(http: &Server, stopping: &AtomicBool, handles: Vec<JoinHandle<()>>) {
    stopping.store(true, Ordering::SeqCst);
    for _ in 0..handles.len() {
        http.unblock();
    }
    join_workers(handles);
}

fn join_workers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            log::error!("Worker thread panicked");
        }
    }
}

/// Worker loop: pull requests off the shared listener until stopped
fn serve(http: &Server, state: &AppState, stopping: &AtomicBool) {
    loop {
        match http.recv() {
            Ok(request) => routes::respond(state, request),
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(e) => log::warn!("Failed to accept connection: {e}"),
        }
    }
}

/// Stops a running [`TodoServer`]
pub struct ShutdownHandle {
    http: Arc<Server>,
    workers: usize,
    stopping: Arc<AtomicBool>,
}

impl std::fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHandle")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl ShutdownHandle {
    /// Ask every worker to return once its current request is done
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        // Each unblock wakes exactly one blocked recv
        for _ in 0..self.workers {
            self.http.unblock();
        }
    }
}
