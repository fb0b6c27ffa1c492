//! Prebuilt client bundle
//!
//! In production the browser client is served from a directory on disk.
//! Unknown paths fall back to `index.html` so client-side routes load the app.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::api::ApiError;

const INDEX_FILE: &str = "index.html";

/// A file read from the bundle
#[derive(Debug, Clone)]
pub struct Asset {
    /// File contents
    pub body: Vec<u8>,
    /// Guessed from the file extension
    pub content_type: String,
}

/// Map a URL path to a file inside `root`
///
/// Returns `None` for paths that try to leave the bundle directory.
#[must_use]
pub fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {},
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if resolved.is_dir() {
        resolved.push(INDEX_FILE);
    }
    Some(resolved)
}

/// Load the asset for a URL path, falling back to the bundle's `index.html`
///
/// Paths that leave the bundle directory are 404, never the fallback.
pub fn load(root: &Path, url_path: &str) -> Result<Asset, ApiError> {
    let resolved = resolve(root, url_path).ok_or_else(ApiError::route_not_found)?;
    let path = if resolved.is_file() { resolved } else { root.join(INDEX_FILE) };

    if !path.is_file() {
        return Err(ApiError::route_not_found());
    }

    let body = fs::read(&path)
        .map_err(|e| ApiError::internal(format!("failed to read {}: {e}", path.display())))?;
    let content_type = mime_guess::from_path(&path).first_or_octet_stream().to_string();

    Ok(Asset { body, content_type })
}
