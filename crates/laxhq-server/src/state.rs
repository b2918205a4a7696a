use std::path::PathBuf;

/// Shared application state passed to all route handlers. The store is
/// file-backed, so handlers read fresh state per request; only the project
/// root is held here.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}
