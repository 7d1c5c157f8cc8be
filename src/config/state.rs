// Application state module
// Holds the immutable configuration and the request handler built from it

use std::path::PathBuf;

use super::types::Config;
use crate::handler::{DirectoryServer, StaticFileHandler};

/// Application state, shared read-only by every connection
pub struct AppState {
    pub config: Config,
    pub handler: StaticFileHandler<DirectoryServer>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let root = PathBuf::from(&config.site.root);
        let fallback = DirectoryServer::new(root.clone(), config.site.index_files.clone());

        Self {
            config: config.clone(),
            handler: StaticFileHandler::new(root, fallback),
        }
    }

    /// Value sent in the `Server` header
    pub fn server_name(&self) -> &str {
        &self.config.http.server_name
    }
}
