//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the vitrine binary.

mod cache;
mod commands;
mod resolve;

pub use cache::handle_cache_command;
pub use commands::{Cli, Commands};
pub use resolve::{run_chain, run_fallback, run_record, run_resolve};

use std::path::Path;
use std::sync::Arc;
use vitrine::{FileSystemStore, ImageResolver, ResolverConfig, VitrineResult};

/// Build the resolver from configuration and the on-disk failure store.
///
/// Without `--config` the layered configuration is loaded. Without
/// `--store` failures live under the user cache directory.
pub fn open_resolver(config: Option<&Path>, store: Option<&Path>) -> VitrineResult<ImageResolver> {
    let config = match config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::load()?,
    };

    let store_dir = match store {
        Some(dir) => dir.to_path_buf(),
        None => dirs::cache_dir()
            .map(|dir| dir.join("vitrine"))
            .unwrap_or_else(|| Path::new(".vitrine").to_path_buf()),
    };
    tracing::debug!(store = %store_dir.display(), "Opening failure store");

    let store = FileSystemStore::new(store_dir)?;
    Ok(ImageResolver::new(config, Arc::new(store)))
}
