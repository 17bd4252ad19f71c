//! Channel map loading with a single-flight cache
//!
//! The regulatory table lives outside the engine (on the device filesystem,
//! behind an RPC endpoint, baked into a test). [`TableSource`] is the narrow
//! seam over that transport; [`ChannelMapLoader`] fetches through it once,
//! parses, and hands every caller a shared [`ChannelMap`].
//!
//! The loader is an owned object, not a process-wide singleton. Whoever
//! constructs the resolver constructs the loader and passes it along; two
//! loaders mean two fetches by design, while one loader shared across any
//! number of threads performs exactly one.
//!
//! A failed fetch is not an error to callers. The resolver is expected to
//! come up with empty sub-gigahertz option sets rather than refuse to load,
//! so the loader logs a warning and caches the empty map as its terminal
//! value.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::channel_map::ChannelMap;

/// Errors produced by table transports.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Table transport failed: {0}")]
    Transport(String),
}

/// Transport seam for retrieving the raw regulatory table text.
pub trait TableSource: Send + Sync {
    fn fetch(&self) -> Result<String, FetchError>;
}

/// Reads the table from a file on the device.
#[derive(Debug, Clone)]
pub struct FileTableSource {
    path: PathBuf,
}

impl FileTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileTableSource {
    fn fetch(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|err| FetchError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })
    }
}

/// Serves table text held in memory.
///
/// Useful for embedders that already transported the table themselves, and
/// for benches and tests.
#[derive(Debug, Clone)]
pub struct StaticTableSource {
    text: String,
}

impl StaticTableSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TableSource for StaticTableSource {
    fn fetch(&self) -> Result<String, FetchError> {
        Ok(self.text.clone())
    }
}

/// Lazily fetches and parses the channel map, once per loader.
///
/// The first `load` call runs the fetch and parse; concurrent callers block
/// on the same initialisation and every caller receives a clone of the same
/// `Arc`. The result, degraded or not, is cached for the loader's lifetime.
pub struct ChannelMapLoader {
    source: Box<dyn TableSource>,
    cell: OnceLock<Arc<ChannelMap>>,
}

impl ChannelMapLoader {
    pub fn new(source: Box<dyn TableSource>) -> Self {
        Self {
            source,
            cell: OnceLock::new(),
        }
    }

    /// Loader over a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileTableSource::new(path)))
    }

    /// Fetch, parse and cache the channel map.
    ///
    /// Exactly one underlying fetch happens per loader regardless of how
    /// many threads call this concurrently. A transport failure resolves to
    /// the empty map.
    pub fn load(&self) -> Arc<ChannelMap> {
        self.cell
            .get_or_init(|| match self.source.fetch() {
                Ok(text) => Arc::new(ChannelMap::parse(&text)),
                Err(err) => {
                    warn!(error = %err, "channel map fetch failed, continuing with an empty map");
                    Arc::new(ChannelMap::default())
                }
            })
            .clone()
    }

    /// The cached map, if a load already completed.
    pub fn loaded(&self) -> Option<Arc<ChannelMap>> {
        self.cell.get().cloned()
    }
}
