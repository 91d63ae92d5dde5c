//! Content-addressed disk cache for tile bytes.
//!
//! Every fully-resolved request URL maps to exactly one file:
//!
//! ```text
//! <root>/<folder>/<hash>
//! ```
//!
//! where `<hash>` is the MD5 digest of the URL, hex-encoded (32 lowercase
//! characters). There is no index and no metadata
//! sidecar: a cache hit is a successful path probe. Nothing is ever evicted;
//! deleting the folder is the only way to clear it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use md5::{Digest, Md5};

use crate::error::TileError;

/// Default cache folder name under the persistent-storage root.
pub const DEFAULT_CACHE_FOLDER: &str = "TILE_CACHE";

/// Length of a cache file name in hex characters.
pub const CACHE_HASH_LEN: usize = 32;

/// Distinguishes concurrent temporary files written by this process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hash a cache key into its 32-character file name.
pub fn cache_key_hash(key: &str) -> String {
    hex::encode(Md5::digest(key.as_bytes()))
}

// =============================================================================
// Tile Cache Store
// =============================================================================

/// Disk-backed tile store rooted at an injected persistent-storage directory.
///
/// The store holds no state besides its root, so clones and concurrent
/// callers need no coordination. Directory creation is idempotent and writes
/// go through a temporary file plus rename, so racing writers to the same
/// path resolve as last-write-wins without torn files.
#[derive(Debug, Clone)]
pub struct TileCacheStore {
    root: PathBuf,
}

impl TileCacheStore {
    /// Create a store under the given persistent-storage root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The persistent-storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entries of `folder`.
    pub fn folder_path(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    /// Cache file path for `key` inside `folder`, without touching the disk.
    pub fn path_for(&self, key: &str, folder: &str) -> PathBuf {
        self.folder_path(folder).join(cache_key_hash(key))
    }

    /// Resolve the cache file path for `key`, creating `<root>/<folder>` and
    /// any missing parents first.
    ///
    /// On failure the caller can still recover the path with [`Self::path_for`].
    pub async fn resolve_cache_path(&self, key: &str, folder: &str) -> Result<PathBuf, TileError> {
        let dir = self.folder_path(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TileError::DirectoryCreationFailed {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(dir.join(cache_key_hash(key)))
    }

    /// Whether something exists at `path`. The contents are not validated.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Read the full contents of a cache entry.
    pub async fn read(&self, path: &Path) -> Result<Bytes, TileError> {
        tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|e| TileError::CacheReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    /// Write `data` to `path`, replacing any existing entry.
    ///
    /// The bytes land in a temporary sibling first and are renamed into place.
    pub async fn write(&self, path: &Path, data: &[u8]) -> Result<(), TileError> {
        let write_failed = |e: std::io::Error| TileError::CacheWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let temp_path = temp_path_for(path);
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(write_failed)?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_failed(e));
        }

        Ok(())
    }
}

/// Hidden, process-unique sibling of `path` used for atomic writes.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
}

// =============================================================================
// Tests
// =============================================================================
