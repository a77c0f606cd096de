//! Render cache: rendered bytes keyed by (domain, locales, format).
//!
//! Keys are built only from validated parts and are validated again before
//! they address storage. File-backed writes go to a temporary file in the
//! cache directory and are renamed into place, so readers see either the
//! previous entry, no entry, or the complete new one. Keys too long for a
//! file name are never stored.

use crate::error::RenderError;
use crate::i18n::{join_locales, IdentifierValidator, LocaleToken, MAX_CACHE_KEY_LEN};
use crate::render::Format;
use std::fmt;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A cache key that passed the cache-key character set check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build `<domain>.<locale,locale,...>.<extension>`.
    pub fn new(domain: &str, locales: &[LocaleToken], format: Format) -> Result<Self, RenderError> {
        Self::parse(&format!(
            "{}.{}.{}",
            domain,
            join_locales(locales),
            format.extension()
        ))
    }

    /// Accept a raw key only if it is safe to use as a single file name.
    pub fn parse(key: &str) -> Result<Self, RenderError> {
        if IdentifierValidator::is_valid_cache_key(key) {
            Ok(CacheKey(key.to_string()))
        } else {
            Err(RenderError::InvalidCacheKey(key.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is short enough to be used as a file name.
    pub fn is_storable(&self) -> bool {
        self.0.len() <= MAX_CACHE_KEY_LEN
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-addressable store of rendered output.
pub trait RenderCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Vec<u8>>;

    /// Store an entry, replacing any previous one atomically.
    fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), RenderError>;

    fn exists(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }
}

/// One file per entry in a single directory.
///
/// The directory is never created here; if it is missing, `put` fails with
/// `CacheWriteFailed`.
#[derive(Debug, Clone)]
pub struct FsRenderCache {
    dir: PathBuf,
}

impl FsRenderCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    fn write_failed(key: &CacheKey, source: std::io::Error) -> RenderError {
        RenderError::CacheWriteFailed {
            key: key.to_string(),
            source,
        }
    }
}

impl RenderCache for FsRenderCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read cache entry {}: {}", key, e);
                None
            }
        }
    }

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), RenderError> {
        if !self.dir.is_dir() {
            return Err(Self::write_failed(
                key,
                std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("cache directory {} does not exist", self.dir.display()),
                ),
            ));
        }

        // Temp names never end in .js/.json, so they cannot collide with keys
        let mut temp = tempfile::Builder::new()
            .prefix(".render-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| Self::write_failed(key, e))?;
        temp.write_all(bytes)
            .and_then(|_| temp.flush())
            .map_err(|e| Self::write_failed(key, e))?;
        temp.persist(self.path_for(key))
            .map_err(|e| Self::write_failed(key, e.error))?;

        debug!("Stored cache entry {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    fn exists(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }
}
