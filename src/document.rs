//! Cached RTF documents
//!
//! A [`CachedDocument`] converts its backing file on first use and again
//! only after the file's modification time changes. The cache lock is held
//! across the freshness check and the reconversion, so concurrent readers
//! never convert the same revision twice.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::error::Result;
use crate::parser::convert_to_plain_text;
use crate::source::{read_document, write_document, SourceOptions};

/// Source of modification timestamps
pub trait ModificationClock {
    /// Last modification time of the file at `path`
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Reads modification times from filesystem metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct FsClock;

impl ModificationClock for FsClock {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

/// Options for a cached document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// How the backing file is read
    pub source: SourceOptions,
    /// Written in place of characters Latin-1 cannot encode
    pub replacement: Option<char>,
}

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    text: String,
}

#[derive(Debug, Default)]
struct Cache {
    entry: Option<CacheEntry>,
    conversions: usize,
}

/// An RTF file whose plain text is cached until the file changes
#[derive(Debug)]
pub struct CachedDocument<C: ModificationClock = FsClock> {
    path: PathBuf,
    options: DocumentOptions,
    clock: C,
    cache: Mutex<Cache>,
}

impl CachedDocument<FsClock> {
    /// Open a document with default options
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, DocumentOptions::default())
    }

    /// Open a document with the given options
    pub fn with_options(path: impl Into<PathBuf>, options: DocumentOptions) -> Self {
        Self::with_clock(path, options, FsClock)
    }
}

impl<C: ModificationClock> CachedDocument<C> {
    /// Open a document that observes modification times through `clock`
    pub fn with_clock(path: impl Into<PathBuf>, options: DocumentOptions, clock: C) -> Self {
        Self {
            path: path.into(),
            options,
            clock,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of conversions performed so far
    pub fn conversions(&self) -> usize {
        self.lock().conversions
    }

    /// Forget the cached text so the next read converts again
    pub fn invalidate(&self) {
        self.lock().entry = None;
    }

    /// Plain text of the document
    ///
    /// Returns the cached text while the file's modification time is
    /// unchanged, otherwise converts the file again. A failed conversion
    /// leaves the previous cache entry in place.
    pub fn get_text(&self) -> Result<String> {
        let mut cache = self.lock();
        let modified = self.clock.modified(&self.path)?;

        if let Some(entry) = &cache.entry {
            if entry.modified == modified {
                return Ok(entry.text.clone());
            }
        }

        debug!(path = %self.path.display(), "converting stale document");
        let source = read_document(&self.path, &self.options.source)?;
        let text = convert_to_plain_text(&source)?;

        cache.conversions += 1;
        cache.entry = Some(CacheEntry {
            modified,
            text: text.clone(),
        });
        Ok(text)
    }

    /// Write the plain text to `path` as Latin-1
    ///
    /// Problems on the destination side are soft and yield `Ok(false)`.
    /// Reading or parsing the document itself still fails with `Err`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let text = self.get_text()?;

        match write_document(path, &text, self.options.replacement) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(path = %path.display(), "Failed to write document: {}", e);
                Ok(false)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
