//! Archive unpack strategies.
//!
//! Built-in strategies are registered by archive type name in an
//! [`UnpackerRegistry`]; a caller-supplied [`UnpackHandler`] overrides the
//! registry entirely for one download.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tar::Archive;
use toolchest_core::{BoxError, Error, Result};
use tracing::debug;

/// Caller-supplied unpack override.
///
/// When given to a download, the handler replaces built-in dispatch and
/// receives the fetched archive plus the folder to unpack into. A failure
/// propagates to the download's caller verbatim.
#[async_trait]
pub trait UnpackHandler: Send + Sync {
    /// Unpack `archive` into `dest`.
    async fn unpack(&self, archive: &Path, dest: &Path) -> std::result::Result<(), BoxError>;
}

/// A built-in unpack strategy for one archive type.
pub trait Unpacker: Send + Sync {
    /// The archive type name this strategy handles (e.g. "zip").
    fn name(&self) -> &'static str;

    /// Additional type names that select this strategy.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Unpack `archive` into `dest`, which already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read or written out.
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Registry of built-in unpack strategies, keyed by archive type name.
#[derive(Default)]
pub struct UnpackerRegistry {
    unpackers: HashMap<&'static str, Arc<dyn Unpacker>>,
}

impl UnpackerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in strategies (zip, tar.gz).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ZipUnpacker);
        registry.register(TarGzUnpacker);
        registry
    }

    /// Register a strategy under its name and aliases.
    ///
    /// An existing strategy with the same name is replaced.
    pub fn register<U: Unpacker + 'static>(&mut self, unpacker: U) {
        let unpacker: Arc<dyn Unpacker> = Arc::new(unpacker);
        self.unpackers.insert(unpacker.name(), Arc::clone(&unpacker));
        for alias in unpacker.aliases() {
            self.unpackers.insert(alias, Arc::clone(&unpacker));
        }
    }

    /// Get the strategy for an archive type name.
    #[must_use]
    pub fn get(&self, archive_type: &str) -> Option<&Arc<dyn Unpacker>> {
        self.unpackers.get(archive_type)
    }

    /// All registered type names, including aliases.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.unpackers.keys().copied().collect()
    }
}

impl std::fmt::Debug for UnpackerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpackerRegistry")
            .field("unpackers", &self.names())
            .finish()
    }
}

/// Zip archive strategy.
pub struct ZipUnpacker;

impl Unpacker for ZipUnpacker {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()> {
        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| Error::extraction(format!("failed to open zip archive: {e}")))?;

        std::fs::create_dir_all(dest)?;
        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| Error::extraction(format!("failed to read zip entry: {e}")))?;

            // Entries escaping the destination are skipped rather than unpacked
            let Some(relative) = entry.enclosed_name() else {
                debug!(entry = entry.name(), "skipping zip entry with unsafe path");
                continue;
            };
            let outpath = dest.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                continue;
            }
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;
            std::fs::write(&outpath, &content)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }

        debug!(archive = %archive.display(), dest = %dest.display(), "zip archive unpacked");
        Ok(())
    }
}

/// Gzip-compressed tarball strategy.
pub struct TarGzUnpacker;

impl Unpacker for TarGzUnpacker {
    fn name(&self) -> &'static str {
        "tar.gz"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["tgz"]
    }

    fn unpack(&self, archive: &Path, dest: &Path) -> Result<()> {
        let file = File::open(archive)?;
        let mut tar = Archive::new(GzDecoder::new(file));

        std::fs::create_dir_all(dest)?;
        tar.unpack(dest)
            .map_err(|e| Error::extraction(format!("failed to extract tar archive: {e}")))?;

        debug!(archive = %archive.display(), dest = %dest.display(), "tar archive unpacked");
        Ok(())
    }
}
