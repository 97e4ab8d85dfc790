//! The manager facade: registry initialization and client acquisition.

use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use toolchest_core::{Config, Error, Platform, ResolvedClient, Result};
use tracing::{debug, info};
use uuid::Uuid;

use crate::resolver;
use crate::unpack::{UnpackHandler, UnpackerRegistry};

/// Manages the catalog of external client tools.
///
/// [`Manager::init`] resolves every configured client into an availability
/// registry; [`Manager::download`] fetches, unpacks and re-verifies a single
/// client on demand, updating its registry entry in place.
#[derive(Debug)]
pub struct Manager {
    config: Config,
    platform: Platform,
    downloads_dir: PathBuf,
    folders: Vec<PathBuf>,
    clients: Vec<ResolvedClient>,
    http: Client,
    unpackers: UnpackerRegistry,
}

/// Construction options for [`Manager`].
#[derive(Debug, Clone, Default)]
pub struct ManagerOptions {
    /// Platform to resolve against instead of the detected one.
    pub platform: Option<Platform>,
    /// Root folder for per-download working directories.
    pub downloads_dir: Option<PathBuf>,
}

impl ManagerOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve against a specific platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Place per-download working directories under `path`.
    #[must_use]
    pub fn with_downloads_dir(mut self, path: PathBuf) -> Self {
        self.downloads_dir = Some(path);
        self
    }
}

/// Options for [`Manager::init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Folders searched ahead of the process `PATH` for every client.
    pub folders: Vec<PathBuf>,
}

impl InitOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `folders` ahead of the process `PATH`.
    #[must_use]
    pub fn with_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.folders = folders;
        self
    }
}

/// Options for [`Manager::download`].
#[derive(Default)]
pub struct DownloadOptions {
    /// Unpack override; when set, built-in archive-type dispatch is skipped
    /// and the download's `type` is not required.
    pub unpack_handler: Option<Box<dyn UnpackHandler>>,
}

impl DownloadOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unpack with `handler` instead of a built-in strategy.
    #[must_use]
    pub fn with_unpack_handler<H: UnpackHandler + 'static>(mut self, handler: H) -> Self {
        self.unpack_handler = Some(Box::new(handler));
        self
    }
}

impl std::fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("unpack_handler", &self.unpack_handler.is_some())
            .finish()
    }
}

/// Result of a successful [`Manager::download`].
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// The freshly re-resolved client, equal to its updated registry entry.
    pub client: ResolvedClient,
    /// Working directory created for this download.
    pub download_folder: PathBuf,
    /// The fetched archive file inside `download_folder`.
    pub download_file: PathBuf,
    /// The folder the archive was unpacked into.
    pub unpack_folder: PathBuf,
}

impl Manager {
    /// Create a manager for `config` with default options.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_options(config, ManagerOptions::default())
    }

    /// Create a manager for `config`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which with default
    /// TLS settings indicates a fundamental environment issue.
    #[must_use]
    pub fn with_options(config: Config, options: ManagerOptions) -> Self {
        Self {
            config,
            platform: options.platform.unwrap_or_else(Platform::current),
            downloads_dir: options.downloads_dir.unwrap_or_else(default_downloads_dir),
            folders: Vec::new(),
            clients: Vec::new(),
            http: Client::builder()
                .user_agent("toolchest")
                .build()
                .expect("Failed to create HTTP client - TLS backend initialization failed"),
            unpackers: UnpackerRegistry::with_builtins(),
        }
    }

    /// Resolve every configured client, rebuilding the registry wholesale.
    ///
    /// `options.folders` are searched ahead of the process `PATH` for every
    /// client, and are remembered for re-resolution after a download.
    /// Individual clients being unavailable is recorded state, not a
    /// failure.
    pub async fn init(&mut self, options: &InitOptions) -> &[ResolvedClient] {
        self.folders = options.folders.clone();
        info!(
            platform = %self.platform,
            clients = self.config.clients.len(),
            "resolving configured clients"
        );
        self.clients = resolver::resolve_clients(&self.config, &self.platform, &self.folders).await;
        &self.clients
    }

    /// The resolved registry, in configuration order.
    #[must_use]
    pub fn clients(&self) -> &[ResolvedClient] {
        &self.clients
    }

    /// Look up one resolved client by id.
    #[must_use]
    pub fn client(&self, id: &str) -> Option<&ResolvedClient> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// The platform this manager resolves against.
    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Download, unpack and re-verify the named client.
    ///
    /// On success the client's registry entry is replaced in place with the
    /// freshly resolved verdict, scoped to the unpacked tree.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingPlatformConfig`] - unknown id, or no platform
    ///   configuration matches
    /// - [`Error::DownloadInfoUnavailable`] - no usable download descriptor
    /// - [`Error::Download`] - transport failure fetching the archive
    /// - [`Error::UnsupportedArchiveType`] - no strategy for the archive
    ///   type and no handler supplied
    /// - a caller-supplied handler's failure, surfaced verbatim
    pub async fn download(&mut self, id: &str, options: DownloadOptions) -> Result<DownloadResult> {
        let spec = self
            .config
            .clients
            .get(id)
            .cloned()
            .ok_or_else(|| Error::missing_platform_config(id))?;
        let platform_config = spec
            .cli
            .platform_config(&self.platform)
            .cloned()
            .ok_or_else(|| Error::missing_platform_config(id))?;

        let download = platform_config
            .download
            .as_ref()
            .ok_or_else(|| Error::download_info_unavailable(id))?;
        let Some(url) = download.url.as_deref() else {
            return Err(Error::download_info_unavailable(id));
        };
        if download.archive_type.is_none() && options.unpack_handler.is_none() {
            return Err(Error::download_info_unavailable(id));
        }

        let download_folder = self.downloads_dir.join(Uuid::new_v4().to_string());
        let extension = download.archive_type.as_deref().unwrap_or("bin");
        let download_file = download_folder.join(format!("archive.{extension}"));
        let unpack_folder = download_folder.join("unpacked");

        fs::create_dir_all(&download_folder).await?;
        self.fetch_archive(id, url, &download_file).await?;

        fs::create_dir_all(&unpack_folder).await?;
        if let Some(handler) = options.unpack_handler.as_deref() {
            debug!(client = id, "unpacking with caller-supplied handler");
            handler
                .unpack(&download_file, &unpack_folder)
                .await
                .map_err(Error::unpack_handler)?;
        } else {
            let archive_type = download.archive_type.as_deref().unwrap_or_default();
            let unpacker = self
                .unpackers
                .get(archive_type)
                .ok_or_else(|| Error::unsupported_archive_type(archive_type))?;
            debug!(client = id, archive_type, "unpacking archive");
            unpacker.unpack(&download_file, &unpack_folder)?;
        }

        // Re-verify exactly as initialization would, with the unpacked tree
        // searched first
        let mut folders = Vec::with_capacity(self.folders.len() + 1);
        folders.push(unpack_folder.clone());
        folders.extend(self.folders.iter().cloned());
        let client = resolver::resolve_with_config(id, &spec, &platform_config, &folders).await;

        info!(
            client = id,
            available = client.state.available,
            "client re-resolved after unpack"
        );
        match self.clients.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => *entry = client.clone(),
            None => self.clients.push(client.clone()),
        }

        Ok(DownloadResult {
            client,
            download_folder,
            download_file,
            unpack_folder,
        })
    }

    async fn fetch_archive(&self, id: &str, url: &str, dest: &Path) -> Result<()> {
        info!(client = id, %url, "downloading archive");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::download(id, e))?;
        let body = response.bytes().await.map_err(|e| Error::download(id, e))?;

        fs::write(dest, &body).await?;
        debug!(
            client = id,
            bytes = body.len(),
            file = %dest.display(),
            "archive downloaded"
        );
        Ok(())
    }
}

/// Default root folder for per-download working directories.
#[must_use]
pub fn default_downloads_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("toolchest")
        .join("downloads")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_downloads_dir() {
        let dir = default_downloads_dir();
        assert!(dir.ends_with("toolchest/downloads"));
    }

    #[test]
    fn test_manager_options_builder() {
        let options = ManagerOptions::new()
            .with_platform(Platform::new("linux", "x86_64"))
            .with_downloads_dir(PathBuf::from("/tmp/downloads"));
        assert_eq!(options.platform, Some(Platform::new("linux", "x86_64")));
        assert_eq!(options.downloads_dir, Some(PathBuf::from("/tmp/downloads")));
    }

    #[test]
    fn test_manager_uses_platform_override() {
        let manager = Manager::with_options(
            Config::default(),
            ManagerOptions::new().with_platform(Platform::new("testos", "testarch")),
        );
        assert_eq!(manager.platform(), &Platform::new("testos", "testarch"));
        assert!(manager.clients().is_empty());
    }
}
