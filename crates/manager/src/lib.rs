//! Client binary resolution and acquisition.
//!
//! Given a catalog of external command-line tools ([`toolchest_core::Config`]),
//! the [`Manager`] works out which of them are actually usable on the current
//! machine and can fetch and unpack missing ones on demand.
//!
//! # Architecture
//!
//! Resolution runs a strict pipeline per client:
//!
//! - [`toolchest_core::CliDescriptor::platform_config`] - platform match
//!   (non-matching clients are dropped, not marked unavailable)
//! - [`locator`] - find the binary across search folders and `PATH`
//! - [`sanity`] - probe the located binary with its configured command
//!
//! Acquisition ([`Manager::download`]) fetches a platform-specific archive,
//! dispatches to an [`unpack::Unpacker`] by archive type (or a caller's
//! [`unpack::UnpackHandler`]), then re-runs the same resolution pipeline
//! against the unpacked tree.
//!
//! # Example
//!
//! ```ignore
//! use toolchest_core::Config;
//! use toolchest_manager::{InitOptions, Manager};
//!
//! let config: Config = serde_json::from_str(catalog_json)?;
//! let mut manager = Manager::new(config);
//! manager.init(&InitOptions::new()).await;
//!
//! if let Some(client) = manager.client("geth").filter(|c| c.is_available()) {
//!     println!("ready: {:?}", client.active_cli.full_path);
//! }
//! ```

pub mod locator;
pub mod manager;
pub mod resolver;
pub mod sanity;
pub mod unpack;

pub use manager::{DownloadOptions, DownloadResult, InitOptions, Manager, ManagerOptions};
pub use unpack::{TarGzUnpacker, UnpackHandler, Unpacker, UnpackerRegistry, ZipUnpacker};
