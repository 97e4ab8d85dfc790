//! Core types and error handling for the toolchest ecosystem
//!
//! This crate defines the shared vocabulary of the toolchest workspace:
//!
//! - [`Config`], [`ClientSpec`], [`CliDescriptor`] - the caller-supplied
//!   catalog of external client tools
//! - [`Platform`] - OS/architecture identification and config-key matching
//! - [`ResolvedClient`], [`ClientState`], [`FailReason`] - runtime
//!   availability verdicts
//! - [`Error`], [`Result`] - the acquisition error taxonomy
//!
//! The resolution and acquisition engines live in `toolchest-manager`.

pub mod client;
pub mod config;
pub mod error;
pub mod platform;

pub use client::{ActiveCli, ClientState, FailReason, ResolvedClient};
pub use config::{
    CliDescriptor, ClientMap, ClientSpec, CommandSpec, Config, DownloadDescriptor, PlatformConfig,
    SANITY_CHECK,
};
pub use error::{BoxError, Error, Result};
pub use platform::Platform;
