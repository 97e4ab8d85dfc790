//! Client resolution: platform match, binary lookup, availability verdict.
//!
//! Resolution is a small state machine with a strict evaluation order. Each
//! failure point maps to one unambiguous outcome:
//!
//! 1. no platform configuration matches - the client is dropped entirely
//! 2. the binary cannot be located - `failReason: notFound`
//! 3. the sanity check is missing, fails to run, or its output mismatches -
//!    `failReason: sanityCheckFail`
//!
//! Unavailability is recorded state, never an error; resolving a whole
//! catalog always succeeds.

use std::path::PathBuf;
use toolchest_core::{
    ActiveCli, ClientSpec, ClientState, Config, FailReason, Platform, PlatformConfig,
    ResolvedClient,
};
use tracing::{debug, info};

use crate::locator;
use crate::sanity;

/// Resolve every configured client, in document order.
///
/// Clients with no platform configuration for `platform` are excluded from
/// the result entirely.
pub async fn resolve_clients(
    config: &Config,
    platform: &Platform,
    folders: &[PathBuf],
) -> Vec<ResolvedClient> {
    let mut clients = Vec::new();
    for (id, spec) in config.clients.iter() {
        let Some(platform_config) = spec.cli.platform_config(platform) else {
            debug!(client = id, %platform, "no configuration for platform, skipping");
            continue;
        };

        let client = resolve_with_config(id, spec, platform_config, folders).await;
        info!(
            client = id,
            available = client.state.available,
            fail_reason = ?client.state.fail_reason,
            "client resolved"
        );
        clients.push(client);
    }
    clients
}

/// Resolve one client against an already-matched platform configuration.
///
/// Also used by acquisition to re-verify a client against a freshly unpacked
/// tree; the verdict is computed from scratch either way.
pub async fn resolve_with_config(
    id: &str,
    spec: &ClientSpec,
    platform_config: &PlatformConfig,
    folders: &[PathBuf],
) -> ResolvedClient {
    let Some(full_path) = locator::locate(&platform_config.bin, folders) else {
        debug!(client = id, bin = %platform_config.bin, "binary not found");
        return ResolvedClient {
            id: id.to_string(),
            spec: spec.clone(),
            state: ClientState::unavailable(FailReason::NotFound),
            active_cli: ActiveCli {
                url: platform_config.url.clone(),
                bin: platform_config.bin.clone(),
                full_path: None,
            },
        };
    };

    let passed = match spec.cli.sanity_check() {
        Some(command) => sanity::sanity_check(&full_path, command).await,
        None => {
            debug!(client = id, "no sanityCheck command defined");
            false
        }
    };

    let state = if passed {
        ClientState::available()
    } else {
        ClientState::unavailable(FailReason::SanityCheckFail)
    };

    ResolvedClient {
        id: id.to_string(),
        spec: spec.clone(),
        state,
        active_cli: ActiveCli {
            url: platform_config.url.clone(),
            bin: platform_config.bin.clone(),
            full_path: Some(full_path),
        },
    }
}
