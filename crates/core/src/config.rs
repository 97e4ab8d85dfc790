//! Client catalog configuration.
//!
//! The configuration is caller-supplied, already-parsed data describing each
//! external client tool: where its binary lives per platform, how to probe
//! that the binary is genuine, and (optionally) where an installable archive
//! can be downloaded. Loading the configuration from a file is the hosting
//! application's concern.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::platform::Platform;

/// The reserved command name interpreted by the resolver.
///
/// A client can only be marked available if its `cli.commands` table defines
/// a command under this name.
pub const SANITY_CHECK: &str = "sanityCheck";

/// Top-level configuration: the catalog of client tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configured clients, in document order.
    #[serde(default)]
    pub clients: ClientMap,
}

/// An ordered client table.
///
/// Keeps `(id, spec)` pairs in the order they were supplied so that the
/// resolved registry is deterministic, while still supporting lookup by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientMap(Vec<(String, ClientSpec)>);

impl ClientMap {
    /// Create an empty client table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a client, replacing any existing entry with the same id in
    /// place.
    pub fn insert(&mut self, id: impl Into<String>, spec: ClientSpec) {
        let id = id.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = spec,
            None => self.0.push((id, spec)),
        }
    }

    /// Look up a client by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ClientSpec> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, spec)| spec)
    }

    /// Iterate clients in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClientSpec)> {
        self.0.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    /// Number of configured clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ClientSpec)> for ClientMap {
    fn from_iter<I: IntoIterator<Item = (String, ClientSpec)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, spec) in iter {
            map.insert(id, spec);
        }
        map
    }
}

impl Serialize for ClientMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, spec) in &self.0 {
            map.serialize_entry(id, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClientMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClientMapVisitor;

        impl<'de> Visitor<'de> for ClientMapVisitor {
            type Value = ClientMap;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of client id to client spec")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ClientMap::new();
                while let Some((id, spec)) = access.next_entry::<String, ClientSpec>()? {
                    map.insert(id, spec);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ClientMapVisitor)
    }
}

/// Static declared metadata for one external client tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSpec {
    /// Project homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Declared version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Where to read about the declared version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_notes: Option<String>,
    /// How to find, verify and install the client's command-line binary.
    pub cli: CliDescriptor,
    /// Unrecognized metadata fields, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-platform binary locations plus the command table for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliDescriptor {
    /// Platform configurations keyed by OS identifier or `os-arch` composite.
    #[serde(default)]
    pub platforms: HashMap<String, PlatformConfig>,
    /// Named commands; only [`SANITY_CHECK`] is interpreted.
    #[serde(default)]
    pub commands: HashMap<String, CommandSpec>,
}

impl CliDescriptor {
    /// Select the platform configuration applicable to `platform`.
    ///
    /// The exact `os-arch` composite key is tried first, falling back to the
    /// `os`-only key. This lets configuration authors give an OS-wide default
    /// and override per architecture as needed. `None` means the client does
    /// not apply to this platform at all.
    #[must_use]
    pub fn platform_config(&self, platform: &Platform) -> Option<&PlatformConfig> {
        self.platforms
            .get(&platform.key())
            .or_else(|| self.platforms.get(&platform.os))
    }

    /// The sanity-check command, if the client defines one.
    #[must_use]
    pub fn sanity_check(&self) -> Option<&CommandSpec> {
        self.commands.get(SANITY_CHECK)
    }
}

/// Binary name, metadata URL and optional download source for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Filename of the client binary.
    pub bin: String,
    /// Informational URL, passed through to consumers unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Where an installable archive can be fetched from, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadDescriptor>,
}

/// Download source for a platform's client archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    /// Archive URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Archive format name (e.g. "zip", "tar.gz").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub archive_type: Option<String>,
}

/// A command to run against a located binary plus its expected output.
///
/// Each entry in `output` must find at least one matching stdout line. A
/// plain pattern requires a line equal to it; a `prefix:value` pattern
/// requires a line starting with `prefix:` whose remainder equals `value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Arguments passed to the binary.
    #[serde(default)]
    pub args: Vec<String>,
    /// Expected output patterns (conjunction, not ordered correspondence).
    #[serde(default)]
    pub output: Vec<String>,
}
