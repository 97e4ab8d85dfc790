//! Runtime verdicts for resolved clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::config::ClientSpec;

/// The resolution verdict for one configured client on this machine.
///
/// A `ResolvedClient` exists if and only if a platform configuration matched
/// the current OS/architecture; clients with no matching platform are absent
/// from the registry entirely rather than marked unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedClient {
    /// The client's id (its key in the configured client table).
    pub id: String,
    /// The declared metadata, passed through unchanged.
    #[serde(flatten)]
    pub spec: ClientSpec,
    /// Availability verdict.
    pub state: ClientState,
    /// The platform configuration that was selected for this machine.
    pub active_cli: ActiveCli,
}

impl ResolvedClient {
    /// Whether the client's binary was located and passed its sanity check.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state.available
    }
}

/// Availability state with a failure reason when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    /// Whether the client is usable on this machine.
    pub available: bool,
    /// Why the client is unusable; set exactly when `available` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<FailReason>,
}

impl ClientState {
    /// State for a client whose binary was located and verified.
    #[must_use]
    pub fn available() -> Self {
        Self {
            available: true,
            fail_reason: None,
        }
    }

    /// State for an unusable client.
    #[must_use]
    pub fn unavailable(reason: FailReason) -> Self {
        Self {
            available: false,
            fail_reason: Some(reason),
        }
    }
}

/// The binary that resolution looked for, and where it was found.
///
/// Present whenever a platform configuration matched, even for unavailable
/// clients; `full_path` is only populated once the binary was located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCli {
    /// Informational URL from the selected platform configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The binary filename that was searched for.
    pub bin: String,
    /// Where the binary was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<PathBuf>,
}

/// Why a matched client is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailReason {
    /// The binary could not be located in any search folder or on `PATH`.
    NotFound,
    /// The binary was located but the sanity check was missing, failed to
    /// run, or its output did not match.
    SanityCheckFail,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "notFound"),
            Self::SanityCheckFail => write!(f, "sanityCheckFail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_constructors() {
        let state = ClientState::available();
        assert!(state.available);
        assert!(state.fail_reason.is_none());

        let state = ClientState::unavailable(FailReason::NotFound);
        assert!(!state.available);
        assert_eq!(state.fail_reason, Some(FailReason::NotFound));
    }

    #[test]
    fn test_fail_reason_wire_names() {
        assert_eq!(
            serde_json::to_value(FailReason::NotFound).expect("serializable"),
            json!("notFound")
        );
        assert_eq!(
            serde_json::to_value(FailReason::SanityCheckFail).expect("serializable"),
            json!("sanityCheckFail")
        );
        assert_eq!(FailReason::NotFound.to_string(), "notFound");
        assert_eq!(FailReason::SanityCheckFail.to_string(), "sanityCheckFail");
    }

    #[test]
    fn test_resolved_client_serializes_spec_flattened() {
        let spec: ClientSpec = serde_json::from_value(json!({
            "homepage": "https://example.com",
            "foo": "bar",
            "cli": { "platforms": { "linux": { "bin": "tool" } } }
        }))
        .expect("valid spec");

        let client = ResolvedClient {
            id: "Tool".to_string(),
            spec,
            state: ClientState::available(),
            active_cli: ActiveCli {
                url: Some("https://example.com".to_string()),
                bin: "tool".to_string(),
                full_path: Some(PathBuf::from("/usr/local/bin/tool")),
            },
        };
        assert!(client.is_available());

        let value = serde_json::to_value(&client).expect("serializable");
        // Spec fields sit beside id/state/activeCli, as consumers expect
        assert_eq!(value.get("id"), Some(&json!("Tool")));
        assert_eq!(value.get("homepage"), Some(&json!("https://example.com")));
        assert_eq!(value.get("foo"), Some(&json!("bar")));
        assert_eq!(
            value.pointer("/activeCli/bin"),
            Some(&json!("tool")),
            "activeCli uses the camelCase wire name"
        );
        assert_eq!(value.pointer("/state/available"), Some(&json!(true)));
        assert!(value.pointer("/state/failReason").is_none());
    }

    #[test]
    fn test_unavailable_client_reports_reason() {
        let value = serde_json::to_value(ClientState::unavailable(FailReason::SanityCheckFail))
            .expect("serializable");
        assert_eq!(value.pointer("/failReason"), Some(&json!("sanityCheckFail")));
    }
}
