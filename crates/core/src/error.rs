//! Error types for the toolchest ecosystem

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error type used for caller-supplied failures and wrapped sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for toolchest operations.
///
/// These errors are only raised by explicit acquisition requests. A client
/// that merely turns out to be unusable on the current machine is recorded as
/// registry state ([`crate::ClientState`]), never as an error.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No platform configuration matches the current OS/architecture, or the
    /// client id is unknown.
    #[error("{id} missing configuration for this platform.")]
    #[diagnostic(code(toolchest_core::platform::missing))]
    MissingPlatformConfig {
        /// The client id that was requested
        id: String,
    },

    /// The matched platform configuration has no usable download descriptor.
    #[error("Download info not available for {id}")]
    #[diagnostic(code(toolchest_core::download::info_unavailable))]
    DownloadInfoUnavailable {
        /// The client id that was requested
        id: String,
    },

    /// Transport failure while fetching the client archive.
    #[error("Error downloading package for {id}")]
    #[diagnostic(code(toolchest_core::download::failed))]
    Download {
        /// The client id being downloaded
        id: String,
        /// The underlying transport error
        #[source]
        source: BoxError,
    },

    /// No built-in or caller-supplied strategy handles the archive type.
    #[error("Unsupported archive type: {archive_type}")]
    #[diagnostic(code(toolchest_core::unpack::unsupported))]
    UnsupportedArchiveType {
        /// The archive type named by the download descriptor
        archive_type: String,
    },

    /// A caller-supplied unpack handler failed; its message is surfaced
    /// verbatim.
    #[error("{0}")]
    #[diagnostic(code(toolchest_core::unpack::handler))]
    UnpackHandler(BoxError),

    /// A built-in unpack strategy could not read the archive.
    #[error("Failed to extract archive: {message}")]
    #[diagnostic(code(toolchest_core::unpack::extraction))]
    Extraction {
        /// What went wrong while reading the archive
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    #[diagnostic(code(toolchest_core::io::error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing platform configuration error for a client.
    #[must_use]
    pub fn missing_platform_config(id: impl Into<String>) -> Self {
        Self::MissingPlatformConfig { id: id.into() }
    }

    /// Create a download-info-unavailable error for a client.
    #[must_use]
    pub fn download_info_unavailable(id: impl Into<String>) -> Self {
        Self::DownloadInfoUnavailable { id: id.into() }
    }

    /// Create a download error wrapping the underlying transport failure.
    #[must_use]
    pub fn download(id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Download {
            id: id.into(),
            source: source.into(),
        }
    }

    /// Create an unsupported archive type error.
    #[must_use]
    pub fn unsupported_archive_type(archive_type: impl Into<String>) -> Self {
        Self::UnsupportedArchiveType {
            archive_type: archive_type.into(),
        }
    }

    /// Wrap a caller-supplied unpack handler failure.
    #[must_use]
    pub fn unpack_handler(source: BoxError) -> Self {
        Self::UnpackHandler(source)
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }
}

/// Result type for toolchest operations
pub type Result<T> = std::result::Result<T, Error>;
