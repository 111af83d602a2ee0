/// Crate-level error types for imgpull diagnostics.
use std::path::PathBuf;

/// All errors in imgpull carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the document, location, or path involved.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document passed on the command line does not exist.
    #[error("document not found: {}", path.display())]
    DocumentNotFound {
        /// Path to the missing document.
        path: PathBuf,
    },

    /// The document exists but could not be read as UTF-8 text.
    #[error("cannot read document {}: {reason}", path.display())]
    DocumentUnreadable {
        /// Path to the unreadable document.
        path: PathBuf,
        /// Description of the read failure.
        reason: String,
    },

    /// Image bytes could not be obtained from a remote or local source.
    #[error("fetch failed for `{location}`: {reason}")]
    FetchFailed {
        /// Source location exactly as written in the document.
        location: String,
        /// Description of the network or filesystem failure.
        reason: String,
    },

    /// The destination image directory cannot be created. Aborts the whole run.
    #[error("image directory unavailable: {}: {reason}", path.display())]
    ImageDirUnavailable {
        /// Configured image directory.
        path: PathBuf,
        /// Description of the creation failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// An image reference could not be turned into a relocation.
    #[error("malformed reference in {}: `{raw}` ({reason})", document.display())]
    MalformedReference {
        /// Document containing the reference.
        document: PathBuf,
        /// Matched reference text.
        raw: String,
        /// Why the reference was rejected.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A destination image or the rewritten document could not be written.
    #[error("write failed: {}: {reason}", path.display())]
    WriteFailed {
        /// Path that was being written.
        path: PathBuf,
        /// Description of the write failure.
        reason: String,
    },
}
