//! Image byte sources: remote URLs over blocking HTTP, everything else from disk.

use std::io::Read as _;
use std::path::Path;

use tracing::debug;
use url::Url;

use crate::error::Error;

/// Anything that can produce the bytes behind a source location.
pub trait ByteSource {
    /// Fetch the bytes for `location`, resolving relative paths against `document_dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` when the bytes cannot be obtained.
    fn fetch(&self, location: &str, document_dir: &Path) -> Result<Vec<u8>, Error>;
}

/// Production byte source: one GET per remote location, plain reads for local paths.
/// No retries and no timeout.
pub struct SourceFetcher {
    /// Shared blocking HTTP agent.
    agent: ureq::Agent,
}

impl SourceFetcher {
    /// Build a fetcher with a default agent.
    pub fn new() -> Self {
        return Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("imgpull/", env!("CARGO_PKG_VERSION")))
                .build(),
        };
    }

    /// Read a local file. Relative paths are taken from the document's directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` if the file is missing or unreadable.
    fn read_local(location: &str, document_dir: &Path) -> Result<Vec<u8>, Error> {
        let path = Path::new(location);
        let path = if path.is_absolute() { path.to_path_buf() } else { document_dir.join(path) };
        debug!(path = %path.display(), "reading local image");

        return std::fs::read(&path).map_err(|e| {
            return Error::FetchFailed {
                location: location.to_string(),
                reason: format!("{}: {e}", path.display()),
            };
        });
    }

    /// Download a remote image body.
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` on transport errors, non-success statuses,
    /// or a truncated body.
    fn read_remote(&self, location: &str) -> Result<Vec<u8>, Error> {
        debug!(url = location, "fetching remote image");
        let fetch_failed = |reason: String| {
            return Error::FetchFailed {
                location: location.to_string(),
                reason,
            };
        };

        let response = self
            .agent
            .get(location)
            .call()
            .map_err(|e| return fetch_failed(e.to_string()))?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| return fetch_failed(e.to_string()))?;
        return Ok(body);
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        return Self::new();
    }
}

impl ByteSource for SourceFetcher {
    fn fetch(&self, location: &str, document_dir: &Path) -> Result<Vec<u8>, Error> {
        if is_remote(location) {
            return self.read_remote(location);
        }
        return Self::read_local(location, document_dir);
    }
}

/// A location is remote when it parses as a URL with a non-empty host.
/// Drive letters and bare paths parse without a host and stay local.
pub fn is_remote(location: &str) -> bool {
    return Url::parse(location)
        .ok()
        .is_some_and(|url| return url.host_str().is_some_and(|host| return !host.is_empty()));
}
