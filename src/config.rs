use std::path::{Path, PathBuf};

use crate::error::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".imgpull.toml";

/// Image directory used when neither the CLI nor the config names one.
pub const DEFAULT_IMAGE_DIR: &str = "image";

/// Project configuration loaded from `.imgpull.toml`.
/// Include/exclude patterns are path prefixes applied to documents found by
/// walking a directory argument.
pub struct Config {
    /// Path prefixes a walked document must not start with.
    exclude: Vec<String>,
    /// Image directory relative to the working directory.
    pub image_dir: PathBuf,
    /// Path prefixes a walked document must start with. Empty means all.
    include: Vec<String>,
}

/// Raw TOML structure for `.imgpull.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ImgpullTomlConfig {
    /// Path prefixes to skip.
    #[serde(default)]
    exclude: Vec<String>,
    /// Image directory override.
    image_dir: Option<PathBuf>,
    /// Path prefixes to scan.
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.imgpull.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: ImgpullTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            image_dir: raw.image_dir.unwrap_or_else(|| return PathBuf::from(DEFAULT_IMAGE_DIR)),
            include: raw.include,
        });
    }

    /// Check whether a walked document path should be converted.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

impl Default for Config {
    /// Default image directory, includes everything, excludes nothing.
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            include: Vec::new(),
        };
    }
}
