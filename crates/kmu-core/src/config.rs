//! Runtime configuration.
//!
//! Every setting has a default matching a stock Gentoo layout. A TOML file
//! can override any of them:
//!
//! ```toml
//! use = "/etc/portage/package.use/kmu"
//! distfiles = "/var/cache/distfiles"
//! reserved = ["samba", "firefox"]
//! explicit_plus = true
//! ```

use crate::distfiles::Growth;
use crate::paths;
use crate::types::Category;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },
}

/// Paths and policies for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `package.keywords` list.
    pub keywords: PathBuf,
    /// `package.mask` list.
    pub mask: PathBuf,
    /// `package.use` list.
    #[serde(rename = "use")]
    pub use_flags: PathBuf,
    /// `package.unmask` list.
    pub unmask: PathBuf,
    /// Download cache scanned by cleanup.
    pub distfiles: PathBuf,
    /// Ebuild repository searched for atom suggestions.
    pub repository: PathBuf,
    /// Substrings of file names cleanup must never delete.
    pub reserved: Vec<String>,
    /// Emit positive directives as `+flag`.
    pub explicit_plus: bool,
    /// Initial slot count of the duplicate index.
    pub index_capacity: usize,
    /// What the duplicate index does when it fills up.
    pub index_growth: Growth,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: PathBuf::from(paths::DEFAULT_KEYWORDS),
            mask: PathBuf::from(paths::DEFAULT_MASK),
            use_flags: PathBuf::from(paths::DEFAULT_USE),
            unmask: PathBuf::from(paths::DEFAULT_UNMASK),
            distfiles: PathBuf::from(paths::DEFAULT_DISTFILES),
            repository: PathBuf::from(paths::DEFAULT_REPOSITORY),
            reserved: crate::distfiles::DEFAULT_RESERVED
                .iter()
                .map(ToString::to_string)
                .collect(),
            explicit_plus: false,
            index_capacity: 1024,
            index_growth: Growth::default(),
        }
    }
}

impl Config {
    /// Parse TOML text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input or unknown keys.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Resolve the configuration for a run.
    ///
    /// An `explicit` file must exist. Otherwise the first existing file from
    /// [`paths::config_candidates`] is used, falling back to defaults. When
    /// `prefix` is given every path is moved under it.
    ///
    /// # Errors
    ///
    /// Propagates [`Config::load`] failures.
    pub fn discover(explicit: Option<&Path>, prefix: Option<&Path>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = explicit {
            Self::load(path)?
        } else if let Some(found) = paths::config_candidates(prefix)
            .into_iter()
            .find(|p| p.is_file())
        {
            tracing::debug!("using config {}", found.display());
            Self::load(&found)?
        } else {
            Self::default()
        };

        Ok(match prefix {
            Some(prefix) => config.with_prefix(prefix),
            None => config,
        })
    }

    /// Move every path under `prefix`.
    pub fn with_prefix(mut self, prefix: &Path) -> Self {
        for path in [
            &mut self.keywords,
            &mut self.mask,
            &mut self.use_flags,
            &mut self.unmask,
            &mut self.distfiles,
            &mut self.repository,
        ] {
            *path = paths::prefixed(prefix, path);
        }
        self
    }

    /// The list file backing `category`.
    pub fn list_path(&self, category: Category) -> &Path {
        match category {
            Category::Keyword => &self.keywords,
            Category::Mask => &self.mask,
            Category::Use | Category::Linguas => &self.use_flags,
            Category::Unmask => &self.unmask,
        }
    }
}
