//! Reserved names and module naming options
//!
//! Every field has a default, so an empty `kissify.toml` (or none at all)
//! yields the standard KISSY output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use etcetera::BaseStrategy;
use log::debug;
use serde::Deserialize;

use crate::naming::{is_valid_identifier, is_valid_member_path};

/// File name looked up by [`Config::discover`]
pub const CONFIG_FILE_NAME: &str = "kissify.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub names: NamesConfig,
    pub module_ids: ModuleIdsConfig,
}

/// Names the emitted envelope reserves or calls
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct NamesConfig {
    /// Dotted callee of the registration call
    pub register: String,
    /// First factory parameter, receiving the framework namespace
    pub namespace: String,
    /// Exports container declared at the top of the factory
    pub exports: String,
    /// Reserved dependency-loading function name
    pub loader: String,
    /// Paths starting with this go to `cssRequires`
    pub stylesheet_prefix: String,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            register: "KISSY.add".to_owned(),
            namespace: "S".to_owned(),
            exports: "exports".to_owned(),
            loader: "require".to_owned(),
            stylesheet_prefix: "css!".to_owned(),
        }
    }
}

/// Path-derived module names
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ModuleIdsConfig {
    pub enabled: bool,
    pub module_root: Option<String>,
    pub source_root: Option<PathBuf>,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Look for `kissify.toml` in `dir`, then in the user config directory
    ///
    /// Falls back to the defaults when neither exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let local = dir.join(CONFIG_FILE_NAME);
        if local.is_file() {
            debug!("Using project config {}", local.display());
            return Self::load(&local);
        }

        if let Some(user) = user_config_path().filter(|path| path.is_file()) {
            debug!("Using user config {}", user.display());
            return Self::load(&user);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Reject names that would produce an unparsable envelope
    pub fn validate(&self) -> Result<()> {
        let names = &self.names;
        if !is_valid_member_path(&names.register) {
            bail!(
                "`names.register` must be a dotted identifier path, got {:?}",
                names.register
            );
        }
        for (key, value) in [
            ("namespace", &names.namespace),
            ("exports", &names.exports),
            ("loader", &names.loader),
        ] {
            if !is_valid_identifier(value) {
                bail!("`names.{key}` must be a valid identifier, got {value:?}");
            }
        }
        if names.namespace == names.exports {
            bail!(
                "`names.namespace` and `names.exports` must differ, both are {:?}",
                names.namespace
            );
        }
        if names.stylesheet_prefix.is_empty() {
            bail!("`names.stylesheet-prefix` must not be empty");
        }
        Ok(())
    }
}

/// `<config dir>/kissify/kissify.toml` for the current user
fn user_config_path() -> Option<PathBuf> {
    etcetera::choose_base_strategy()
        .ok()
        .map(|strategy| strategy.config_dir().join("kissify").join(CONFIG_FILE_NAME))
}
