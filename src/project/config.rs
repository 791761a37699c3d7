use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hook::{HookVersion, ANNOTATION_PREFIX};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "custom-hook.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
/// The configuration for the hook
///
/// All keys are optional, missing keys use their defaults.
/// Command line flags take precedence over values from the file.
pub struct HookConfig {
    /// Prefix of the VirtualMachineInstance annotations that are applied to the domain.
    ///
    /// The rest of the annotation key is the dotted path of the element to set,
    /// e.g. `custom.kubevirt.io/devices.disk.driver`.
    pub annotation_prefix: String,

    /// Hook protocol version reported by `info`.
    pub hook_version: HookVersion,

    /// Sort the annotation overrides by path before applying them.
    ///
    /// Annotations are applied in manifest order otherwise.
    pub sort_overrides: bool,

    /// Indent the written domain XML.
    pub indent: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            annotation_prefix: ANNOTATION_PREFIX.to_string(),
            hook_version: HookVersion::default(),
            sort_overrides: false,
            indent: false,
        }
    }
}

impl HookConfig {
    /// Read a HookConfig from a TOML file.
    /// The read might fail if it is not a valid config file in TOML format.
    ///
    /// # Arguments
    ///
    /// * `path`: Path to the file to read.
    ///
    /// returns: Result<HookConfig, Error>
    pub fn read_file(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("Could not open file {} for reading", path.display()))?;
        let res: Self = toml::from_str(&toml_str)
            .with_context(|| format!("Could not parse hook config file {}", path.display()))?;
        Ok(res)
    }

    /// Read the config file if one is given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the HookConfig to a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path`: Path to the file to write.
    ///
    /// returns: Result<(), Error>
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .with_context(|| format!("Could not serialize hook config file {}", path.display()))?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Could not write file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: HookConfig = toml::from_str("sort_overrides = true\n").unwrap();
        assert_eq!(
            config,
            HookConfig {
                sort_overrides: true,
                ..HookConfig::default()
            }
        );
    }

    #[test]
    fn test_all_keys() {
        let config: HookConfig = toml::from_str(
            r#"
            annotation_prefix = "hooks.example.io/"
            hook_version = "v1alpha1"
            sort_overrides = false
            indent = true
            "#,
        )
        .unwrap();
        assert_eq!(config.annotation_prefix, "hooks.example.io/");
        assert_eq!(config.hook_version, HookVersion::V1alpha1);
        assert!(config.indent);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        assert!(toml::from_str::<HookConfig>("hook_version = \"v2\"").is_err());
    }

    #[test]
    fn test_load_without_file() {
        assert_eq!(HookConfig::load(None).unwrap(), HookConfig::default());
    }
}
