use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::hook::HookError;

/// Encoding of a VirtualMachineInstance manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Guess the format from a file extension. Anything that is not `.yaml`
    /// or `.yml` is read as JSON, which is what the hook protocol sends.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Json,
        }
    }
}

/// The parts of a KubeVirt VirtualMachineInstance the hook reads.
#[derive(Debug, Default, Deserialize)]
pub struct VirtualMachineInstance {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectMeta {
    pub name: Option<String>,
    pub namespace: Option<String>,
    /// Annotations in manifest order.
    #[serde(default)]
    pub annotations: IndexMap<String, String>,
}

impl VirtualMachineInstance {
    /// Decode a manifest.
    ///
    /// # Arguments
    ///
    /// * `manifest`: The raw manifest
    /// * `format`: The encoding of the manifest
    ///
    /// returns: Result<VirtualMachineInstance, HookError>
    pub fn parse(manifest: &[u8], format: ManifestFormat) -> Result<Self, HookError> {
        match format {
            ManifestFormat::Json => serde_json::from_slice(manifest).map_err(HookError::InvalidJson),
            ManifestFormat::Yaml => serde_yaml::from_slice(manifest).map_err(HookError::InvalidYaml),
        }
    }

    /// `namespace/name` of the instance, for log messages.
    pub fn display_name(&self) -> String {
        match (&self.metadata.namespace, &self.metadata.name) {
            (Some(namespace), Some(name)) => format!("{}/{}", namespace, name),
            (None, Some(name)) => name.clone(),
            _ => "<unnamed>".to_string(),
        }
    }
}
