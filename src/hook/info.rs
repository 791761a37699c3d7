use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Name the hook registers under.
pub const HOOK_NAME: &str = "custom";

/// Hook point called before the domain is defined in libvirt.
pub const ON_DEFINE_DOMAIN_HOOK_POINT: &str = "onDefineDomain";

/// Versions of the hook callback protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HookVersion {
    V1alpha1,
    #[default]
    V1alpha2,
}

impl HookVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookVersion::V1alpha1 => "v1alpha1",
            HookVersion::V1alpha2 => "v1alpha2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookPoint {
    pub name: String,
    pub priority: i32,
}

/// The answer to the hook `Info` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    pub name: String,
    pub versions: Vec<String>,
    pub hook_points: Vec<HookPoint>,
}

impl HookInfo {
    /// Describe this hook for the given protocol version.
    pub fn new(version: HookVersion) -> Self {
        Self {
            name: HOOK_NAME.to_string(),
            versions: vec![version.as_str().to_string()],
            hook_points: vec![HookPoint {
                name: ON_DEFINE_DOMAIN_HOOK_POINT.to_string(),
                priority: 0,
            }],
        }
    }
}
