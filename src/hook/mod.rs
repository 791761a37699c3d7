//! The KubeVirt hook side of the tool: reading the VirtualMachineInstance,
//! turning its annotations into overrides and answering the hook calls.

use log::info;
use thiserror::Error;

use crate::domain::{MergeError, MergeReporter, Override, PathMerger, SerializeOptions};

pub use info::{HookInfo, HookPoint, HookVersion, HOOK_NAME, ON_DEFINE_DOMAIN_HOOK_POINT};
pub use overrides::{extract_overrides, sort_overrides, ANNOTATION_PREFIX};
pub use vmi::{ManifestFormat, ObjectMeta, VirtualMachineInstance};

pub mod info;
pub mod overrides;
pub mod vmi;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Failed to unmarshal the given VMI spec as JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Failed to unmarshal the given VMI spec as YAML")]
    InvalidYaml(#[source] serde_yaml::Error),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// How annotations are turned into overrides and how the result is written.
#[derive(Debug, Clone)]
pub struct HookOptions {
    /// Annotation prefix selecting the overrides.
    pub prefix: String,
    /// Sort the annotation overrides by path before applying them.
    pub sort: bool,
    /// Overrides applied after the annotation overrides.
    pub extra: Vec<Override>,
    pub serialize: SerializeOptions,
}

impl Default for HookOptions {
    fn default() -> Self {
        Self {
            prefix: ANNOTATION_PREFIX.to_string(),
            sort: false,
            extra: Vec::new(),
            serialize: SerializeOptions::default(),
        }
    }
}

/// Collect the overrides for a VirtualMachineInstance in the order they are applied.
pub fn collect_overrides(vmi: &VirtualMachineInstance, options: &HookOptions) -> Vec<Override> {
    let mut overrides = extract_overrides(&vmi.metadata.annotations, &options.prefix);
    if options.sort {
        sort_overrides(&mut overrides);
    }
    overrides.extend(options.extra.iter().cloned());
    overrides
}

/// Handle the `OnDefineDomain` hook point: apply the annotation overrides of
/// the VirtualMachineInstance to the domain XML.
///
/// # Arguments
///
/// * `vmi`: The VirtualMachineInstance the domain belongs to
/// * `domain_xml`: The domain XML about to be defined
/// * `options`: Override selection and output options
/// * `reporter`: Receives the outcome of every override
///
/// returns: Result<Vec<u8>, HookError>
pub fn on_define_domain(
    vmi: &VirtualMachineInstance,
    domain_xml: &[u8],
    options: &HookOptions,
    reporter: &dyn MergeReporter,
) -> Result<Vec<u8>, HookError> {
    info!(
        "Hook's OnDefineDomain callback method has been called for {}",
        vmi.display_name()
    );

    let overrides = collect_overrides(vmi, options);
    let output = PathMerger::new(reporter)
        .with_options(options.serialize)
        .merge(domain_xml, &overrides)?;

    info!(
        "Successfully updated original domain spec with requested annotations ({} applied, {} skipped)",
        output.summary.applied,
        output.summary.skipped.len()
    );
    Ok(output.document)
}
