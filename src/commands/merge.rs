use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use simplelog::__private::paris::LogIcon;
use simplelog::info;
use thiserror::Error;

use crate::domain::{LogReporter, Override, SerializeOptions};
use crate::hook::{on_define_domain, HookOptions, ManifestFormat, VirtualMachineInstance};
use crate::project::config::HookConfig;
use crate::util::io::{read_input, write_output, StdioPathExtension};

#[derive(Debug, Args)]
pub struct MergeOptions {
    #[arg(short, long, default_value = "-")]
    /// The domain XML to update. Use `-` to read it from standard input.
    domain: PathBuf,
    #[arg(long)]
    /// The VirtualMachineInstance manifest whose annotations are applied.
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as JSON.
    vmi: Option<PathBuf>,
    #[arg(short = 's', long = "set", value_name = "PATH=VALUE")]
    /// An override to apply after the annotation overrides. Can be given multiple times.
    set: Vec<Override>,
    #[arg(long)]
    /// Prefix of the annotations to apply. Overrides the config file.
    prefix: Option<String>,
    #[arg(long)]
    /// Sort the annotation overrides by path before applying them.
    sort: bool,
    #[arg(long)]
    /// Indent the written XML.
    indent: bool,
    #[arg(short, long)]
    /// Write the updated domain XML to this file instead of standard output.
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum MergeCommandError {
    #[error("The domain and the VMI cannot both be read from standard input.")]
    BothFromStdin,
}

impl MergeOptions {
    fn hook_options(&self, config: &HookConfig) -> HookOptions {
        HookOptions {
            prefix: self
                .prefix
                .clone()
                .unwrap_or_else(|| config.annotation_prefix.clone()),
            sort: self.sort || config.sort_overrides,
            extra: self.set.clone(),
            serialize: SerializeOptions {
                indent: self.indent || config.indent,
            },
        }
    }

    fn read_vmi(&self) -> Result<VirtualMachineInstance> {
        let Some(vmi_path) = &self.vmi else {
            return Ok(VirtualMachineInstance::default());
        };
        let manifest = read_input(vmi_path)?;
        let vmi = VirtualMachineInstance::parse(&manifest, ManifestFormat::from_path(vmi_path))
            .with_context(|| format!("Could not read VMI manifest {}", vmi_path.display()))?;
        Ok(vmi)
    }
}

/// Apply the annotation overrides of a VirtualMachineInstance to a domain XML.
///
/// # Arguments
///
/// * `opts`: Merge options
/// * `config`: The loaded hook configuration
///
/// returns: Result<(), Error>
pub fn merge_domain(opts: MergeOptions, config: &HookConfig) -> Result<()> {
    if opts.domain.is_stdio() && opts.vmi.as_deref().is_some_and(|vmi| vmi.is_stdio()) {
        return Err(MergeCommandError::BothFromStdin.into());
    }

    let vmi = opts.read_vmi()?;
    let domain_xml = read_input(&opts.domain)?;
    let hook_options = opts.hook_options(config);

    let new_domain_xml = on_define_domain(&vmi, &domain_xml, &hook_options, &LogReporter)
        .with_context(|| format!("Could not update domain {}", opts.domain.display()))?;

    write_output(opts.output.as_deref(), &new_domain_xml)?;
    if let Some(output) = opts.output.as_ref().filter(|output| !output.is_stdio()) {
        info!("{} Wrote updated domain to {}", LogIcon::Tick, output.display());
    }

    Ok(())
}
