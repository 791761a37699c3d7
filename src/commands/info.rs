use anyhow::{Context, Result};
use clap::Args;
use simplelog::info;

use crate::hook::{HookInfo, HookVersion};
use crate::project::config::HookConfig;
use crate::util::io::write_output;

#[derive(Debug, Args)]
pub struct InfoOptions {
    #[arg(long, value_enum)]
    /// The hook protocol version to report. Overrides the config file.
    hook_version: Option<HookVersion>,
}

/// Print the hook description as JSON.
///
/// # Arguments
///
/// * `opts`: Info options
/// * `config`: The loaded hook configuration
///
/// returns: Result<(), Error>
pub fn print_info(opts: InfoOptions, config: &HookConfig) -> Result<()> {
    info!("Hook's Info method has been called");

    let version = opts.hook_version.unwrap_or(config.hook_version);
    let mut info = serde_json::to_vec_pretty(&HookInfo::new(version))
        .context("Could not serialize hook info")?;
    info.push(b'\n');
    write_output(None, &info)
}
