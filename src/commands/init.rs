use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{arg, Args};
use dialoguer::Confirm;
use path_absolutize::*;
use simplelog::info;
use thiserror::Error;

use crate::project::config::{HookConfig, CONFIG_FILE_NAME};

#[derive(Debug, Args)]
pub struct InitOptions {
    #[arg()]
    /// The directory to write the config file to. If not specified, the current directory is used.
    path: Option<PathBuf>,
    #[arg(short, long)]
    /// Overwrite an existing config file without asking.
    force: bool,
    #[arg(short, long)]
    /// Do not prompt before overwriting an existing config file.
    /// An existing file is left untouched unless --force is given.
    no_prompt: bool,
}

#[derive(Debug, Error)]
enum InitError {
    #[error("The path {0} is not a directory.")]
    PathIsNotADirectory(PathBuf),
    #[error("The config file {0} already exists. Use --force to recreate the configuration.")]
    AlreadyInitialized(PathBuf),
}

fn confirm_overwrite(config_file: &Path, no_prompt: bool) -> Result<bool> {
    if no_prompt || !console::user_attended() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(format!(
            "The config file {} already exists. Do you want to overwrite it?",
            config_file.display()
        ))
        .default(false)
        .wait_for_newline(true)
        .interact()
        .context("Could not get user input")
}

/// Write a config file with the default settings.
///
/// # Arguments
///
/// * `opts`: Initialization options
///
/// returns: Result<(), Error>
pub fn init_config(opts: InitOptions) -> Result<()> {
    let target_path = match opts.path {
        Some(path) => {
            if path.exists() && !path.is_dir() {
                return Err(InitError::PathIsNotADirectory(path).into());
            }
            path.absolutize()
                .context("Could not resolve the full path")?
                .to_path_buf()
        }
        None => std::env::current_dir()?,
    };

    let config_file = target_path.join(CONFIG_FILE_NAME);
    if config_file.exists() && !opts.force && !confirm_overwrite(&config_file, opts.no_prompt)? {
        return Err(InitError::AlreadyInitialized(config_file).into());
    }

    std::fs::create_dir_all(&target_path).context("Could not create the target directory")?;
    HookConfig::default().write_file(&config_file)?;

    info!("Wrote default configuration to {}", config_file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(path: &Path, force: bool) -> InitOptions {
        InitOptions {
            path: Some(path.to_path_buf()),
            force,
            no_prompt: true,
        }
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("hook");
        init_config(options(&target, false)).unwrap();

        let config = HookConfig::read_file(&target.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, HookConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_file, "indent = true\n").unwrap();

        let err = init_config(options(dir.path(), false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InitError>(),
            Some(InitError::AlreadyInitialized(_))
        ));
        assert_eq!(std::fs::read_to_string(&config_file).unwrap(), "indent = true\n");

        init_config(options(dir.path(), true)).unwrap();
        assert_eq!(
            HookConfig::read_file(&config_file).unwrap(),
            HookConfig::default()
        );
    }

    #[test]
    fn test_init_rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "").unwrap();

        let err = init_config(options(&file, false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InitError>(),
            Some(InitError::PathIsNotADirectory(_))
        ));
    }
}
