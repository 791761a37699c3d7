use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{command, Parser, Subcommand};
use shadow_rs::shadow;
use simplelog::*;
use simplelog::__private::paris::LogIcon;

use custom_hook::commands::{self, InfoOptions, InitOptions, MergeOptions};
use custom_hook::project::config::HookConfig;

shadow!(build);

#[derive(Debug, Parser)]
#[command(version = build::CLAP_LONG_VERSION)]
#[command(arg_required_else_help = true)]
#[command(next_line_help = true)]
#[command(propagate_version = true)]
#[command(long_about)]
/// A hook sidecar tool that applies annotation overrides to libvirt domain XML
///
/// Annotations of a VirtualMachineInstance named `custom.kubevirt.io/<path>` set
/// the element at the dotted <path> of the domain XML to the annotation value,
/// creating missing elements on the way.
struct Cli {
    #[arg(short, long, global = true)]
    /// Path to a TOML config file
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    /// Print debug output
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "merge")]
    /// Apply the annotation overrides of a VMI to a domain XML
    Merge(MergeOptions),

    #[command(name = "info")]
    /// Print the hook description
    Info(InfoOptions),

    #[command(name = "init")]
    /// Write a config file with the default settings
    Init(InitOptions),
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge(opts) => {
            commands::merge_domain(opts, &HookConfig::load(cli.config.as_deref())?)
        }
        Command::Info(opts) => commands::print_info(opts, &HookConfig::load(cli.config.as_deref())?),
        Command::Init(opts) => commands::init_config(opts),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Standard output carries the documents, keep all logging on standard error
    if let Err(e) = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]) {
        eprintln!("Could not initialize logging: {}", e);
    }

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("<red>{}</> {:#}", LogIcon::Warning, e);
            ExitCode::FAILURE
        }
    }
}
