mod check;
mod completions;
mod explain;
mod generate;
mod init;

use std::path::{Path, PathBuf};

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use dacgen_codegen::{GenerateOptions, Generator};
use dacgen_manifest::{CONFIG_FILE_NAME, ExtractorConfig};
use eyre::Result;
use explain::ExplainCommand;
use generate::GenerateCommand;
use init::InitCommand;

/// Extension trait for exiting on configuration errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for dacgen_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "dacgen")]
#[command(version)]
#[command(about = "Generate C# data-access code from SQL Server schema packages")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Explain(cmd) => cmd.run(),
            Commands::Init(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entity and data-access files from a schema package
    Generate(GenerateCommand),

    /// Validate dacgen.toml and resolve the schema without writing files
    Check(CheckCommand),

    /// Show the resolved entities, accessors and routines
    Explain(ExplainCommand),

    /// Create a default dacgen.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Arguments shared by every command that reads a schema package.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Path to dacgen.toml (defaults to ./dacgen.toml)
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Active build configuration, checked against `enabled_in_configurations`
    #[arg(long, default_value = "Debug")]
    pub configuration: String,

    /// Schema package to read, overriding the configured path
    #[arg(long)]
    pub dacpac: Option<PathBuf>,
}

impl RunArgs {
    /// Load the configuration, exiting with a rendered diagnostic on failure.
    pub fn generator(&self) -> Generator {
        Generator::new(ExtractorConfig::from_file(&self.config).unwrap_or_exit())
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            configuration: self.configuration.clone(),
            dacpac: self.dacpac.clone(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }
}
