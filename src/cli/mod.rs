pub mod build;
pub mod completions;
pub mod init;
pub mod list;
pub mod validate;
pub mod watch;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::discovery::{discover_with, Project};
use crate::error::Result;

/// dtk - Design token build pipeline
#[derive(Parser, Debug)]
#[command(name = "dtk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only print warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build CSS sheets and the combined JSON document for every theme
    Build(build::BuildArgs),

    /// Rebuild whenever a token set or the manifest changes
    Watch(watch::WatchArgs),

    /// List themes with their token sets and selectors
    List(list::ListArgs),

    /// Check the project without writing anything
    Validate(validate::ValidateArgs),

    /// Initialize a dtk project (generates dtk.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Project location plus per-run manifest overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Token directory, relative to the project root
    #[arg(long)]
    pub tokens: Option<PathBuf>,

    /// CSS output directory
    #[arg(long)]
    pub css_out: Option<PathBuf>,

    /// JSON output directory
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Custom-property prefix, e.g. `rolo`
    #[arg(long)]
    pub prefix: Option<String>,

    /// Always emit literal values instead of var() references
    #[arg(long)]
    pub no_references: bool,
}

impl ProjectArgs {
    /// Discover the project and apply the overrides.
    pub fn load(&self) -> Result<Project> {
        discover_with(&self.path, |manifest| {
            if let Some(tokens) = &self.tokens {
                manifest.tokens = tokens.clone();
            }
            if let Some(dir) = &self.css_out {
                manifest.css.output = dir.clone();
            }
            if let Some(dir) = &self.json_out {
                manifest.json.output = dir.clone();
            }
            if let Some(prefix) = &self.prefix {
                manifest.css.prefix = Some(prefix.clone());
            }
            if self.no_references {
                manifest.css.output_references = false;
            }
        })
    }
}
