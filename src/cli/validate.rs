//! Validate command implementation.

use clap::Args;

use crate::error::{DtkError, Result};
use crate::output::Printer;
use crate::validation::{summary, validate};

use super::ProjectArgs;

/// Check the project without writing anything
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let project = args.project.load()?;
    let result = validate(&project)?;

    printer.diagnostics(&result);

    if result.has_errors() {
        return Err(DtkError::Config {
            message: summary(&result),
            help: None,
        });
    }

    printer.status("Checked", &summary(&result));
    Ok(())
}
