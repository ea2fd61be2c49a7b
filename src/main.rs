use clap::Parser;
use miette::Result;

use dtk::cli::{Cli, Commands};
use dtk::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = if cli.quiet {
        Printer::quiet()
    } else {
        Printer::new()
    };

    match cli.command {
        Commands::Build(args) => dtk::cli::build::run(args, &printer)?,
        Commands::Watch(args) => dtk::cli::watch::run(args, &printer)?,
        Commands::List(args) => dtk::cli::list::run(args, &printer)?,
        Commands::Validate(args) => dtk::cli::validate::run(args, &printer)?,
        Commands::Init(args) => dtk::cli::init::run(args, &printer)?,
        Commands::Completions(args) => dtk::cli::completions::run(args)?,
    }

    Ok(())
}
