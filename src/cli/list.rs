//! List command implementation.
//!
//! Resolves every theme and prints its selector and included token sets.

use clap::Args;
use serde::Serialize;

use crate::discovery::Project;
use crate::error::{DtkError, Result};
use crate::output::{plural, Printer};
use crate::types::{CssFilter, Theme};

use super::ProjectArgs;

/// List themes with their token sets and selectors
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print machine-readable JSON to stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ThemeEntry<'a> {
    name: &'a str,
    selector: &'a str,
    filter: CssFilter,
    structural: bool,
    sets: &'a [String],
}

#[derive(Debug, Serialize)]
struct Inventory<'a> {
    sets: &'a [String],
    transforms: Vec<&'static str>,
    themes: Vec<ThemeEntry<'a>>,
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let project = args.project.load()?;
    let themes = project.themes();

    if args.json {
        println!("{}", inventory_json(&project, &themes)?);
    } else {
        print_inventory(&project, &themes, printer);
    }

    Ok(())
}

fn inventory_json(project: &Project, themes: &[Theme]) -> Result<String> {
    let inventory = Inventory {
        sets: project.metadata.sets(),
        transforms: project.pipeline().rule_names(),
        themes: themes
            .iter()
            .map(|t| ThemeEntry {
                name: &t.name,
                selector: t.effective_selector(),
                filter: t.filter,
                structural: t.structural,
                sets: &t.sets,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&inventory).map_err(|e| DtkError::Build {
        message: format!("Failed to serialize inventory: {}", e),
        help: None,
    })
}

fn print_inventory(project: &Project, themes: &[Theme], printer: &Printer) {
    printer.info(
        "Sets",
        &plural(project.metadata.len(), "token set", "token sets"),
    );
    printer.info("Transforms", &project.pipeline().rule_names().join(", "));

    for theme in themes {
        let mut detail = format!(
            "{} {}",
            theme.effective_selector(),
            printer.dim(&format!("({})", plural(theme.sets.len(), "set", "sets")))
        );
        if theme.structural {
            detail.push_str(&printer.dim(" structural"));
        }
        printer.info(&theme.name, &detail);
        for set in &theme.sets {
            printer.info("", &printer.dim(set));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Manifest, Metadata};
    use crate::theme::ThemeConfig;
    use serde_json::Value;

    #[test]
    fn test_inventory_json() {
        let mut manifest = Manifest {
            themes: vec![
                ThemeConfig::new("light").excluding(["dark"]),
                ThemeConfig::new("dark").excluding(["light"]),
            ],
            ..Default::default()
        };
        manifest
            .selectors
            .insert("dark".to_string(), ".dark".to_string());
        let project = Project::from_parts(
            "/p",
            manifest,
            Metadata::from_sets(["core", "light", "dark"]),
        );

        let json = inventory_json(&project, &project.themes()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sets"].as_array().unwrap().len(), 3);
        assert_eq!(value["transforms"][0], "color/css");
        assert_eq!(value["themes"][0]["name"], "light");
        assert_eq!(value["themes"][0]["selector"], ":root");
        assert_eq!(value["themes"][0]["filter"], "namespace");
        assert_eq!(value["themes"][1]["selector"], ".dark");
        assert_eq!(
            value["themes"][1]["sets"],
            serde_json::json!(["core", "dark"])
        );
    }
}
