//! Build command implementation.
//!
//! Builds every theme's CSS sheet and the combined JSON document.

use std::path::Path;

use clap::Args;

use crate::build::{BuildReport, Builder};
use crate::error::{DtkError, Result};
use crate::output::{display_path, plural, Printer};

use super::ProjectArgs;

/// Build CSS sheets and the combined JSON document
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let project = args.project.load()?;
    if !project.has_manifest {
        printer.info(
            "Using",
            &format!("default settings (no dtk.yaml in {})", display_path(&project.root)),
        );
    }

    let css_dir = project.css_dir();
    let builder = Builder::new(project)?;
    let report = builder.run(printer)?;

    finish(&report, &css_dir, printer)
}

/// Print the summary line and turn a partial failure into an error.
pub(crate) fn finish(report: &BuildReport, css_dir: &Path, printer: &Printer) -> Result<()> {
    if report.is_success() {
        printer.status(
            "Finished",
            &format!(
                "{} to {}",
                plural(report.built.len(), "theme", "themes"),
                display_path(css_dir)
            ),
        );
        return Ok(());
    }

    Err(DtkError::Build {
        message: format!(
            "{} built, {}",
            plural(report.built.len(), "theme", "themes"),
            plural(report.failure_count(), "failure", "failures")
        ),
        help: Some("Stylesheets of the themes that built are still on disk".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_build_command_writes_css() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tokens")).unwrap();
        fs::write(
            dir.path().join("tokens/$metadata.json"),
            r#"{"tokenSetOrder": ["root"]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tokens/root.json"),
            r#"{"radius": {"md": {"value": "4"}}}"#,
        )
        .unwrap();

        let args = BuildArgs {
            project: ProjectArgs {
                path: dir.path().to_path_buf(),
                css_out: Some(PathBuf::from("out")),
                ..Default::default()
            },
        };
        run(args, &Printer::quiet()).unwrap();

        let css = fs::read_to_string(dir.path().join("out/root.css")).unwrap();
        assert_eq!(css, ":root {\n  --radius-md: 4;\n}\n");
    }

    #[test]
    fn test_build_command_reports_failures() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tokens")).unwrap();
        fs::write(
            dir.path().join("tokens/$metadata.json"),
            r#"{"tokenSetOrder": ["root"]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("tokens/root.json"), "[").unwrap();

        let args = BuildArgs {
            project: ProjectArgs {
                path: dir.path().to_path_buf(),
                ..Default::default()
            },
        };
        let err = run(args, &Printer::quiet()).unwrap_err();
        assert!(matches!(err, DtkError::Build { .. }));
    }
}
