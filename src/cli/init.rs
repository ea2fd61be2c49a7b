//! Init command implementation.
//!
//! Generates a `dtk.yaml` manifest from the token sets found on disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_token_sets, Manifest, Metadata, MANIFEST_FILENAME};
use crate::error::{DtkError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a dtk project by generating a dtk.yaml manifest
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Token directory, relative to the project root
    #[arg(long, default_value = "tokens")]
    pub tokens: PathBuf,

    /// Overwrite existing dtk.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(DtkError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let manifest = Manifest {
        tokens: args.tokens.clone(),
        ..Default::default()
    };
    let tokens_dir = args.path.join(&args.tokens);
    printer.status("Scanning", &display_path(&tokens_dir));

    let sets = match Metadata::load(&tokens_dir.join(&manifest.metadata)) {
        Ok(metadata) => metadata.sets().to_vec(),
        Err(_) => scan_token_sets(&tokens_dir, &manifest),
    };

    let yaml = scaffold(&args.tokens, &sets);
    fs::write(&manifest_path, &yaml).map_err(|e| DtkError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.status(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(sets.len(), "token set", "token sets")
        ),
    );

    Ok(())
}

/// A manifest with every setting spelled out and one theme per top-level
/// set, each excluding its siblings.
fn scaffold(tokens: &Path, sets: &[String]) -> String {
    let themes: Vec<&str> = sets
        .iter()
        .filter(|s| !s.contains('/'))
        .map(String::as_str)
        .filter(|s| is_theme_like(s))
        .collect();

    let mut yaml = String::new();
    yaml.push_str(&format!("tokens: {}\n", yaml_string(&tokens.to_string_lossy())));
    yaml.push_str("\ncss:\n  output: css\n  # prefix: rolo\n  output_references: true\n");
    yaml.push_str("\njson:\n  output: doc\n  combined: combined.json\n  keep_file_tag: false\n");
    yaml.push_str("\ntransforms:\n  shadow_inset: false\n  rounding: direct\n");

    if themes.len() < 2 {
        yaml.push_str("\n# Without themes every set builds into a single :root sheet.\n");
        yaml.push_str("# themes:\n#   - name: light\n#     exclude: [dark]\n");
        return yaml;
    }

    yaml.push_str("\nselectors:\n");
    for (i, theme) in themes.iter().enumerate() {
        let selector = if i == 0 {
            format!(":root, .{}", theme)
        } else {
            format!(".{}", theme)
        };
        yaml.push_str(&format!("  {}: {}\n", theme, yaml_string(&selector)));
    }

    yaml.push_str("\nthemes:\n");
    for theme in &themes {
        let others: Vec<String> = themes
            .iter()
            .filter(|t| *t != theme)
            .map(|t| yaml_string(t))
            .collect();
        yaml.push_str(&format!("  - name: {}\n", theme));
        yaml.push_str(&format!("    exclude: [{}]\n", others.join(", ")));
    }
    yaml.push_str(&format!(
        "  - name: root\n    exclude: [{}]\n    filter: fallback\n    structural: true\n",
        themes
            .iter()
            .map(|t| yaml_string(t))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    yaml
}

/// Sets conventionally holding a colour mode.
fn is_theme_like(set: &str) -> bool {
    let lower = set.to_lowercase();
    ["light", "dark", "contrast", "dim"]
        .iter()
        .any(|mode| lower.contains(mode))
}

fn yaml_string(s: &str) -> String {
    let plain = s
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'));
    if plain && !s.is_empty() {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use tempfile::tempdir;

    fn args(path: &Path, force: bool) -> InitArgs {
        InitArgs {
            path: path.to_path_buf(),
            tokens: PathBuf::from("tokens"),
            force,
        }
    }

    #[test]
    fn test_init_creates_loadable_manifest() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tokens")).unwrap();
        fs::write(
            dir.path().join("tokens/$metadata.json"),
            r#"{"tokenSetOrder": ["core", "light", "dark", "semantics/color"]}"#,
        )
        .unwrap();

        run(args(dir.path(), false), &Printer::quiet()).unwrap();

        let project = discover(dir.path()).unwrap();
        assert!(project.has_manifest);
        let themes = project.themes();
        let names: Vec<&str> = themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["light", "dark", "root"]);
        assert_eq!(themes[0].sets, vec!["core", "light", "semantics/color"]);
        assert_eq!(themes[0].selector.as_deref(), Some(":root, .light"));
        assert!(themes[2].structural);
    }

    #[test]
    fn test_init_without_modes_has_no_themes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tokens")).unwrap();
        fs::write(dir.path().join("tokens/core.json"), "{}").unwrap();

        run(args(dir.path(), false), &Printer::quiet()).unwrap();

        let content = fs::read_to_string(dir.path().join("dtk.yaml")).unwrap();
        let manifest = Manifest::parse(&content).unwrap();
        assert!(manifest.themes.is_empty());
        assert_eq!(manifest.tokens, PathBuf::from("tokens"));
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("dtk.yaml"), "tokens: design").unwrap();

        assert!(run(args(dir.path(), false), &Printer::quiet()).is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("dtk.yaml"), "tokens: design").unwrap();

        run(args(dir.path(), true), &Printer::quiet()).unwrap();

        let content = fs::read_to_string(dir.path().join("dtk.yaml")).unwrap();
        assert!(content.contains("tokens: tokens"));
    }
}
