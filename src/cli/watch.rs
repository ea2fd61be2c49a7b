//! Watch command implementation.
//!
//! Runs a full build, then rebuilds from scratch whenever a token set or the
//! manifest changes. Bursts of events (editors writing several files) are
//! folded into a single rebuild.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use clap::Args;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::build::Builder;
use crate::error::{DtkError, Result};
use crate::output::{display_path, Printer};

use super::ProjectArgs;

/// Rebuild whenever a token set or the manifest changes
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Quiet period before rebuilding, in milliseconds
    #[arg(long, default_value = "200")]
    pub debounce: u64,
}

pub fn run(args: WatchArgs, printer: &Printer) -> Result<()> {
    let roots = watch_roots(&args.project)?;
    rebuild(&args.project, printer);

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(tx).map_err(|e| DtkError::Build {
        message: format!("Failed to start watcher: {}", e),
        help: None,
    })?;

    for root in &roots {
        let mode = if root.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(root, mode).map_err(|e| DtkError::Io {
            path: root.clone(),
            message: format!("Failed to watch: {}", e),
        })?;
    }

    printer.info("Watching", &describe(&roots));

    let debounce = Duration::from_millis(args.debounce);
    let mut pending: Option<Instant> = None;

    loop {
        match rx.recv_timeout(debounce) {
            Ok(Ok(event)) => {
                if is_relevant(&event) {
                    pending = Some(Instant::now());
                }
            }
            Ok(Err(e)) => printer.warning("warning", &format!("watch error: {}", e)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if pending.is_some_and(|since| since.elapsed() >= debounce) {
            pending = None;
            printer.info("Changed", "rebuilding");
            rebuild(&args.project, printer);
        }
    }

    Ok(())
}

/// The token directory plus the manifest, when one exists.
fn watch_roots(project: &ProjectArgs) -> Result<Vec<PathBuf>> {
    let loaded = project.load()?;
    let mut roots = vec![loaded.tokens_dir()];
    if loaded.has_manifest {
        roots.push(loaded.manifest_path());
    }
    Ok(roots)
}

/// Rediscover and rebuild. Errors are printed; the watcher keeps running.
fn rebuild(project: &ProjectArgs, printer: &Printer) {
    let result = project.load().and_then(|project| {
        let css_dir = project.css_dir();
        let report = Builder::new(project)?.run(printer)?;
        super::build::finish(&report, &css_dir, printer)
    });

    if let Err(e) = result {
        printer.error("error", &e.to_string());
    }
}

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| is_source(p))
}

/// JSON token sets and YAML manifests; editor swap files are ignored.
fn is_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

fn describe(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| display_path(r))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_relevant_events() {
        assert!(is_relevant(&event(
            EventKind::Modify(ModifyKind::Any),
            "tokens/core.json"
        )));
        assert!(is_relevant(&event(
            EventKind::Create(CreateKind::File),
            "dtk.yaml"
        )));
        assert!(!is_relevant(&event(
            EventKind::Modify(ModifyKind::Any),
            "tokens/.core.json.swp"
        )));
        assert!(!is_relevant(&event(
            EventKind::Access(AccessKind::Any),
            "tokens/core.json"
        )));
    }

    #[test]
    fn test_watch_roots_include_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tokens")).unwrap();
        std::fs::write(dir.path().join("tokens/$metadata.json"), "{}").unwrap();
        std::fs::write(dir.path().join("dtk.yaml"), "").unwrap();

        let args = ProjectArgs {
            path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let roots = watch_roots(&args).unwrap();
        assert_eq!(roots, vec![dir.path().join("tokens"), dir.path().join("dtk.yaml")]);
    }
}
