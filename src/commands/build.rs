//! Build the static site

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::{BuildReport, Generator};
use crate::{Site, CONFIG_FILE};

/// Load, validate, render and write the whole site
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let store = site.load_content()?;
    tracing::info!(
        "Loaded {} articles ({} published)",
        store.len(),
        store.list_published().len()
    );

    let generator = Generator::new(site)?;
    let report = generator.generate(&store)?;

    for unresolved in &report.unresolved_directives {
        tracing::warn!(
            "Article {} has an unresolved <{} /> directive",
            unresolved.article,
            unresolved.directive
        );
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}

/// Rebuild from a freshly loaded configuration
pub fn rebuild(base_dir: &Path) -> Result<BuildReport> {
    let site = Site::new(base_dir)?;
    run(&site)
}

/// Paths a rebuild depends on, with how to watch each
pub(crate) fn watched_paths(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    let mut paths = Vec::new();
    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            paths.push((dir.clone(), RecursiveMode::Recursive));
        }
    }
    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        paths.push((config_path, RecursiveMode::NonRecursive));
    }
    paths
}

/// Whether a change to this path warrants a rebuild
pub(crate) fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
}

/// Watch for file changes and rebuild until the watcher goes away
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for (path, mode) in watched_paths(site) {
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Ok(result) = rx.recv() {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }
                if let Err(e) = rebuild(&site.base_dir) {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_reports_invalid_content() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("broken.mdx"),
            "---\ntitle: Broken\n---\nno category or date\n",
        )
        .unwrap();

        let err = run(&site).unwrap_err();
        assert!(err.to_string().contains("broken.mdx"));
        assert!(!site.public_dir.join("index.html").exists());
    }

    #[test]
    fn test_watched_paths_skip_missing() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        assert!(watched_paths(&site).is_empty());

        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: Test\n").unwrap();
        let paths = watched_paths(&site);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].1, RecursiveMode::NonRecursive);
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/post.mdx")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/post.mdx~")));
    }
}
