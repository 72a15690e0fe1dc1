//! # Shader Hot-Reloading
//!
//! Watches a directory for `.wgsl` writes and forwards the changed paths over
//! a channel. The editor drains the channel between frames, so the notify
//! thread never touches GPU state.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{bail, Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

const SHADER_EXTENSION: &str = "wgsl";

/// Start watching `dir`. Keep the returned watcher alive for as long as
/// updates are wanted; dropping it stops the notifications.
pub fn start(dir: &Path) -> Result<(RecommendedWatcher, Receiver<PathBuf>)> {
    if !dir.is_dir() {
        bail!("shader directory {} not found", dir.display());
    }
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| match result {
        Ok(event) => forward_shader_changes(&event, &tx),
        Err(e) => error!("file watcher error: {e:?}"),
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;

    info!(dir = %dir.display(), "shader watcher active");
    Ok((watcher, rx))
}

fn forward_shader_changes(event: &Event, tx: &Sender<PathBuf>) {
    if !event.kind.is_modify() && !event.kind.is_create() {
        return;
    }
    for path in event.paths.iter().filter(|p| is_shader_file(p)) {
        debug!(path = %path.display(), "shader changed");
        // The receiver is gone once the event loop has exited.
        let _ = tx.send(path.clone());
    }
}

fn is_shader_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SHADER_EXTENSION)
}
