//! # sdfed
//!
//! Opens the SDF editor window. Shapes are added with the number keys
//! `1`-`6`, picked with the left button and moved with the axis handles.
//! With `--shader-dir`, edits to `.wgsl` files in that directory are swapped
//! into the running editor.

mod watcher;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use editor::{EditorConfig, RunOptions};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON config file. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Window width in pixels, overriding the config file.
    #[arg(long)]
    width: Option<u32>,
    /// Window height in pixels, overriding the config file.
    #[arg(long)]
    height: Option<u32>,
    /// Directory of WGSL sources to hot reload.
    #[arg(long)]
    shader_dir: Option<PathBuf>,
    /// Start with one of each primitive.
    #[arg(long)]
    demo: bool,
    /// Do not watch the shader directory.
    #[arg(long)]
    no_watch: bool,
}

impl Cli {
    fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = cli.editor_config().context("failed to load configuration")?;

    let mut options = RunOptions {
        demo: cli.demo,
        shader_updates: None,
    };
    // The watcher must outlive the event loop.
    let _watcher = match (&cli.shader_dir, cli.no_watch) {
        (Some(dir), false) => match watcher::start(dir) {
            Ok((watcher, updates)) => {
                options.shader_updates = Some(updates);
                Some(watcher)
            }
            Err(e) => {
                error!("shader hot reload disabled: {e:?}");
                None
            }
        },
        _ => None,
    };

    info!(
        width = config.window.width,
        height = config.window.height,
        demo = cli.demo,
        "starting editor"
    );
    editor::run(config, options)
}
