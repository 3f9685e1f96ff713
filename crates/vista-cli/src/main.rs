//! Vista CLI - Launches the scene editor
//!
//! Usage:
//!   vista [--config <path>] [--model <path>] [--width N] [--height N] [--verbose]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use vista_core::{ViewerConfig, LOCAL_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(about = "Minimal 3D scene editor with picking and a transform gizmo")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (defaults to ./vista.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model spawned by the "Add model" button
    #[arg(long)]
    model: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    /// Command-line values win over the config file
    fn apply_overrides(&self, config: &mut ViewerConfig) {
        if let Some(model) = &self.model {
            config.assets.model = model.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = ViewerConfig::load(args.config.as_deref()).with_context(|| {
        let path = args.config.as_deref().unwrap_or(Path::new(LOCAL_CONFIG_FILE));
        format!("Failed to load configuration from {}", path.display())
    })?;
    args.apply_overrides(&mut config);
    log::debug!("Configuration: {:?}", config);

    println!("Controls:");
    println!("  WASD        - Move");
    println!("  Q / E       - Move up / down");
    println!("  Right drag  - Look");
    println!("  Scroll      - Zoom");
    println!("  Left click  - Select entity");
    println!("  1 / 2 / 3   - Translate / Rotate / Scale gizmo");
    println!("  Escape      - Exit");

    vista_viewer::run(config)
}
