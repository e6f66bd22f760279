//! Bundleview - Entry Point
//!
//! Renders an asset bundle document against a tileset and writes the
//! composed view to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::RgbaImage;

use bundleview::atlas::{Atlas, AtlasHandle, AtlasStatus};
use bundleview::config::{default_config_path, ViewerConfig};
use bundleview::export;
use bundleview::render::kitty::{is_kitty_supported, KittyGraphics};
use bundleview::{RenderedView, Section, Viewer};

/// Bundleview - asset bundle previewer
#[derive(Parser)]
#[command(name = "bundleview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a bundle document and export the view
    Render {
        /// Bundle document (JSON)
        document: PathBuf,

        /// Tileset image, overriding the config
        #[arg(short, long)]
        atlas: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Show the view inline (Kitty graphics protocol)
        #[arg(short, long)]
        preview: bool,
    },

    /// Write the default config file
    InitConfig {
        /// Destination (defaults to the platform config directory)
        path: Option<PathBuf>,
    },

    /// Print the cards a document would produce
    Summary {
        /// Bundle document (JSON)
        document: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    log::debug!("Starting Bundleview v{}", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Render {
            document,
            atlas,
            out,
            preview,
        } => render(config, &document, atlas, &out, preview),
        Commands::InitConfig { path } => init_config(&config, path),
        Commands::Summary { document } => summary(config, &document),
    }
}

fn render(
    mut config: ViewerConfig,
    document: &Path,
    atlas: Option<PathBuf>,
    out: &Path,
    preview: bool,
) -> Result<()> {
    if let Some(path) = atlas {
        config.atlas.path = path;
    }

    // Decode the atlas while the document is read
    let handle = AtlasHandle::load_async(config.atlas.path.clone(), config.atlas.clone());
    let text = fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;

    let timeout = Duration::from_secs(config.atlas.load_timeout_secs);
    if handle.wait(timeout) == AtlasStatus::Loading {
        bail!(
            "Atlas {} did not load within {}s",
            config.atlas.path.display(),
            config.atlas.load_timeout_secs
        );
    }

    let mut viewer = Viewer::new(config, handle);
    viewer.load_document(&text).context("Failed to render document")?;
    let path = viewer.export(out).context("Failed to export view")?;
    println!("{}", path.display());
    if viewer.config().export.write_manifest {
        println!("{}", export::manifest_path(&path).display());
    }

    if preview {
        if !is_kitty_supported() {
            log::warn!("Terminal does not appear to support the Kitty graphics protocol");
        }
        let image = image::open(&path)
            .with_context(|| format!("Failed to reopen {}", path.display()))?
            .to_rgba8();
        KittyGraphics::new().display(&mut io::stdout().lock(), &image)?;
    }

    Ok(())
}

fn init_config(config: &ViewerConfig, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    config
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn summary(config: ViewerConfig, document: &Path) -> Result<()> {
    let text = fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;

    // Cells outside the blank atlas sample as transparent
    let side = config.atlas.tile_size.max(1);
    let handle = AtlasHandle::ready(Atlas::from_rgba(RgbaImage::new(side, side)));
    let mut viewer = Viewer::new(config, handle);
    let view = viewer.load_document(&text).context("Failed to parse document")?;

    print!("{}", describe(view));
    Ok(())
}

fn describe_levels(view: &RenderedView, text: &mut String) {
    if view.levels.is_empty() {
        return;
    }
    text.push_str(&format!("\n{}\n", Section::Levels.title()));
    for row in &view.levels {
        match row.depth_label() {
            Some(depth) => text.push_str(&format!("  {} ({})\n", row.name, depth)),
            None => text.push_str(&format!("  {}\n", row.name)),
        }
    }
}

/// Plain-text listing of a view, grouped by section
fn describe(view: &RenderedView) -> String {
    let mut text = format!("{}\n", view.header.name);
    if !view.header.description.is_empty() {
        text.push_str(&format!("  {}\n", view.header.description));
    }

    let mut current = None;
    let mut levels_listed = false;
    for (section, card) in view.cards() {
        if matches!(section, Section::Enemies | Section::Weapons) && !levels_listed {
            describe_levels(view, &mut text);
            levels_listed = true;
        }
        if current != Some(section) {
            text.push_str(&format!("\n{}\n", section.title()));
            current = Some(section);
        }
        let notes: Vec<String> = card.annotations.iter().map(|a| a.to_string()).collect();
        if notes.is_empty() {
            text.push_str(&format!("  {}\n", card.label));
        } else {
            text.push_str(&format!("  {} ({})\n", card.label, notes.join(", ")));
        }
    }
    if !levels_listed {
        describe_levels(view, &mut text);
    }

    text.push_str(&format!("\n{} tiles\n", view.tile_count()));
    text
}
