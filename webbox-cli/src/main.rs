//! Command-line layout driver (§6): reads a serialized document fixture,
//! runs the layout engine, and prints the canonical JSON view tree.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use webbox_dom::fixture::{FixtureDocument, FixtureNode};
use webbox_layout::{json, layout, DocumentScale, LayoutOptions, Viewport};
use webbox_text::SimpleTextShaper;

/// Run the webbox layout engine over a document fixture and print the
/// resulting view tree.
#[derive(Parser, Debug)]
#[command(name = "webbox-cli", version, about)]
struct Cli {
    /// Path to a JSON-serialized `FixtureNode` tree.
    document: PathBuf,

    /// Output format. Only `json` is currently supported.
    #[arg(long, default_value = "json")]
    format: String,

    /// `given_scale x pixel_ratio`, recorded on the root view but unused by
    /// layout itself.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Viewport size as `WIDTHxHEIGHT`, e.g. `1280x720`.
    #[arg(long, default_value = "800x600")]
    viewport: String,

    /// Root font size in CSS pixels, for `rem` resolution.
    #[arg(long, default_value_t = 16.0)]
    root_font_size: f32,
}

fn parse_viewport(spec: &str) -> Result<(f32, f32)> {
    let (w, h) = spec
        .split_once('x')
        .with_context(|| format!("expected WIDTHxHEIGHT, got `{spec}`"))?;
    let width: f32 = w.parse().with_context(|| format!("invalid viewport width `{w}`"))?;
    let height: f32 = h.parse().with_context(|| format!("invalid viewport height `{h}`"))?;
    Ok((width, height))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.format != "json" {
        anyhow::bail!("unsupported --format `{}` (only `json` is implemented)", cli.format);
    }

    let raw = fs::read_to_string(&cli.document)
        .with_context(|| format!("reading document `{}`", cli.document.display()))?;
    let fixture: FixtureNode = serde_json::from_str(&raw)
        .with_context(|| format!("parsing `{}` as a FixtureNode tree", cli.document.display()))?;
    let dom = FixtureDocument::from_root(fixture);

    let (width_css_px, height_css_px) = parse_viewport(&cli.viewport)?;
    let viewport = Viewport { width_css_px, height_css_px, root_font_size_px: cli.root_font_size };
    let scale = DocumentScale { given_scale: cli.scale, pixel_ratio: 1.0 };
    let shaper = SimpleTextShaper::new();

    log::info!("laying out `{}` at {}x{}", cli.document.display(), width_css_px, height_css_px);
    let tree = layout(&dom, viewport, scale, &shaper, LayoutOptions::default())
        .context("layout failed")?;

    let value = json::to_json(&tree);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
