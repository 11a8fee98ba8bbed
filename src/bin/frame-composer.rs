use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use frame_composer::{Catalog, Composer, FsAssetSource, Script, encode_png, replay};

#[derive(Parser, Debug)]
#[command(name = "frame-composer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an intent script and write the exported PNG.
    Render(RenderArgs),
    /// List the frames and filter presets of a catalog.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Intent script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Catalog JSON. Defaults to the built-in catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Root directory for frame and font assets. Defaults to the script's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory (uses the catalog's export name) or PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the interactive preview (with selection outline) to this path.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON. Defaults to the built-in catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the full catalog as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(p) => {
            Catalog::from_path(p).with_context(|| format!("load catalog '{}'", p.display()))
        }
        None => Ok(Catalog::builtin()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let script = Script::from_path(&args.script)
        .with_context(|| format!("load script '{}'", args.script.display()))?;
    let script_dir = args
        .script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let assets_root = args.assets.clone().unwrap_or_else(|| script_dir.clone());

    let mut composer = Composer::new(catalog, FsAssetSource::new(assets_root))?;
    let report = replay(&mut composer, &script, &script_dir);
    for failure in &report.failures {
        eprintln!(
            "intent #{} ({}) failed: {}",
            failure.index, failure.op, failure.error
        );
    }
    if let Some(status) = composer.status() {
        eprintln!("status: {}", status.message);
    }

    if let Some(preview_path) = &args.preview {
        let frame = composer.preview()?;
        let png = encode_png(&frame)?;
        std::fs::write(preview_path, png)
            .with_context(|| format!("write preview '{}'", preview_path.display()))?;
        eprintln!("wrote {}", preview_path.display());
    }

    let artifact = match report.exports.into_iter().last() {
        Some(a) => a,
        None => composer
            .export()
            .context("script produced no export and the scene cannot be exported")?,
    };
    let path = artifact.write_to(&args.out)?;
    eprintln!("wrote {} ({}x{})", path.display(), artifact.width, artifact.height);
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("canvas: {0}x{0}", catalog.canvas.size);
    println!("frames:");
    for f in &catalog.frames {
        println!("  {:<10} {:<14} {}", f.id, f.name, f.source);
    }
    println!("filters:");
    for p in &catalog.filters {
        println!("  {:<10} {}", p.id, p.effect);
    }
    Ok(())
}
