use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pcbart_core::editcmd::{ApplyStatus, try_apply_edit_line};
use pcbart_core::{
    LayerCategory, LayerMap, ProcessingOptions, RenderedLayers, Session, SourceImage, catalog,
};

/// Simulate how a photo would look manufactured as a PCB, and export the
/// silkscreen, solder mask and copper layers.
#[derive(Parser, Debug)]
#[command(name = "pcbart", author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify an image and write the composite and layer masks
    Analyze {
        /// Input image (png, jpeg, bmp)
        image: PathBuf,

        #[command(flatten)]
        opts: OptionArgs,

        /// Directory for the rendered PNGs
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Also save the per-pixel layer labels as JSON
        #[arg(long)]
        labels: Option<PathBuf>,
    },
    /// Correct a saved layer map with brush commands, then re-export
    Edit {
        /// Layer labels JSON written by `analyze --labels`
        labels: PathBuf,

        /// Edit script; interactive prompt when omitted
        #[arg(short, long)]
        script: Option<PathBuf>,

        #[command(flatten)]
        opts: OptionArgs,

        /// Directory for the rendered PNGs
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Write the edited labels here; the input labels file is never modified
        #[arg(long)]
        save_labels: Option<PathBuf>,
    },
    /// List board colors and surface finishes
    Catalog,
}

#[derive(Args, Debug)]
struct OptionArgs {
    /// Options JSON file (boardColorKey, finishKey, sensitivity)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Board color key, e.g. green, white, black
    #[arg(short, long)]
    board: Option<String>,

    /// Surface finish key: gold or silver
    #[arg(short, long)]
    finish: Option<String>,

    /// Color tolerance, 0 (strict) to 100 (loose)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    sensitivity: Option<u8>,
}

impl OptionArgs {
    fn resolve(&self) -> anyhow::Result<ProcessingOptions> {
        let mut options = match &self.options {
            Some(path) => ProcessingOptions::load_json_file(path)
                .with_context(|| format!("load options: {}", path.display()))?,
            None => ProcessingOptions::default(),
        };
        if let Some(board) = &self.board {
            options.board_color_key = board.clone();
        }
        if let Some(finish) = &self.finish {
            options.finish_key = finish.clone();
        }
        if let Some(s) = self.sensitivity {
            options = options.with_sensitivity(s);
        }

        if !catalog::BOARD_COLORS
            .iter()
            .any(|b| b.key == options.board_color_key)
        {
            warn!(key = %options.board_color_key, "unknown board color, using green");
        }
        if !catalog::SURFACE_FINISHES
            .iter()
            .any(|f| f.key == options.finish_key)
        {
            warn!(key = %options.finish_key, "unknown finish, using gold");
        }
        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Command::Analyze {
            image,
            opts,
            out_dir,
            labels,
        } => analyze(&image, &opts.resolve()?, &out_dir, labels.as_deref()),
        Command::Edit {
            labels,
            script,
            opts,
            out_dir,
            save_labels,
        } => edit(
            &labels,
            script.as_deref(),
            &opts.resolve()?,
            &out_dir,
            save_labels.as_deref(),
        ),
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
    }
}

fn load_image(path: &Path) -> anyhow::Result<SourceImage> {
    let decoded = image::open(path)
        .with_context(|| format!("decode image: {}", path.display()))?
        .to_rgba8();
    let (w, h) = decoded.dimensions();
    let image = SourceImage::from_rgba_bytes(w, h, decoded.as_raw())?;
    Ok(image)
}

fn analyze(
    image_path: &Path,
    options: &ProcessingOptions,
    out_dir: &Path,
    labels: Option<&Path>,
) -> anyhow::Result<()> {
    let image = load_image(image_path)?;
    let session = Session::new(image, options.clone());

    print_stats(session.layer_map());
    write_layers(session.rendered(), out_dir)?;

    if let Some(path) = labels {
        session
            .layer_map()
            .save_json_file(path)
            .with_context(|| format!("save labels: {}", path.display()))?;
        info!("saved layer labels to {}", path.display());
    }
    Ok(())
}

fn edit(
    labels: &Path,
    script: Option<&Path>,
    options: &ProcessingOptions,
    out_dir: &Path,
    save_labels: Option<&Path>,
) -> anyhow::Result<()> {
    let map = LayerMap::load_json_file(labels)
        .with_context(|| format!("load labels: {}", labels.display()))?;
    let mut session = Session::from_layer_map(map, options.clone());

    match script {
        Some(path) => run_script(&mut session, path)?,
        None => repl(&mut session, labels, out_dir)?,
    }

    match save_labels {
        Some(path) => {
            session
                .layer_map()
                .save_json_file(path)
                .with_context(|| format!("save labels: {}", path.display()))?;
            info!("saved layer labels to {}", path.display());
        }
        None => info!("edited labels not saved; pass --save-labels to keep them"),
    }
    print_stats(session.layer_map());
    write_layers(session.rendered(), out_dir)
}

fn run_script(session: &mut Session, path: &Path) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read script: {}", path.display()))?;

    let mut changed = 0usize;
    for (n, line) in text.lines().enumerate() {
        if is_blank(line) {
            continue;
        }
        match try_apply_edit_line(line, session) {
            ApplyStatus::Applied { changed: true } => changed += 1,
            ApplyStatus::Applied { changed: false } => {}
            ApplyStatus::Incomplete => {
                bail!("{}:{}: incomplete command '{}'", path.display(), n + 1, line.trim())
            }
            ApplyStatus::NotEditCommand => {
                bail!("{}:{}: unknown command '{}'", path.display(), n + 1, line.trim())
            }
        }
    }

    info!(commands_with_changes = changed, "applied edit script");
    Ok(())
}

fn is_blank(line: &str) -> bool {
    let code = line.split('#').next().unwrap_or("");
    code.trim().is_empty()
}

fn repl(session: &mut Session, labels: &Path, out_dir: &Path) -> anyhow::Result<()> {
    println!(
        "Editing {} ({}x{}). Type 'help' for commands, 'quit' to finish.",
        labels.display(),
        session.layer_map().width(),
        session.layer_map().height()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("pcb> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // EOF (Ctrl+D)
            break;
        };
        let line = line?;
        let line = line.trim();
        if is_blank(line) {
            continue;
        }

        match try_apply_edit_line(line, session) {
            ApplyStatus::Applied { changed } => {
                if changed {
                    println!("(brush) layer map updated");
                }
                continue;
            }
            ApplyStatus::Incomplete => {
                println!("(brush) incomplete input…");
                continue;
            }
            ApplyStatus::NotEditCommand => {
                // fall through to session commands
            }
        }

        match line.to_lowercase().as_str() {
            "help" => {
                println!(
                    r#"Commands:
                        layer silk|pad|trace|mask|substrate
                        size <1..50>
                        paint <x> <y>
                        line <x0> <y0> <x1> <y1>
                        down <x> <y> / move <x> <y> / up
                        brush        (shows the current brush)
                        stats        (pixels per layer)
                        export       (writes the PNGs now)
                        quit
                        "#
                );
            }
            "brush" => {
                let category = session.brush.category;
                println!(
                    "Brush: {} ({}, {}) r={}",
                    category.tool_name(),
                    category.tool_label(),
                    category.swatch(),
                    session.brush.radius()
                );
            }
            "stats" => print_stats(session.layer_map()),
            "export" => write_layers(session.rendered(), out_dir)?,
            "quit" | "exit" => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}

fn write_layers(layers: &RenderedLayers, out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    for (name, buf) in layers.outputs() {
        if buf.as_bytes().is_empty() {
            warn!(layer = name, "empty image, nothing to write");
            continue;
        }
        let path = out_dir.join(format!("pcb-{name}.png"));
        let img = image::RgbaImage::from_raw(buf.width(), buf.height(), buf.as_bytes().to_vec())
            .context("rgba buffer does not match its dimensions")?;
        img.save(&path)
            .with_context(|| format!("write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn print_stats(map: &LayerMap) {
    let total = map.len().max(1);
    let counts = map.histogram();

    println!("Layers ({}x{}):", map.width(), map.height());
    for category in LayerCategory::ALL.into_iter().rev() {
        let n = counts[category];
        println!(
            "  {:<10} | {:>9} px | {:>5.1}%",
            category.tool_name(),
            n,
            n as f64 * 100.0 / total as f64
        );
    }
}

fn print_catalog() {
    println!("Board colors:");
    for b in &catalog::BOARD_COLORS {
        println!(
            "  {:<7} | {:<7} {} | light {} | deep {}",
            b.key, b.name, b.label, b.light, b.deep
        );
    }
    println!("Surface finishes:");
    for f in &catalog::SURFACE_FINISHES {
        println!("  {:<7} | {:<14} {} | {}", f.key, f.name, f.label, f.color);
    }
    println!("Brush tools:");
    for c in LayerCategory::ALL.into_iter().rev() {
        println!("  {:<9} | {} | {}", c.tool_name(), c.tool_label(), c.swatch());
    }
}
