mod files;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use filmstrip_render::config::FrameHeight;
use filmstrip_render::session::{Printer, Session};
use filmstrip_render::{FilmstripConfig, FilmstripRenderer, LayoutPlan};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use walkdir::WalkDir;

use files::{images_in_directory, CommandPrinter, FilePicker, JpegFileEncoder};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compose photographs into a printable filmstrip")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose photos into a filmstrip JPEG, optionally printing it
    Compose(ComposeArgs),
    /// Print the strip, frame and photo geometry without rendering
    Plan(PlanArgs),
    /// Compose one filmstrip per subdirectory of a folder
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Image files, or a single directory holding exactly the needed number of images
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output path (defaults to the configured file name next to the first image)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Send the composite to the printer before saving
    #[arg(long, default_value_t = false)]
    print: bool,
    /// Print spooler command fed the JPEG on stdin
    #[arg(long)]
    print_command: Option<String>,
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Source image size as WIDTHxHEIGHT, once per photo
    #[arg(long = "image", value_parser = parse_size)]
    images: Vec<(u32, u32)>,
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Folder whose subdirectories each hold one filmstrip worth of photos
    root: PathBuf,
    #[command(flatten)]
    settings: LayoutSettings,
}

#[derive(Parser, Debug, Clone)]
struct LayoutSettings {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of strips
    #[arg(long)]
    strips: Option<usize>,
    /// Strip fill color as #rrggbb
    #[arg(long)]
    background: Option<String>,
    /// Frame height as a fraction of the strip height (leaves gaps between frames)
    #[arg(long)]
    frame_height: Option<f64>,
    /// Give every strip its own photos instead of repeating the same sequence
    #[arg(long, default_value_t = false)]
    no_duplicate: bool,
    /// Canvas resolution in pixels per inch
    #[arg(long)]
    resolution: Option<f64>,
    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compose(args) => compose(args),
        Commands::Plan(args) => plan(args),
        Commands::Batch(args) => batch(args).map(|_| ()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn compose(args: ComposeArgs) -> Result<()> {
    let config = args.settings.load()?;
    let options = config.options().context("invalid filmstrip configuration")?;

    let mut session = Session::new(options, config.output.file_name.clone());
    if let Some(output) = &args.output {
        session = session.with_output_path(output);
    }

    let mut picker = FilePicker::new(&args.inputs, &config.output.file_name);
    let mut encoder = JpegFileEncoder::new(config.output.jpeg_quality);
    let mut printer = if args.print {
        let command = args.print_command.as_deref().unwrap_or(&config.output.print_command);
        Some(CommandPrinter::new(command, config.output.jpeg_quality)?)
    } else {
        None
    };

    let report = session
        .run(&mut picker, printer.as_mut().map(|p| p as &mut dyn Printer), &mut encoder)
        .with_context(|| format!("failed to compose filmstrip from {:?}", args.inputs))?;

    println!("{}", report.output.display());
    Ok(())
}

fn plan(args: PlanArgs) -> Result<()> {
    let config = args.settings.load()?;
    let options = config.options().context("invalid filmstrip configuration")?;

    let images = if args.images.is_empty() {
        vec![(4000, 3000); options.layout.required_sources()]
    } else {
        args.images
    };

    let plan = FilmstripRenderer.plan_only(&images, &options)?;
    print!("{}", describe_plan(&plan));
    Ok(())
}

/// Returns how many filmstrips were written.
fn batch(args: BatchArgs) -> Result<usize> {
    let config = args.settings.load()?;
    let options = config.options().context("invalid filmstrip configuration")?;
    let expected = options.layout.required_sources();

    let mut folders: Vec<PathBuf> = WalkDir::new(&args.root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();
    folders.sort();
    if folders.is_empty() {
        anyhow::bail!("no subdirectories found in {:?}", args.root);
    }

    let progress = ProgressBar::new(folders.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} filmstrips {msg}",
        )?
        .progress_chars("=> "),
    );

    let session = Session::new(options, config.output.file_name.clone());
    let mut encoder = JpegFileEncoder::new(config.output.jpeg_quality);
    let mut composed = 0;

    for folder in &folders {
        let images = images_in_directory(folder, &config.output.file_name);
        if images.len() != expected {
            warn!("skipping {:?}: found {} images, need {}", folder, images.len(), expected);
            progress.inc(1);
            continue;
        }

        let mut picker = FilePicker::new(&images, &config.output.file_name);
        let report = session
            .run(&mut picker, None, &mut encoder)
            .with_context(|| format!("failed to compose filmstrip in {:?}", folder))?;
        info!("wrote {}", report.output.display());
        composed += 1;
        progress.inc(1);
    }

    progress.finish_with_message(format!("{composed} filmstrips written under {:?}", args.root));
    Ok(composed)
}

impl LayoutSettings {
    fn load(&self) -> Result<FilmstripConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => FilmstripConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut FilmstripConfig) {
        if let Some(strips) = self.strips {
            config.layout.strip_count = strips;
        }
        if let Some(background) = &self.background {
            config.layout.background = background.clone();
        }
        if let Some(fraction) = self.frame_height {
            config.layout.frame_height = FrameHeight::Fraction(fraction);
        }
        if self.no_duplicate {
            config.layout.duplicate_across_strips = false;
        }
        if let Some(resolution) = self.resolution {
            config.canvas.resolution = resolution;
        }
        if let Some(quality) = self.quality {
            config.output.jpeg_quality = quality;
        }
    }
}

fn read_config(path: &Path) -> Result<FilmstripConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read config {:?}", path))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {:?}", path))
}

fn parse_size(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width = width.trim().parse().map_err(|err| format!("bad width in {value:?}: {err}"))?;
    let height = height.trim().parse().map_err(|err| format!("bad height in {value:?}: {err}"))?;
    Ok((width, height))
}

fn describe_plan(plan: &LayoutPlan) -> String {
    let mut out = format!(
        "canvas {}x{} px at {} ppi\n",
        plan.canvas.width, plan.canvas.height, plan.canvas.resolution
    );
    for strip in &plan.strips {
        let r = strip.rect;
        out.push_str(&format!(
            "strip {}: x={:.1} y={:.1} w={:.1} h={:.1}\n",
            strip.index + 1,
            r.x,
            r.y,
            r.width,
            r.height
        ));
        for frame in &strip.frames {
            let f = frame.rect;
            out.push_str(&format!(
                "  frame {}: x={:.1} y={:.1} w={:.1} h={:.1}\n",
                frame.slot + 1,
                f.x,
                f.y,
                f.width,
                f.height
            ));
            if let Some(placement) =
                plan.placements.iter().find(|p| p.strip == strip.index && p.slot == frame.slot)
            {
                let fit = placement.fit;
                out.push_str(&format!(
                    "    image {}: scale {:.4} -> {:.1}x{:.1} at ({:.1}, {:.1})\n",
                    placement.source + 1,
                    fit.scale,
                    fit.scaled_width,
                    fit.scaled_height,
                    fit.offset_x,
                    fit.offset_y
                ));
            }
        }
    }
    out
}
