use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use scrollreel::{
    CpuSurface, DirFrameSource, DocumentLayout, EngineConfig, PreloadOpts, ScrollEngine,
    ScrollSample, ScrollThrottle, TickOutput, evaluate_tick, preload_blocking,
};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Log preload and evaluation details to stderr.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preload frames, draw the frame for one scroll offset and write it as a PNG.
    Frame(FrameArgs),
    /// Print the signals and overlay states for one scroll offset.
    Signals(SignalsArgs),
    /// Replay a JSON array of scroll samples, coalescing them per paint.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Engine config JSON. Defaults to the reference configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Marker layout JSON. Defaults to the reference layout for the viewport height.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Directory the frame pattern is resolved against.
    #[arg(long)]
    frames: PathBuf,

    /// Scroll offset in pixels.
    #[arg(long)]
    offset: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override preload worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct SignalsArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll offset in pixels.
    #[arg(long)]
    offset: f64,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    page: PageArgs,

    /// JSON file holding an array of scroll samples.
    #[arg(long)]
    samples: PathBuf,

    /// Number of scroll events delivered between two paints.
    #[arg(long, default_value_t = 1)]
    events_per_paint: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Signals(args) => cmd_signals(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_page(args: &PageArgs) -> anyhow::Result<(EngineConfig, DocumentLayout)> {
    let config = match &args.config {
        Some(p) => EngineConfig::from_path(p)?,
        None => EngineConfig::reference(),
    };
    let layout = match &args.layout {
        Some(p) => DocumentLayout::from_path(p)?,
        None => DocumentLayout::reference(args.viewport_height),
    };
    Ok((config, layout))
}

fn print_tick(out: &TickOutput) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, out).context("serialize tick output")?;
    writeln!(stdout)?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (config, layout) = load_page(&args.page)?;
    let source = DirFrameSource::new(&args.frames, &config.frame_pattern)?;
    let (store, stats) = preload_blocking(
        Arc::new(source),
        config.frame_count,
        &PreloadOpts {
            threads: args.threads,
        },
    )?;
    if stats.failed > 0 {
        tracing::warn!(
            failed = stats.failed,
            requested = stats.requested,
            "some frames are unavailable"
        );
    }

    let mut surface = CpuSurface::new(config.surface_size()?);
    let mut engine = ScrollEngine::new(config, store)?;
    engine.present_placeholder(&mut surface);

    let sample = layout.sample(args.offset, args.page.viewport_height);
    let out = engine.on_scroll_sample(&sample, &layout, &mut surface);
    surface.save_png(&args.out)?;
    print_tick(&out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_signals(args: SignalsArgs) -> anyhow::Result<()> {
    let (config, layout) = load_page(&args.page)?;
    let sample = layout.sample(args.offset, args.page.viewport_height);
    print_tick(&evaluate_tick(&config, &sample, &layout))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let (config, layout) = load_page(&args.page)?;
    let samples = read_samples(&args.samples)?;
    let per_paint = args.events_per_paint.max(1);

    let mut throttle = ScrollThrottle::new();
    for (i, sample) in samples.into_iter().enumerate() {
        throttle.push(sample);
        if (i + 1) % per_paint == 0
            && let Some(s) = throttle.take_for_paint()
        {
            print_tick(&evaluate_tick(&config, &s, &layout))?;
        }
    }
    if let Some(s) = throttle.take_for_paint() {
        print_tick(&evaluate_tick(&config, &s, &layout))?;
    }
    tracing::info!(coalesced = throttle.coalesced(), "replay finished");
    Ok(())
}

fn read_samples(path: &Path) -> anyhow::Result<Vec<ScrollSample>> {
    let f = File::open(path).with_context(|| format!("open samples '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse samples '{}'", path.display()))
}
