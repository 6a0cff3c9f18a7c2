use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "lipsync", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample Rhubarb mouth cues into a per-frame weight timeline (JSON).
    Timeline(TimelineArgs),
    /// Build a full render plan: mouth weights plus active animation segments per frame.
    Plan(PlanArgs),
    /// Print the clip-local time of one frame inside a segment.
    LocalTime(LocalTimeArgs),
}

#[derive(Args, Debug)]
struct TimingArgs {
    /// JSON config file; explicit flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Cross-fade length at the end of each cue, in seconds.
    #[arg(long)]
    blend_window: Option<f64>,

    /// Hold time after the analysed audio, in seconds.
    #[arg(long)]
    tail_padding: Option<f64>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Rhubarb Lip Sync JSON output.
    #[arg(long)]
    cues: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Rhubarb Lip Sync JSON output.
    #[arg(long)]
    cues: PathBuf,

    /// JSON array of animation segments.
    #[arg(long)]
    segments: PathBuf,

    /// JSON object mapping `source` or `source/clip` to clip duration in seconds.
    #[arg(long)]
    durations: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// How overlapping segments are combined.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Parser, Debug)]
struct LocalTimeArgs {
    /// Output frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Segment start on the output timeline, in seconds.
    #[arg(long)]
    start: f64,

    /// Source clip duration in seconds.
    #[arg(long)]
    clip_duration: f64,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Wrap around at the end of the clip instead of holding the last pose.
    #[arg(long = "loop", default_value_t = false)]
    looped: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    First,
    Last,
    Weighted,
}

impl From<PolicyArg> for lipsync::CompositionPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::First => Self::FirstWins,
            PolicyArg::Last => Self::LastWins,
            PolicyArg::Weighted => Self::Weighted,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Timeline(args) => cmd_timeline(args),
        Command::Plan(args) => cmd_plan(args),
        Command::LocalTime(args) => cmd_local_time(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(env_filter)
        .init();
}

fn load_config(timing: &TimingArgs) -> anyhow::Result<lipsync::PlanConfig> {
    let mut cfg = match &timing.config {
        Some(path) => lipsync::PlanConfig::from_path(path)?,
        None => lipsync::PlanConfig::default(),
    };
    if let Some(fps) = timing.fps {
        cfg.timeline.fps = lipsync::Fps::new(fps, 1)?;
    }
    if let Some(w) = timing.blend_window {
        cfg.timeline.blend_window = w;
    }
    if let Some(p) = timing.tail_padding {
        cfg.timeline.tail_padding = p;
    }
    if timing.parallel {
        cfg.timeline.parallel = true;
    }
    if timing.threads.is_some() {
        cfg.timeline.threads = timing.threads;
    }
    cfg.timeline.validate()?;
    tracing::debug!(?cfg, "resolved config");
    Ok(cfg)
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.timing)?;
    let cues = lipsync::CueSet::from_rhubarb_path(&args.cues)?;
    let timeline = lipsync::build_timeline(&cues, &cfg.timeline)?;

    let json = serde_json::to_string_pretty(&timeline).context("serialize timeline")?;
    write_output(&args.out, &json)?;

    tracing::info!(frames = timeline.len(), "timeline written");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.timing)?;
    if let Some(policy) = args.policy {
        cfg.policy = policy.into();
    }

    let cues = lipsync::CueSet::from_rhubarb_path(&args.cues)?;
    let segments: Vec<lipsync::Segment> = read_json(&args.segments)?;
    let durations: BTreeMap<String, f64> = read_json(&args.durations)?;

    let plan = lipsync::build_render_plan(&cues, &segments, &durations, &cfg)?;
    plan.write_json(&args.out)?;

    tracing::info!(frames = plan.total_frames, "render plan written");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_local_time(args: LocalTimeArgs) -> anyhow::Result<()> {
    let fps = lipsync::Fps::new(args.fps, 1)?;
    let t = lipsync::local_time(
        lipsync::FrameIndex(args.frame),
        fps,
        args.start,
        args.clip_duration,
        args.looped,
    );
    println!("{t}");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}
