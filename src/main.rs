//! stepplay binary entry point.
//!
//! Wires the terminal, the system audio output, and the ffmpeg tool pair
//! into a review session. Everything interactive happens inside
//! [`StepNavigator::run`]; this file only resolves paths and builds the
//! collaborators in an order that fails before the terminal is touched.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stepplay::config::Config;
use stepplay::media::{MediaTools, RodioAudio, VideoClip};
use stepplay::player::input::{KeyBindings, TerminalInput};
use stepplay::player::render::{PresentationSurface, TerminalSurface};
use stepplay::player::{StepNavigator, SyncEngine, WallClock};
use stepplay::store::StepStore;
use stepplay::version;

#[derive(Parser)]
#[command(
    name = "stepplay",
    about = "Step-by-step video review in the terminal",
    long_about = "Plays a video one marked segment at a time. The first run records \
                  steps: the video plays through once and Space marks the current \
                  position. Later runs loop each segment until you advance (Space), \
                  rewind (Left) or restart it (0).",
    version = version::long_version()
)]
struct Cli {
    /// Video file to review
    video: PathBuf,

    /// Discard stored steps for this video and record a fresh set
    #[arg(short = 'r', long)]
    record: bool,

    /// Keep the step database under this directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Frames own stdout, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let video = cli
        .video
        .canonicalize()
        .with_context(|| format!("cannot open video file {}", cli.video.display()))?;

    if !atty::is(atty::Stream::Stdout) {
        bail!("stepplay draws video frames to the terminal; run it interactively");
    }

    let mut config = Config::load()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }

    let store = StepStore::open(&config.db_path()?).context("failed to open the step store")?;
    if cli.record {
        store
            .clear_steps(&video)
            .context("failed to discard the stored step list")?;
    }
    let steps = store
        .steps_for(&video)
        .context("failed to read the stored step list")?;
    debug!(video = %video.display(), steps = steps.len(), "starting session");

    let tools = MediaTools::discover(
        config.ffmpeg_path.as_deref(),
        config.ffprobe_path.as_deref(),
    )?;
    let mut clip = VideoClip::open(&tools, &video)?;

    // The audio device opens before the terminal switches modes, so a
    // missing output fails with a readable error.
    let mut audio = RodioAudio::new()?;
    let mut input = TerminalInput::new(KeyBindings::playback());
    let mut clock = WallClock::new();

    let mut surface = TerminalSurface::new()?;
    let (max_w, max_h) = surface.frame_area();
    clip.fit_to(max_w, max_h);

    let mut engine = SyncEngine::new(&mut audio, &mut surface, &mut input, &mut clock);
    let mut navigator = StepNavigator::new(clip, video, steps);
    navigator.run(&mut engine, &store)
}
