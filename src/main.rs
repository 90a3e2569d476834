use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use downtime_dash::audio::{Audio, Silent, TerminalBell};
use downtime_dash::clock::FrameClock;
use downtime_dash::config::Config;
use downtime_dash::display::{self, terminal::TerminalSurface};
use downtime_dash::leaderboard::{
    JsonFileLeaderboard, LeaderboardClient, MemoryLeaderboard, OfflineLeaderboard,
};
use downtime_dash::session::{Flow, Session};

#[derive(Parser, Debug)]
#[command(name = "downtime-dash", version, about = "A runner to play while the site is down")]
struct Cli {
    /// Config file (default: <config_dir>/downtime-dash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Disable sound cues
    #[arg(long)]
    mute: bool,

    /// Leaderboard file
    #[arg(long, conflicts_with_all = ["ephemeral", "offline"])]
    leaderboard: Option<PathBuf>,

    /// Keep the leaderboard in memory only
    #[arg(long, conflicts_with = "offline")]
    ephemeral: bool,

    /// Run as if the leaderboard backend were down
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.mute {
            config.sound = false;
        }
        if let Some(path) = &self.leaderboard {
            config.leaderboard_path = Some(path.clone());
        }
    }

    fn leaderboard(&self, config: &Config) -> LeaderboardClient {
        if self.offline {
            info!("leaderboard: offline");
            LeaderboardClient::spawn(OfflineLeaderboard, config.top_n)
        } else if self.ephemeral {
            info!("leaderboard: in memory");
            LeaderboardClient::spawn(MemoryLeaderboard::new(), config.top_n)
        } else {
            let path = config.leaderboard_path();
            info!(path = %path.display(), "leaderboard: json file");
            LeaderboardClient::spawn(JsonFileLeaderboard::new(path, config.top_n), config.top_n)
        }
    }
}

/// Restore terminal state; also called from the panic hook.
fn restore_terminal() {
    let mut out = stdout();
    let _ = out.execute(PopKeyboardEnhancementFlags);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn init_logging(level: &str) {
    let log_dir = Config::log_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(log_file) = File::create(log_dir.join("downtime-dash.log")) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    cli.apply(&mut config);
    init_logging(&config.log_level);
    info!(?config, "starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them; the input router
    // falls back to its hold window otherwise.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    info!(keyboard_enhanced, "terminal ready");

    // Blocking event reads live on their own thread so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &cli, &config);

    restore_terminal();
    if let Err(e) = &result {
        warn!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    config: &Config,
) -> Result<()> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let audio: Box<dyn Audio> = if config.sound {
        Box::new(TerminalBell::new(stdout()))
    } else {
        Box::new(Silent)
    };

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut surface = TerminalSurface::new(cols, rows);
    let mut session = Session::new(surface.field(), rng, audio, cli.leaderboard(config));
    let mut clock = FrameClock::new(config.fps);
    info!(cols, rows, frame = ?clock.frame_budget(), "session started");

    loop {
        let frame_start = Instant::now();

        // ── Drain pending terminal events (non-blocking) ──────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => {
                    if session.key_event(key) == Flow::Quit {
                        info!("quit requested");
                        return Ok(());
                    }
                }
                Event::Resize(cols, rows) => {
                    surface.resize(cols, rows);
                    session.resize(surface.field());
                }
                _ => {}
            }
        }

        session.frame(clock.delta());

        display::render(&mut surface, session.state());
        surface.present(out)?;

        clock.wait(frame_start);
    }
}
