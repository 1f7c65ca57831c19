use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use tickgrid::audio;
use tickgrid::pipeline::{persistence, render};
use tickgrid::tui;
use tickgrid::{App, SessionConfig, Voice};

const FRAME: Duration = Duration::from_millis(16); // ~60fps
const INPUT_POLL: Duration = Duration::from_millis(2);
const RENDER_SAMPLE_RATE: u32 = 44_100;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

struct Args {
    session_dir: PathBuf,
    verbose: bool,
    write_config: bool,
    render: Option<PathBuf>,
    cycles: u32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        session_dir: std::env::current_dir().unwrap_or_default(),
        verbose: false,
        write_config: false,
        render: None,
        cycles: 4,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "--write-config" => args.write_config = true,
            "--render" => args.render = Some(it.next().context("--render needs an output path")?.into()),
            "--cycles" => {
                let n = it.next().context("--cycles needs a number")?;
                args.cycles = n.parse().with_context(|| format!("bad cycle count {n:?}"))?;
            }
            flag if flag.starts_with('-') => anyhow::bail!("unknown option {flag}"),
            dir => args.session_dir = PathBuf::from(dir),
        }
    }
    Ok(args)
}

fn init_logging(session_dir: &Path, verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    // the terminal belongs to the TUI, so logs go to a file
    let Some(log_file) = open_log_file(&persistence::log_file_path(session_dir)) else {
        eprintln!("tickgrid: could not create a log file, logging disabled");
        return;
    };

    if WriteLogger::init(log_level, Config::default(), log_file).is_ok() {
        log::info!("tickgrid starting (log level: {log_level:?})");
    }
}

// Falls back to the temp dir when the session dir is not writable.
fn open_log_file(log_path: &Path) -> Option<File> {
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("tickgrid: could not create {}: {e}", parent.display());
        }
    }
    File::create(log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("tickgrid.log")))
        .ok()
}

fn run() -> anyhow::Result<()> {
    let args = parse_args()?;
    init_logging(&args.session_dir, args.verbose);

    let config = match persistence::load_session(&args.session_dir)? {
        Some(config) => {
            log::info!("loaded {}", persistence::session_file_path(&args.session_dir).display());
            config
        }
        None => {
            log::info!("no session file, using the built-in preset");
            SessionConfig::preset()
        }
    };
    config.validate().context("invalid session")?;

    if args.write_config {
        let path = persistence::save_session(&args.session_dir, &config)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if let Some(out) = args.render {
        let stats = render::render_to_wav(&config, args.cycles, RENDER_SAMPLE_RATE, &out)?;
        println!("rendered {} steps ({:.1} s) to {}", stats.steps, stats.frames as f64 / RENDER_SAMPLE_RATE as f64, out.display());
        return Ok(());
    }

    run_live(&config)
}

fn run_live(config: &SessionConfig) -> anyhow::Result<()> {
    let audio = audio::start_audio(&config.voice_bank(), config.master_volume)?;
    let mut app = App::new(config, |id, _| -> Box<dyn Voice> { Box::new(audio.voice(id)) })?;

    terminal::enable_raw_mode()?;
    let _guard = TerminalGuard; // restores the terminal however we leave
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    app.start();
    let started = Instant::now();
    let mut last_frame: Option<Instant> = None;

    loop {
        app.tick(started.elapsed().as_millis() as u64);

        if last_frame.is_none_or(|t| t.elapsed() >= FRAME) {
            last_frame = Some(Instant::now());
            app.frame();
            term.draw(|frame| tui::view::render(frame, frame.area(), &app))?;
        }

        for event in tui::input::poll_input(INPUT_POLL)? {
            if !app.handle_input(event) {
                app.shutdown();
                log::info!("quit after {} steps", app.clock().tick_count());
                return Ok(());
            }
        }
    }
}

struct TerminalGuard;
impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
