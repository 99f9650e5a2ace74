use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use vitality_monitor::app::write_view;
use vitality_monitor::data::duration::parse_duration;
use vitality_monitor::ui::{self, Theme};
use vitality_monitor::{
    events, App, DashboardController, FileSource, HealthDataSource, Renderer, Settings,
    StreamSource,
};

/// Event poll interval; short enough for a smooth needle.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Parser, Debug)]
#[command(name = "vitality")]
#[command(about = "Terminal dashboard showing a vitality gauge and trend chart")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Follow a JSON file of samples (`[{"label":"10:00","value":45}, ...]`)
    #[arg(short, long, conflicts_with = "connect")]
    file: Option<PathBuf>,

    /// Read newline-delimited JSON samples from a TCP endpoint (host:port)
    #[arg(long, conflicts_with = "file")]
    connect: Option<String>,

    /// Delay before the one-shot transition (e.g. "500ms", "2s")
    #[arg(long)]
    delay: Option<String>,

    /// Value shown at startup
    #[arg(long)]
    initial: Option<f64>,

    /// Value applied by the one-shot transition
    #[arg(long)]
    degraded: Option<f64>,

    /// Highest value classified as critical
    #[arg(long)]
    critical_max: Option<f64>,

    /// Highest value classified as weak
    #[arg(long)]
    weak_max: Option<f64>,

    /// Lower bound of the chart's vertical axis
    #[arg(long)]
    y_min: Option<f64>,

    /// Upper bound of the chart's vertical axis
    #[arg(long)]
    y_max: Option<f64>,

    /// Needle travel time (e.g. "1s", "250ms"); must be non-zero
    #[arg(long)]
    needle: Option<String>,

    /// Write the settled view as JSON and exit
    #[arg(short, long, conflicts_with_all = ["file", "connect"])]
    export: Option<PathBuf>,

    /// Append logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let settings = load_settings(&args)?;
    tracing::info!(?settings, "settings loaded");

    if let Some(ref export_path) = args.export {
        return export_settled(&settings, export_path);
    }

    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, settings);
    }

    if let Some(ref path) = args.file {
        let source = FileSource::new(path);
        tracing::info!(path = %source.path().display(), "following sample file");
        return run_tui(settings, Some(Box::new(source)));
    }

    run_tui(settings, None)
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// File and environment first, then CLI flags on top.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(ref delay) = args.delay {
        settings.transition.delay = parse_duration(delay)?;
    }
    if let Some(initial) = args.initial {
        settings.transition.initial = initial;
    }
    if let Some(degraded) = args.degraded {
        settings.transition.degraded = degraded;
    }
    if let Some(critical_max) = args.critical_max {
        settings.severity.critical_max = critical_max;
    }
    if let Some(weak_max) = args.weak_max {
        settings.severity.weak_max = weak_max;
    }
    if let Some(y_min) = args.y_min {
        settings.chart.y_min = y_min;
    }
    if let Some(y_max) = args.y_max {
        settings.chart.y_max = y_max;
    }
    if let Some(ref needle) = args.needle {
        settings.animation.needle = parse_duration(needle)?;
    }

    settings.validate()?;
    Ok(settings)
}

/// Render the view as it stands once the transition has fired.
fn export_settled(settings: &Settings, path: &Path) -> Result<()> {
    let start = Instant::now();
    let mut controller = DashboardController::mount(settings, start);
    controller.tick(start + settings.transition.delay);

    let samples = controller.series().to_vec();
    let view = Renderer::from_settings(settings).render(controller.state(), &samples);
    controller.teardown();

    write_view(&view, path)?;
    println!("Exported view to: {}", path.display());
    Ok(())
}

/// Run with a TCP stream of samples
fn run_with_tcp(addr: &str, settings: Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn HealthDataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // The reader task keeps running on `rt` while the TUI owns this thread.
    run_tui(settings, Some(source))
}

/// Run the TUI, optionally fed by a live source
fn run_tui(settings: Settings, source: Option<Box<dyn HealthDataSource>>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(settings, Theme::auto_detect(), Instant::now());
    if let Some(source) = source {
        app.attach_source(source);
    }

    let result = run_app(&mut terminal, &mut app);
    app.controller.teardown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        let now = Instant::now();
        if app.needs_redraw(now) {
            terminal.draw(|frame| ui::draw(frame, app, now))?;
            app.mark_drawn();
        }

        if let Some(event) = events::poll_event(FRAME_INTERVAL)? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events::handle_key_event(app, key, Instant::now());
                }
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
            // Input, focus and resize all change what is on screen.
            app.request_redraw();
        }

        // State changes land after the frame that showed the previous value.
        app.tick(Instant::now());
    }

    Ok(())
}
