use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use focusdot::app::App;
use focusdot::config::{self, Config};
use focusdot::error::FocusdotError;
use focusdot::event::{EventHandler, Scheduler};
use focusdot::ui;

/// focusdot — an always-on-top circular Pomodoro indicator for the terminal
#[derive(Parser, Debug)]
#[command(name = "focusdot", version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path (logging disabled if not specified)
    #[arg(short, long)]
    log: Option<String>,

    /// Start with the widget position locked
    #[arg(long, default_value_t = false)]
    locked: bool,

    /// Print the default config as JSON and exit
    #[arg(long, default_value_t = false)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        println!("{}", serde_json::to_string_pretty(&Config::default())?);
        return Ok(());
    }

    // Initialize color-eyre with a panic hook that restores the terminal
    install_panic_hook();
    init_logging(&cli.log);

    info!("focusdot starting");

    let config_path = cli.config.clone().unwrap_or_else(config::default_path);
    let config = config::load(&config_path);

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| FocusdotError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    terminal.hide_cursor()?;

    // Event sources: async input + 1 s state tick
    let mut event_handler = EventHandler::new();
    let scheduler = Scheduler::new(event_handler.sender());

    let mut app = App::new(config, config_path, scheduler, cli.locked);
    let area = terminal.size()?;
    app.terminal_size = (area.width, area.height);

    // ── Main event loop ───────────────────────────────────────────────
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if let Some(event) = event_handler.next().await {
            app.handle_event(event);
            if app.should_quit {
                break;
            }
        } else {
            break;
        }
    }

    // Release every timer and subscription regardless of phase
    app.shutdown();
    event_handler.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("focusdot exiting");
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(panic_info);
    }));
    color_eyre::install().ok();
}

/// Initialize tracing to a log file
fn init_logging(log_path: &Option<String>) {
    use tracing_subscriber::EnvFilter;

    if let Some(ref path) = log_path {
        match std::fs::File::create(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("info")),
                    )
                    .with_writer(file)
                    .with_ansi(false)
                    .init();
            }
            Err(e) => eprintln!("failed to create log file {path}: {e}"),
        }
    } else {
        // No logging if no log path specified (can't log to stdout in a TUI)
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(io::sink)
            .init();
    }
}
