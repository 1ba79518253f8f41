use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use treemap_filter::app::App;
use treemap_filter::batch::{self, ERROR_EXIT_CODE};
use treemap_filter::config::{
    AppConfig, GeneralConfig, OutputConfig, ScanConfig, ThemeConfig, WatcherConfig,
};
use treemap_filter::error;
use treemap_filter::event::{Event, EventHandler};
use treemap_filter::source::Source;
use treemap_filter::tui::{install_panic_hook, Tui};
use treemap_filter::watcher::InputWatcher;
use treemap_filter::{handler, logging, theme, ui};

/// Filter a treemap (JSON document or directory) by name or path.
#[derive(Parser, Debug)]
#[command(name = "tmf", version, about)]
struct Cli {
    /// Treemap JSON file or directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    input: PathBuf,

    /// Search query: substring, `a/b` path segments, or `exact` in backticks
    #[arg(short, long, default_value = "")]
    query: String,

    /// Open the interactive browser instead of printing
    #[arg(short, long)]
    interactive: bool,

    /// Print the filtered tree as JSON
    #[arg(long)]
    json: bool,

    /// Omit sizes from tree output
    #[arg(long)]
    no_sizes: bool,

    /// Path to a config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Deepest directory level to scan
    #[arg(long)]
    max_depth: Option<usize>,

    /// Include hidden entries when scanning
    #[arg(long)]
    hidden: bool,

    /// Sort order for scanned entries: size or name
    #[arg(long, value_name = "ORDER")]
    sort: Option<String>,

    /// Disable reloading when the input changes
    #[arg(long)]
    no_watcher: bool,

    /// Color scheme: dark, light, custom
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// Flags the user actually passed, as a config layer.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.hidden.then_some(true),
                ..Default::default()
            },
            scan: ScanConfig {
                max_depth: self.max_depth,
                sort_by: self.sort.clone(),
                ..Default::default()
            },
            output: OutputConfig {
                format: self.json.then(|| "json".to_string()),
                show_sizes: self.no_sizes.then_some(false),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tmf: {e}");
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

fn run(cli: Cli) -> error::Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    logging::init(config.log_level(), config.log_file(), cli.interactive)?;

    let source = Source::detect(&cli.input)?;
    tracing::debug!(?source, query = %cli.query, "starting");

    if cli.interactive {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run_interactive(source, &cli.query, &config))?;
        return Ok(ExitCode::SUCCESS);
    }

    let status = batch::run(
        &source,
        &cli.query,
        &config,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(ExitCode::from(status.exit_code()))
}

async fn run_interactive(source: Source, query: &str, config: &AppConfig) -> error::Result<()> {
    let theme = theme::resolve_theme(config);
    let mut app = App::new(source, config.scan_options(), query)?;

    install_panic_hook();
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));

    let watcher = if config.watcher_enabled() {
        match InputWatcher::new(
            &app.source,
            Duration::from_millis(config.debounce_ms()),
            config.ignore_patterns(),
            events.sender(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "input watcher unavailable");
                app.watcher_active = false;
                app.set_error_message(format!("Watcher unavailable: {e}"));
                None
            }
        }
    } else {
        app.watcher_active = false;
        None
    };

    let result = event_loop(&mut app, &mut tui, &mut events, watcher.as_ref(), &theme).await;
    tui.restore()?;
    result
}

async fn event_loop(
    app: &mut App,
    tui: &mut Tui,
    events: &mut EventHandler,
    watcher: Option<&InputWatcher>,
    theme: &theme::ThemeColors,
) -> error::Result<()> {
    loop {
        tui.draw(|frame| ui::render(app, theme, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::InputChanged(paths) => app.handle_input_change(paths),
        }

        if let Some(watcher) = watcher {
            if app.watcher_active && !watcher.is_active() {
                watcher.resume();
            } else if !app.watcher_active && watcher.is_active() {
                watcher.pause();
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

