use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use docview::viewer::ZoomLevel;
use docview::{panic_handler, render, settings};

#[derive(Parser, Debug)]
#[command(name = "docview", version, about = "Terminal document viewer")]
struct Args {
    /// Document to open: a file path or an http(s) URL
    source: String,

    /// Settings file (defaults to <config dir>/docview/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "docview.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Initial zoom in percent: 100, 150, 200 or 250
    #[arg(long, value_parser = parse_zoom)]
    zoom: Option<ZoomLevel>,
}

fn parse_zoom(value: &str) -> Result<ZoomLevel, String> {
    let percent: u16 = value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    ZoomLevel::try_from(percent)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(
        level,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("cannot create log file {}", args.log_file.display()))?,
    )?;

    info!("Starting docview");

    settings::load_settings(args.config.as_deref());
    if let Some(zoom) = args.zoom {
        settings::set_default_zoom(zoom);
    }
    render::init_render_config(settings::current().render_config());

    run(&args.source)
}

#[cfg(feature = "pdf")]
fn run(locator: &str) -> Result<()> {
    use std::io::stdout;
    use std::time::Duration;

    use ratatui::{Terminal, backend::CrosstermBackend};

    use docview::billing::{BrowserNavigator, HttpSessionClient, UpgradeAction};
    use docview::event_source::KeyboardEventSource;
    use docview::notification::NotificationManager;
    use docview::panic_handler::TerminalSession;
    use docview::render::{DocumentSource, RenderService};
    use docview::viewer::DocumentViewer;
    use docview::{App, run_app_with_event_source};

    let source = DocumentSource::parse(locator);
    let billing = settings::get_billing();

    let viewer = DocumentViewer::with_zoom(source, RenderService::new(), settings::get_default_zoom());
    let upgrade = UpgradeAction::new(
        HttpSessionClient::new(billing.session_endpoint),
        BrowserNavigator,
        billing.fallback_url,
    );
    let notifications = NotificationManager::with_default_duration(Duration::from_secs(
        settings::get_notification_secs(),
    ));
    let mut app = App::new(viewer, upgrade, notifications, Box::new(RenderService::new));

    panic_handler::initialize_panic_handler();

    let session = TerminalSession::enter().context("cannot set up the terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app_with_event_source(&mut terminal, &mut app, &mut KeyboardEventSource);

    drop(session);

    if let Err(e) = &result {
        log::error!("Application error: {e:?}");
    }
    result
}

#[cfg(not(feature = "pdf"))]
fn run(_locator: &str) -> Result<()> {
    anyhow::bail!("docview was built without the `pdf` feature; no document renderer is available")
}
