use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use dashboard::{
    atmosphere::openmeteo::OpenMeteo, context::Context, settings::Settings, Dashboard,
};

/// Weather, humidity and air quality for one location.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh once, write the chart, and exit.
    #[arg(long)]
    once: bool,

    /// Where to write the history chart; overrides the settings.
    #[arg(long)]
    chart: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("could not load settings: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(chart) = args.chart {
        settings.chart.path = chart;
    }

    let source = match OpenMeteo::from_settings(&settings) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("could not create HTTP client: {e}");
            return ExitCode::from(2);
        }
    };

    #[cfg(feature = "simulator")]
    let panel = dashboard::simulator::SimPanel::new();

    #[cfg(not(feature = "simulator"))]
    let panel = dashboard::face::Framebuffer::default();

    let mut dashboard = Dashboard::new(settings, source, panel);

    if args.once {
        let today = chrono::Local::now().date_naive();
        let mut ok = true;
        if let Err(e) = dashboard.render_trend(today) {
            tracing::error!("error rendering history: {e}");
            ok = false;
        }
        match dashboard.refresh() {
            Ok(report) if !report.is_failed() => {}
            Ok(_) => ok = false,
            Err(e) => {
                tracing::error!("{e}");
                ok = false;
            }
        }
        return if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    let ctx = Context::new();
    {
        let ctx = ctx.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            tracing::info!("got SIGINT, closing context");
            ctx.cancel();
        }) {
            tracing::error!("could not set SIGINT handler: {e}");
            return ExitCode::FAILURE;
        }
    }

    dashboard.run(&ctx);
    ctx.cancel();

    tracing::info!("shut down");
    ExitCode::SUCCESS
}
