mod app;
mod client;
mod theme;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the graph snapshot endpoint.
    #[arg(long, default_value = "http://localhost:8000")]
    endpoint: String,

    /// JSON-RPC endpoint feeding the chain status strip.
    #[arg(long, default_value = "http://127.0.0.1:8545")]
    rpc_url: String,

    /// Snapshot poll cadence in milliseconds.
    #[arg(long, default_value_t = client::POLL_INTERVAL.as_millis() as u64)]
    poll_interval_ms: u64,

    /// Render a static layout instead of a continuous animation.
    #[arg(long)]
    reduce_motion: bool,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "swarmscope",
        options,
        Box::new(move |cc| {
            let config = app::AppConfig {
                endpoint: args.endpoint,
                rpc_url: args.rpc_url,
                poll_interval: Duration::from_millis(args.poll_interval_ms),
                reduce_motion: args.reduce_motion,
            };
            Ok(Box::new(app::SwarmScopeApp::new(cc, config)?))
        }),
    )
}
