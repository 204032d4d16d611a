mod app;
mod progress;
mod upload;
mod utils;

use clap::Parser;

/// Desktop client for the game log / screenshot extraction service.
#[derive(Parser, Debug)]
#[command(name = "statdrop", version, about)]
struct Args {
    /// Base URL of the extraction server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    log::info!("Starting statdrop against {}", args.server);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([860.0, 640.0])
            .with_min_inner_size([560.0, 460.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Statdrop",
        options,
        Box::new(move |cc| Box::new(app::Statdrop::new(cc, args.server))),
    )
}
