//! Main application entry point.

use clap::{CommandFactory, FromArgMatches};
use sketchboard_app::{App, AppConfig, ShortcutRegistry};

fn main() {
    env_logger::init();
    log::info!("Starting Sketchboard");

    let matches = AppConfig::command()
        .after_help(ShortcutRegistry::help_text())
        .get_matches();
    let config = AppConfig::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match App::run(&config) {
        Ok(report) => println!("{} ({} bytes)", config.output.display(), report.png_bytes),
        Err(e) => {
            log::error!("replay failed: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
