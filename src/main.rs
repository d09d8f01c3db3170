use clap::Parser;
use dailytalk::Mode;
use dailytalk::core::config;
use dailytalk::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dailytalk", about = "Diary and chat companion backed by a completion API")]
struct Args {
    /// Session kind (overrides config file and DAILYTALK_MODE)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Model identifier (overrides config file and DAILYTALK_MODEL)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to dailytalk.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("dailytalk.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }
    log::info!("Daily Talk starting up");

    // Configuration and credentials fail here, before the terminal is taken over.
    let client = config::load_config()
        .map(|file| config::resolve(&file, args.mode, args.model.as_deref()))
        .and_then(|resolved| tui::build_client(&resolved).map(|client| (resolved, client)));
    let (resolved, client) = match client {
        Ok(ready) => ready,
        Err(e) => {
            log::error!("Startup failed: {e}");
            eprintln!("dailytalk: {e}");
            return ExitCode::FAILURE;
        }
    };

    match tui::run(resolved, client) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {e}");
            eprintln!("dailytalk: {e}");
            ExitCode::FAILURE
        }
    }
}
