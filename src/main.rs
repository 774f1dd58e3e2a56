use std::io;
use std::thread;

use home_finder::config::AppConfig;
use home_finder::error::AppError;
use home_finder::location::{connect_validator, LocationValidator, SharedValidator};
use home_finder::search::HttpPropertySearch;
use home_finder::session::{Console, Session, SessionSettings, FAREWELL};
use home_finder::telemetry::{self, LogOutput};
use tracing::{info, warn};

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogOutput::Stderr)?;

    let validator = SharedValidator::new(connect_validator(
        &config.validation,
        config.client.validation_timeout,
    ));
    install_interrupt_handler(validator.clone());

    let search = HttpPropertySearch::new(config.fetcher.base_url(), config.client.fetch_timeout)?;
    info!(
        environment = ?config.environment,
        validator = validator.mode(),
        fetcher = %config.fetcher.base_url(),
        "home finder client starting"
    );

    let console = Console::new(io::stdin().lock(), io::stdout());
    let settings = SessionSettings {
        data_dir: config.storage.data_dir.clone(),
        result_limit: config.client.result_limit,
    };

    Session::new(validator, search, console, settings).run()?;
    Ok(())
}

/// Ctrl-C releases the validation channel, prints the farewell line and exits.
fn install_interrupt_handler(mut validator: SharedValidator) {
    let spawned = thread::Builder::new()
        .name("interrupt-listener".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    warn!(error = %err, "interrupt listener unavailable");
                    return;
                }
            };

            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                validator.shutdown();
                println!("\n\n{FAREWELL}");
                std::process::exit(0);
            }
        });

    if let Err(err) = spawned {
        warn!(error = %err, "could not start interrupt listener");
    }
}
