use crate::cli::ServeArgs;
use crate::infra::shutdown_signal;
use home_finder::config::AppConfig;
use home_finder::error::AppError;
use home_finder::location::ValidationServer;
use home_finder::telemetry::{self, LogOutput};
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.validation);

    telemetry::init(&config.telemetry, LogOutput::Stdout)?;

    let addr = config.validation.socket_addr()?;
    let server = ValidationServer::bind(addr).await?;
    info!(?config.environment, addr = %server.local_addr()?, "location validation service ready");

    server.run(shutdown_signal()).await?;
    info!("location validation service stopped");
    Ok(())
}
