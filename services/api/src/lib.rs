mod cli;
mod infra;
mod routes;
mod server;
mod validation;

use home_finder::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
