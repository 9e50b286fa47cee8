mod cli;
mod infra;
mod routes;
mod server;

use touchpoint::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
