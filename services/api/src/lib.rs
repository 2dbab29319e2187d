mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use doc_analyzer::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
