mod cli;
mod explore;
mod infra;
mod leads;
mod routes;
mod server;

use showroom::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
