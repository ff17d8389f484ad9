mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use loan_doc_reconcile::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
