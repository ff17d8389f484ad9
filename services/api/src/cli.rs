use crate::demo::{run_catalog, run_demo, run_verify, CatalogArgs, DemoArgs, VerifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_doc_reconcile::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Document Reconciler",
    about = "Reconcile AI-extracted loan documents against applicant profiles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Verify one document request (or a batch) read from a JSON file
    Verify(VerifyArgs),
    /// List the document categories and their field rules
    Catalog(CatalogArgs),
    /// Run a built-in sample application through the verifier
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Verify(args) => run_verify(args),
        Command::Catalog(args) => run_catalog(args),
        Command::Demo(args) => run_demo(args),
    }
}
