use clap::Parser;
use octopibox_client::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), octopibox_client::AppError> {
    run(Cli::parse()).await
}
