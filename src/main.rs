use anyhow::Result;
use lector::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
