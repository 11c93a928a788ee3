use anyhow::Result;
use clap::Parser;
use jobstats::cli::Cli;
use jobstats::output;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting jobstats - Jenkins build times per node");
    cli.execute().await?;

    Ok(())
}
