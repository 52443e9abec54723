use clap::Parser;
use odre_lib::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  odre_lib::run(Cli::parse()).await
}
