#[path = "grader/app.rs"]
mod app;
#[path = "grader/args.rs"]
mod args;
#[path = "grader/config/mod.rs"]
mod config;
#[path = "grader/logging.rs"]
mod logging;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = args::CliArgs::parse();
    app::run(args).await
}
