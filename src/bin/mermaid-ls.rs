use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use mermaid_check::config::{Args, Config};
use mermaid_check::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the protocol
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let config = Config::from_args(args)?;

    // If running under the integration test, exit after a short delay so the test can read stdout to EOF.
    if std::env::var("MERMAID_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    serve(config).await
}
