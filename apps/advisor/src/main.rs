mod config;
mod errors;
mod extractor;
mod llm_client;
mod prompts;
mod session;

use std::process::ExitCode;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::session::Session;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_startup_failure() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the conversation on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-advisor v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.endpoint)?;
    info!(
        "LLM client initialized (endpoint: {}, model: {})",
        llm.config().api_url,
        llm.config().model
    );

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    let outcome = Session::new(&llm).run(&mut input, &mut output).await?;
    info!("Session ended normally ({} follow-ups)", outcome.follow_ups);
    Ok(())
}
