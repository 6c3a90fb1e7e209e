mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use tf_commentor::{GitHubClient, ProcessRunner, ReviewClient, TemplateSet, pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.step_config()?;
    tracing::debug!(command = %config.command, directory = %config.directory, "parsed arguments");

    let templates = TemplateSet::embedded();
    let runner = ProcessRunner::new(config.timeout);
    let client = match cli.token {
        Some(token) => Some(GitHubClient::with_base_url(token, cli.api_url)?),
        None => None,
    };
    let review = client.as_ref().map(|c| c as &dyn ReviewClient);

    let code = pipeline::execute(&config, &templates, &runner, review).await?;
    std::process::exit(code);
}
