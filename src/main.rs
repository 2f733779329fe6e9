mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use github_preview::github::{ClientConfig, GitHubClient};
use github_preview::handler::PreviewHandler;
use github_preview::render::{AssetPaths, Assets, RenderConfig, Renderer};
use github_preview::trigger::RepoRef;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout only carries payloads
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        assets_dir,
        regular_font,
        bold_font,
        api_base,
        token,
        timeout_secs,
        wrap,
        command,
    } = Cli::parse();

    let mut client_config = ClientConfig::default().with_api_base(api_base);
    if let Some(token) = token {
        client_config = client_config.with_token(token);
    }
    if let Some(secs) = timeout_secs {
        client_config = client_config.with_timeout(Duration::from_secs(secs));
    }
    let client = GitHubClient::new(client_config)?;

    let asset_paths = AssetPaths {
        regular_font,
        bold_font,
        ..AssetPaths::new(assets_dir)
    };
    let render_config = RenderConfig {
        wrap: wrap.into(),
        ..Default::default()
    };

    match command {
        Command::Info { owner, repo } => {
            let result = client.get_repo_info(&owner, &repo).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                eprintln!("{}", format!("Lookup of {}/{} failed", owner, repo).red());
            }
        }
        Command::Preview { target, output } => {
            let repo: RepoRef = target.parse()?;
            let handler = build_handler(&asset_paths, client, render_config)?;

            let image = handler.preview(&repo).await?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(format!("{}_{}.png", repo.owner, repo.repo)));
            std::fs::write(&path, image.to_png()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            eprintln!("{} {}", "✅ Preview written to".green(), path.display());
        }
        Command::Listen => {
            let handler = build_handler(&asset_paths, client, render_config)?;

            // Each stdin line stands in for an independent chat message
            info!("Listening for chat messages on stdin");
            let stdin = BufReader::new(tokio::io::stdin());
            let handled = handler
                .listen(stdin, |segment| println!("{}", segment.file))
                .await?;
            info!(handled, "Input closed");
        }
    }

    Ok(())
}

fn build_handler(
    paths: &AssetPaths,
    client: GitHubClient,
    render_config: RenderConfig,
) -> Result<PreviewHandler> {
    let assets = Assets::load_from(paths)
        .with_context(|| format!("Failed to load assets from {}", paths.root.display()))?;
    Ok(PreviewHandler::new(client, Renderer::new(assets, render_config)))
}
