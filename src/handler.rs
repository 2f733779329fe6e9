use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::{ImageSegment, RepoInfo, RepoInfoResult};
use crate::render::{RenderedImage, Renderer};
use crate::trigger::{parse_repo_ref, RepoRef};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Glue between an incoming chat message and the outgoing preview card.
///
/// Cheap to clone; each incoming message can be handled on its own task.
#[derive(Clone)]
pub struct PreviewHandler {
    client: Arc<GitHubClient>,
    renderer: Arc<Renderer>,
}

impl PreviewHandler {
    pub fn new(client: GitHubClient, renderer: Renderer) -> Self {
        Self {
            client: Arc::new(client),
            renderer: Arc::new(renderer),
        }
    }

    /// Fetches and renders one repository.
    pub async fn preview(&self, repo: &RepoRef) -> Result<RenderedImage> {
        let info = self
            .client
            .get_repo_info(&repo.owner, &repo.repo)
            .await
            .into_result()?;
        self.render_card(info, Ok).await
    }

    /// Fetches the avatar, then composites and post-processes the card on the
    /// blocking pool so rasterizing and encoding stay off the async workers.
    async fn render_card<T, F>(&self, info: RepoInfo, finish: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(RenderedImage) -> Result<T> + Send + 'static,
    {
        let avatar = self.renderer.load_avatar(&self.client, &info).await;
        let renderer = Arc::clone(&self.renderer);

        tokio::task::spawn_blocking(move || finish(renderer.render(&info, avatar.as_ref()))).await?
    }

    /// Returns the reply for a chat message, if it should get one.
    ///
    /// Messages without a repository link are ignored. Lookup and render
    /// failures are logged and produce no reply.
    pub async fn handle_message(&self, message: &str) -> Option<ImageSegment> {
        let repo = parse_repo_ref(message)?;
        info!("GitHub link detected: {}", repo);

        let info = match self.client.get_repo_info(&repo.owner, &repo.repo).await {
            RepoInfoResult::Success(info) => info,
            RepoInfoResult::Failure(failure) => {
                error!(
                    kind = ?failure.kind,
                    status = %failure.status,
                    "GitHub API request for {} failed: {}",
                    repo,
                    failure.message.trim_end()
                );
                return None;
            }
        };

        match self.render_card(info, |image| image.to_segment()).await {
            Ok(segment) => Some(segment),
            Err(e) => {
                error!("Failed to render preview for {}: {}", repo, e);
                None
            }
        }
    }

    /// Handles every line of `input` as a chat message on its own task and
    /// passes replies to `on_reply`. Finished tasks are reaped as lines
    /// arrive. Returns the number of lines handled once the input ends and
    /// every task has finished.
    pub async fn listen<R, F>(&self, input: R, on_reply: F) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        F: Fn(ImageSegment) + Send + Sync + 'static,
    {
        let on_reply = Arc::new(on_reply);
        let mut lines = input.lines();
        let mut tasks = JoinSet::new();
        let mut handled = 0;

        while let Some(line) = lines.next_line().await? {
            let handler = self.clone();
            let on_reply = Arc::clone(&on_reply);
            tasks.spawn(async move {
                if let Some(segment) = handler.handle_message(&line).await {
                    on_reply(segment);
                }
            });
            handled += 1;

            while let Some(outcome) = tasks.try_join_next() {
                log_task_outcome(outcome);
            }
        }

        while let Some(outcome) = tasks.join_next().await {
            log_task_outcome(outcome);
        }

        Ok(handled)
    }
}

fn log_task_outcome(outcome: std::result::Result<(), JoinError>) {
    if let Err(e) = outcome {
        error!("Preview task failed: {}", e);
    }
}
