use clap::{Parser, Subcommand, ValueEnum};
use github_preview::render::assets::{DEFAULT_BOLD_FONT, DEFAULT_REGULAR_FONT};
use github_preview::render::WrapPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "github-preview")]
#[command(about = "GitHub Repository Preview - Renders preview cards for github.com links in chat messages")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Directory holding template.png and fonts/
    #[arg(long, env = "PREVIEW_ASSETS_DIR", default_value = "assets", global = true)]
    pub assets_dir: PathBuf,

    /// Regular-weight font file under <assets-dir>/fonts
    #[arg(long, env = "PREVIEW_REGULAR_FONT", default_value = DEFAULT_REGULAR_FONT, global = true)]
    pub regular_font: String,

    /// Bold font file under <assets-dir>/fonts
    #[arg(long, env = "PREVIEW_BOLD_FONT", default_value = DEFAULT_BOLD_FONT, global = true)]
    pub bold_font: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_BASE", default_value = "https://api.github.com", global = true)]
    pub api_base: String,

    /// Optional GitHub token sent as `Authorization: token <t>`
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// How long descriptions are broken into lines
    #[arg(long, value_enum, default_value_t = WrapArg::EvenSlices, global = true)]
    pub wrap: WrapArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a preview card for a message, link or owner/repo and save it as PNG
    Preview {
        target: String,

        /// Output file (defaults to <owner>_<repo>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the repository lookup result as JSON
    Info { owner: String, repo: String },
    /// Treat each stdin line as a chat message and print base64:// replies
    Listen,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WrapArg {
    EvenSlices,
    DisplayColumns,
}

impl From<WrapArg> for WrapPolicy {
    fn from(arg: WrapArg) -> Self {
        match arg {
            WrapArg::EvenSlices => WrapPolicy::EvenSlices,
            WrapArg::DisplayColumns => WrapPolicy::DisplayColumns,
        }
    }
}
