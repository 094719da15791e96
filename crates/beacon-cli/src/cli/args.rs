use beacon_core::config::EndpointConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "beacon",
    version,
    about = "Quality-evaluation harness for streaming RAG assistants"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the suite against the answer endpoint and record results
    Run(RunArgs),
    /// Show per-question metric trends from the history log
    Trends(TrendsArgs),
    /// Dump the history log as JSON lines
    History(HistoryArgs),
    /// Write a sample suite config
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = "suite.yaml")]
    pub suite: PathBuf,

    #[arg(long, default_value = "test_history.jsonl")]
    pub history: PathBuf,

    /// Answer endpoint URL
    #[arg(long, env = "BEACON_BASE_URL")]
    pub base_url: String,

    #[arg(long, env = "BEACON_MODEL", default_value = "granite")]
    pub model: String,

    #[arg(long, env = "BEACON_PROVIDER", default_value = "watsonx")]
    pub provider: String,

    #[arg(long, env = "BEACON_BEARER_TOKEN")]
    pub bearer_token: Option<String>,

    /// File holding a bearer token persisted by an external capture tool
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Fail questions up front when no credential is configured
    #[arg(long)]
    pub requires_auth: bool,

    #[arg(long, default_value_t = EndpointConfig::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// judge oracle provider: openai|fake
    #[arg(long, default_value = "openai")]
    pub judge: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub judge_api_key: Option<String>,

    #[arg(long, default_value = "gpt-4o-mini")]
    pub judge_model: String,
}

#[derive(clap::Args, Clone)]
pub struct TrendsArgs {
    #[arg(long, default_value = "test_history.jsonl")]
    pub history: PathBuf,
}

#[derive(clap::Args, Clone)]
pub struct HistoryArgs {
    #[arg(long, default_value = "test_history.jsonl")]
    pub history: PathBuf,
}

#[derive(clap::Args, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "suite.yaml")]
    pub out: PathBuf,
}
