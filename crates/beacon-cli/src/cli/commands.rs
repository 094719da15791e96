use crate::cli::args::{Cli, Command, HistoryArgs, InitArgs, RunArgs, TrendsArgs};
use anyhow::Context;
use beacon_core::auth::{StaticToken, TokenFile, TokenSource};
use beacon_core::config::{load_suite, write_sample_suite, EndpointConfig};
use beacon_core::history::HistoryStore;
use beacon_core::report::console;
use beacon_core::runner::Runner;
use beacon_core::session::Session;
use beacon_core::trends::compute_trends;
use beacon_metrics::openai::OpenAiOracle;
use beacon_metrics::oracle::{FakeOracle, JudgeOracle};
use std::sync::Arc;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const EVAL_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => cmd_run(args).await,
        Command::Trends(args) => cmd_trends(args),
        Command::History(args) => cmd_history(args),
        Command::Init(args) => cmd_init(args),
        Command::Version => {
            println!("beacon {}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn resolve_token(args: &RunArgs) -> anyhow::Result<Option<String>> {
    match (&args.bearer_token, &args.token_file) {
        (Some(token), _) => Ok(Some(StaticToken(token.clone()).token()?)),
        (None, Some(path)) => Ok(Some(TokenFile { path: path.clone() }.token()?)),
        (None, None) => Ok(None),
    }
}

fn build_oracle(args: &RunArgs) -> anyhow::Result<Arc<dyn JudgeOracle>> {
    match args.judge.as_str() {
        "fake" => Ok(Arc::new(FakeOracle::passing())),
        "openai" => {
            let api_key = args
                .judge_api_key
                .clone()
                .context("judge 'openai' requires --judge-api-key (or OPENAI_API_KEY)")?;
            Ok(Arc::new(OpenAiOracle::new(
                args.judge_model.clone(),
                api_key,
            )))
        }
        other => anyhow::bail!("unknown judge provider '{}' (expected openai|fake)", other),
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<i32> {
    let suite = load_suite(&args.suite)?;
    let oracle = build_oracle(&args)?;
    let bearer_token = resolve_token(&args)?;

    let endpoint = EndpointConfig {
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        provider: args.provider.clone(),
        bearer_token,
        requires_auth: args.requires_auth,
        timeout_secs: args.timeout_secs,
    };

    let evaluators = beacon_metrics::default_evaluators(oracle, suite.quality_metrics);
    let runner = Runner::new(endpoint, evaluators);
    let mut session = Session::new();
    let summary = runner.run_suite(&suite, &mut session).await;

    console::print_summary(&summary);

    let store = HistoryStore::open(&args.history);
    let written = session.flush(&store)?;
    eprintln!(
        "recorded {} result(s) to {}",
        written.len(),
        store.path().display()
    );

    // trends over the full history, including this run
    let records = store.read_all()?;
    console::print_trends(&compute_trends(&records));

    Ok(if summary.any_failed() {
        exit_codes::EVAL_FAILED
    } else {
        exit_codes::OK
    })
}

fn cmd_trends(args: TrendsArgs) -> anyhow::Result<i32> {
    let store = HistoryStore::open(&args.history);
    let records = store.read_all()?;
    console::print_trends(&compute_trends(&records));
    Ok(exit_codes::OK)
}

fn cmd_history(args: HistoryArgs) -> anyhow::Result<i32> {
    let store = HistoryStore::open(&args.history);
    for record in store.read_all()? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(exit_codes::OK)
}

fn cmd_init(args: InitArgs) -> anyhow::Result<i32> {
    write_sample_suite(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(exit_codes::OK)
}
