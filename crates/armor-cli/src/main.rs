//! Model Armor Callout CLI - screen LLM traffic bodies from the command line

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use armor_core::{BodyCallout, CalloutConfig, FilterDecisionEngine, PipelineAction};
use armor_sanitizer::{
    Direction, ModelArmorClient, SanitizerError, StaticSanitizer, ENV_ACCESS_TOKEN, ENV_ENDPOINT,
    ENV_LOCATION, ENV_PROMPT_TEMPLATE, ENV_RESPONSE_TEMPLATE,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const ENV_HELP: &str = "\
Environment:
  MA_LOCATION           Backend region
  MA_PROMPT_TEMPLATE    Prompt template resource name
  MA_RESPONSE_TEMPLATE  Response template resource name
  MA_ENDPOINT           Base URL override
  MA_ACCESS_TOKEN       Bearer token for the backend
  CALLOUT_FAIL_OPEN     Forward traffic when screening fails (1, true, yes, on)

Flags take precedence over the environment.";

#[derive(Parser)]
#[command(name = "armor-callout")]
#[command(about = "Model Armor Callout - screen LLM prompts and responses")]
#[command(version)]
#[command(after_help = ENV_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Screen a body against the live sanitization backend
    Screen {
        /// Which side of the exchange the body belongs to
        #[arg(short, long, value_enum)]
        direction: DirectionArg,
        /// Body file (reads stdin when omitted or "-")
        #[arg(short, long)]
        body: Option<PathBuf>,
        #[command(flatten)]
        backend: BackendArgs,
        /// Forward traffic unchanged when screening fails
        #[arg(long)]
        fail_open: bool,
    },
    /// Replay a saved sanitize response against a body, offline
    Interpret {
        /// Which side of the exchange the body belongs to
        #[arg(short, long, value_enum)]
        direction: DirectionArg,
        /// Saved sanitize response (JSON)
        #[arg(short, long)]
        verdict: PathBuf,
        /// Body file (reads stdin when omitted or "-")
        #[arg(short, long)]
        body: Option<PathBuf>,
    },
    /// Check backend configuration validity
    Check {
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DirectionArg {
    Prompt,
    Response,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Prompt => Direction::Prompt,
            DirectionArg::Response => Direction::Response,
        }
    }
}

/// Backend flags. Each one overrides the environment variable of the same
/// meaning.
#[derive(clap::Args, Default)]
struct BackendArgs {
    /// Backend region
    #[arg(long)]
    location: Option<String>,
    /// Prompt template resource name
    #[arg(long)]
    prompt_template: Option<String>,
    /// Response template resource name
    #[arg(long)]
    response_template: Option<String>,
    /// Base URL override
    #[arg(long)]
    endpoint: Option<String>,
    /// Bearer token for the backend
    #[arg(long)]
    access_token: Option<String>,
}

impl BackendArgs {
    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            ENV_LOCATION => &self.location,
            ENV_PROMPT_TEMPLATE => &self.prompt_template,
            ENV_RESPONSE_TEMPLATE => &self.response_template,
            ENV_ENDPOINT => &self.endpoint,
            ENV_ACCESS_TOKEN => &self.access_token,
            _ => return None,
        };
        value.clone()
    }

    /// Build the callout configuration from flags layered over `env`.
    fn resolve<F>(&self, fail_open: bool, env: F) -> Result<CalloutConfig, SanitizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CalloutConfig::from_lookup(|key| self.get(key).or_else(|| env(key)))?;
        if fail_open {
            config.global.fail_closed = false;
        }
        Ok(config)
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Screen {
            direction,
            body,
            backend,
            fail_open,
        } => {
            let config = backend.resolve(fail_open, process_env)?;
            let raw = read_body(body.as_deref())?;
            let action = screen(config, direction.into(), &raw).await?;
            println!("{}", serde_json::to_string_pretty(&action)?);
        }
        Commands::Interpret {
            direction,
            verdict,
            body,
        } => {
            let raw = read_body(body.as_deref())?;
            let action = interpret(direction.into(), &verdict, &raw).await?;
            println!("{}", serde_json::to_string_pretty(&action)?);
        }
        Commands::Check { backend } => {
            let config = backend.resolve(false, process_env)?;
            let mode = config.failure_mode();
            let client = ModelArmorClient::new(config.sanitizer)?;
            info!("Configuration valid");
            println!("prompt:   {}", client.request_url(Direction::Prompt));
            println!("response: {}", client.request_url(Direction::Response));
            println!("failure:  {:?}", mode);
        }
    }

    Ok(())
}

/// Screen `raw` against the configured backend, applying the failure policy.
async fn screen(config: CalloutConfig, direction: Direction, raw: &[u8]) -> anyhow::Result<PipelineAction> {
    let mode = config.failure_mode();
    let client = ModelArmorClient::new(config.sanitizer)?;
    let callout = BodyCallout::with_failure_mode(FilterDecisionEngine::new(Arc::new(client)), mode);
    Ok(callout.handle(direction, raw).await)
}

/// Decide `raw` against a sanitize response saved to `verdict_path`.
async fn interpret(direction: Direction, verdict_path: &Path, raw: &[u8]) -> anyhow::Result<PipelineAction> {
    let saved = std::fs::read(verdict_path)
        .with_context(|| format!("failed to read verdict file {}", verdict_path.display()))?;
    let verdict = armor_sanitizer::parse_sanitize_response(&saved)?;

    let engine = FilterDecisionEngine::new(Arc::new(StaticSanitizer::new(verdict)));
    Ok(engine.screen(direction, raw).await?)
}

/// Read a body from a file, or from stdin when no path (or `-`) is given.
fn read_body(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("failed to read body file {}", path.display())),
        _ => {
            let mut raw = Vec::new();
            std::io::stdin()
                .read_to_end(&mut raw)
                .context("failed to read body from stdin")?;
            Ok(raw)
        }
    }
}
