use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guard_logging::guard_info;
use serde::Serialize;
use tabguard_app::config::{HostConfig, DEFAULT_CONFIG_PATH};
use tabguard_app::host::{logging, run_host, spawn_reader, Framing, HostOptions, HostSurface};
use tabguard_core::{merge, Verdict};
use tabguard_engine::{Classifier, ReqwestClassifier, VerdictFileStore};

#[derive(Parser, Debug)]
#[command(
    name = "tabguard",
    version,
    about = "Per-tab URL threat verdicts for a browser extension"
)]
struct Cli {
    /// RON configuration file.
    #[arg(long, short, env = "TABGUARD_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Classifier endpoint, overriding the configuration file.
    #[arg(long, env = "TABGUARD_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,

    /// Caller origin passed by the browser when it launches the host.
    #[arg(hide = true)]
    origin: Option<String>,

    /// Passed by the browser on Windows.
    #[arg(long, hide = true)]
    parent_window: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the extension over stdin/stdout (the default).
    Run {
        /// Newline-delimited JSON instead of length-prefixed frames.
        #[arg(long, default_value_t = false)]
        lines: bool,
    },
    /// Print the most recently persisted verdict.
    Show,
    /// Classify one URL and print the verdict.
    Classify { url: String },
}

#[derive(Debug, Serialize)]
struct VerdictReport<'a> {
    url: &'a str,
    is_threat: bool,
    probability_percent: f64,
    source: &'static str,
    display_text: &'a str,
}

impl<'a> From<&'a Verdict> for VerdictReport<'a> {
    fn from(verdict: &'a Verdict) -> Self {
        Self {
            url: &verdict.url,
            is_threat: verdict.is_threat,
            probability_percent: verdict.probability_percent,
            source: verdict.source.as_str(),
            display_text: &verdict.display_text,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = HostConfig::load(&cli.config)?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    logging::initialize(config.log_level(), config.log_file.as_deref());

    match cli.command.unwrap_or(Command::Run { lines: false }) {
        Command::Run { lines } => serve(config, lines).await,
        Command::Show => show(&config),
        Command::Classify { url } => classify_once(&config, &url).await,
    }
}

async fn serve(config: HostConfig, lines: bool) -> Result<()> {
    let framing = if lines { Framing::Lines } else { Framing::Native };
    let classifier = ReqwestClassifier::new(config.classifier_settings())
        .context("building classifier client")?;
    guard_info!("Classifier endpoint {}", classifier.endpoint());

    let inbound = spawn_reader(BufReader::new(io::stdin()), framing);
    let surface = HostSurface::new(io::stdout(), framing);
    run_host(
        inbound,
        surface,
        HostOptions {
            framing,
            settings: config.watcher_settings(),
            classifier: Arc::new(classifier),
            state_dir: config.state_dir.clone(),
        },
    )
    .await;
    Ok(())
}

fn show(config: &HostConfig) -> Result<()> {
    let store = VerdictFileStore::new(config.state_dir.clone());
    let persisted = store
        .load()
        .with_context(|| format!("reading {:?}", store.path()))?;
    match persisted.latest {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No threat data found."),
    }
    Ok(())
}

async fn classify_once(config: &HostConfig, url: &str) -> Result<()> {
    let settings = config.watcher_settings();
    let verdict = if settings.known_safe.matches(url) {
        Verdict::known_safe(url)
    } else {
        let classifier = ReqwestClassifier::new(config.classifier_settings())
            .context("building classifier client")?;
        let result = classifier
            .classify(url)
            .await
            .with_context(|| format!("classifying {url}"))?;
        merge(&result, &settings.text_policy)
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&VerdictReport::from(&verdict))?
    );
    Ok(())
}
