use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use lexclause_ai::{Classifier, ClassifyOptions};
use lexclause_core::{ClassificationOutcome, Settings};
use lexclause_extract::PdfExtractor;
use lexclause_llm::OpenAiClient;
use lexclause_server::AppState;
use tracing_subscriber::EnvFilter;

mod display;
mod input;

#[derive(Parser)]
#[command(name = "lexclause", version, about = "Classify clauses in legal documents")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the clauses of a document
    Classify(ClassifyArgs),

    /// Serve the HTTP API
    Serve {
        /// Bind address [default: HOST or 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Port [default: PORT or 5000]
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
#[command(group = clap::ArgGroup::new("input").required(true).args(["text", "file"]))]
struct ClassifyArgs {
    /// Text to classify
    #[arg(long)]
    text: Option<String>,

    /// File containing text to classify (.txt or .pdf)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Model to use [default: DEFAULT_MODEL or gpt-4.1]
    #[arg(long)]
    model: Option<String>,

    /// Custom clause types to classify
    #[arg(long, num_args = 1..)]
    clause_types: Vec<String>,

    /// Output the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write output to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_classifier(settings: &Settings) -> anyhow::Result<Classifier> {
    let api_key = settings.require_api_key()?;
    let client = OpenAiClient::new(api_key, settings.openai_base_url.clone());
    Ok(Classifier::new(Arc::new(client), settings.classifier_config()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env().context("loading settings")?;
    init_tracing(cli.verbose || settings.debug);
    tracing::debug!("lexclause v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Classify(args) => classify(&settings, args).await,
        Command::Serve { host, port } => {
            let classifier = build_classifier(&settings)?;
            let state = AppState::new(classifier, PdfExtractor::detect());
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            lexclause_server::serve(state, &host, port)
                .await
                .with_context(|| format!("serving on {host}:{port}"))
        }
    }
}

async fn classify(settings: &Settings, args: ClassifyArgs) -> anyhow::Result<()> {
    let classifier = build_classifier(settings)?;

    let text = match (args.text, &args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => input::read_document(path, &PdfExtractor::detect())?,
        (None, None) => bail!("either --text or --file is required"),
    };

    if let Some(model) = &args.model
        && !classifier.is_supported_model(model)
    {
        bail!(
            "Invalid model. Choose from: {}",
            classifier.config().supported_models.join(", ")
        );
    }

    let options = ClassifyOptions {
        model: args.model,
        clause_types: Some(args.clause_types),
        temperature: None,
    };
    let outcome = match classifier.classify(&text, &options).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_input_error() => ClassificationOutcome::failure(e.to_string()),
        Err(e) => return Err(e).context("classification failed"),
    };

    let rendered = if args.json {
        display::render_json(&outcome)?
    } else {
        display::render_text(&outcome)
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote results to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
