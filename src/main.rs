use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;
use url::Url;

use treenav::app::{App, AppEvent, DocumentSource};
use treenav::config::Config;
use treenav::document::{fetch_document, load_document_file, ParsedDocument};
use treenav::nav::Controller;
use treenav::ui;

#[derive(Parser, Debug)]
#[command(
    name = "treenav",
    about = "Browse a tabbed navigation tree from a JSON document"
)]
struct Args {
    /// Fetch the navigation document from this URL
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// Read the navigation document from a local JSON file
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file (default: ~/.config/treenav/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the realized tree as indented text and exit
    #[arg(long)]
    dump: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn document_source(args: &Args, config: &Config) -> Result<DocumentSource> {
    if let Some(path) = &args.file {
        return Ok(DocumentSource::File(path.clone()));
    }
    let raw = args.url.as_deref().unwrap_or(&config.document_url);
    let url = Url::parse(raw).with_context(|| format!("Invalid document URL '{raw}'"))?;
    Ok(DocumentSource::Url(url))
}

/// `--dump`: load the document once and print its outline.
async fn dump(source: &DocumentSource, config: &Config) -> Result<()> {
    let doc: ParsedDocument = match source {
        DocumentSource::Url(url) => {
            let client = reqwest::Client::new();
            fetch_document(&client, url.as_str())
                .await
                .with_context(|| format!("Failed to fetch {url}"))?
        }
        DocumentSource::File(path) => load_document_file(path)?,
    };

    let mut controller = Controller::new(config.start_expanded);
    controller.initialize(&doc.nodes);
    if let Some(tree) = controller.tree() {
        print!("{}", tree.outline());
        for rejected in doc.rejected.iter().chain(tree.rejected()) {
            eprintln!("skipped: {rejected}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    let source = document_source(&args, &config)?;

    if args.dump {
        return dump(&source, &config).await;
    }

    let mut app = App::new(&config, source).context("Failed to create application")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::spawn_document_load(&mut app, &event_tx);
    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}
