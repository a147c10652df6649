use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vending::application::session::PurchaseSession;
use vending::config::SessionConfig;
use vending::domain::ports::CatalogSourceBox;
use vending::infrastructure::in_memory::StaticCatalog;
use vending::infrastructure::json_catalog::JsonFileCatalog;
use vending::interfaces::csv::action_reader::ActionReader;
use vending::interfaces::csv::snapshot_writer::SnapshotWriter;
use vending::interfaces::display::{self, Renderer, TextRenderer};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// One CSV row per state change
    Csv,
    /// The machine's screen text per state change
    Text,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV script of actions (header: action, value)
    input: PathBuf,

    /// Catalog JSON file. Uses the built-in catalog when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Simulated payment processing delay in milliseconds
    #[arg(long, default_value_t = 1200)]
    delay_ms: u64,

    /// How state changes are written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    output: OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let source: CatalogSourceBox = match cli.catalog {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(StaticCatalog::default()),
    };
    let config = SessionConfig::with_delay_millis(cli.delay_ms);
    let session = PurchaseSession::open(source.as_ref(), config)
        .await
        .into_diagnostic()?;

    // Render every state change as the script drives the session
    let renderer: Box<dyn Renderer> = match cli.output {
        OutputFormat::Csv => Box::new(SnapshotWriter::new(io::stdout())),
        OutputFormat::Text => Box::new(TextRenderer::new(io::stdout())),
    };
    let updates = tokio::spawn(display::follow(session.subscribe(), renderer));
    // Show the idle screen before the first action
    tokio::task::yield_now().await;

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => {
                if let Err(e) = action.apply(&session).await {
                    eprintln!("Error applying action: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
        // Let the renderer catch up before the next action
        tokio::task::yield_now().await;
    }

    // Closing the session ends the update stream
    drop(session);
    updates.await.into_diagnostic()?.into_diagnostic()?;

    Ok(())
}

/// Initializes structured logging on stderr, keeping stdout for output.
///
/// Honours `RUST_LOG`; defaults to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
