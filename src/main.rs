//! # SheetSage CLI
//!
//! Ingest spreadsheets into named datasets and ask questions about them.
//!
//! Usage:
//!   sheetsage ingest sales.xlsx --name sales     # Load a workbook into the store
//!   sheetsage list                               # Show stored datasets
//!   sheetsage ask sales "Which region sold most?"
//!   sheetsage chat sales                         # Interactive question loop

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetsage_agent::{AnswerGenerator, DatasetSession, render_outcome};
use sheetsage_core::{SageConfig, Value};
use sheetsage_ingest::{IngestOptions, load_table};
use sheetsage_store::RelationStore;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sheetsage",
    version,
    about = "📊 SheetSage — ask questions about your spreadsheets"
)]
struct Cli {
    /// Config file (default: ~/.sheetsage/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a spreadsheet or CSV file into a named dataset (replacing any existing one)
    Ingest {
        file: PathBuf,
        #[arg(short, long)]
        name: String,
        /// Worksheet to read (default: the first one)
        #[arg(long)]
        sheet: Option<String>,
    },
    /// List stored datasets
    List,
    /// Print the first rows of a dataset
    Show {
        name: String,
        #[arg(long, default_value = "10")]
        rows: usize,
    },
    /// Print the semantic schema derived from a dataset's columns
    Schema {
        name: String,
        /// Emit RDF Turtle instead of a table
        #[arg(long)]
        turtle: bool,
    },
    /// Ask a single question about a dataset
    Ask {
        name: String,
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Ask questions interactively until EOF or "exit"
    Chat { name: String },
}

fn load_config(path: Option<&str>) -> Result<SageConfig> {
    let config = match path {
        Some(p) => {
            let expanded = PathBuf::from(shellexpand::tilde(p).into_owned());
            SageConfig::load_from(&expanded)?
        }
        None => SageConfig::load()?,
    };
    Ok(config)
}

fn build_generator(config: &SageConfig) -> Result<AnswerGenerator> {
    let provider = sheetsage_providers::create_provider(config).with_context(|| {
        format!(
            "available providers: {} (custom takes the form custom:<url>)",
            sheetsage_providers::available_providers().join(", ")
        )
    })?;
    let generator = AnswerGenerator::new(provider, config.llm.model.clone());
    tracing::info!("🧠 Provider: {} / {}", generator.provider_name(), generator.model());
    Ok(generator)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sheetsage=debug,sheetsage_agent=debug,sheetsage_providers=debug,sheetsage_store=debug,sheetsage_knowledge=debug,sheetsage_ingest=debug"
    } else {
        "sheetsage=info,sheetsage_agent=info,sheetsage_store=info,sheetsage_ingest=info,sheetsage_providers=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let store = RelationStore::open(&config.store)
        .with_context(|| format!("opening data directory {}", config.store.data_dir))?;

    match cli.command {
        Command::Ingest { file, name, sheet } => {
            let relation = load_table(&file, &IngestOptions { sheet })?;
            store.ingest(&name, &relation)?;
            println!(
                "✅ Ingested '{}' from {}: {} rows × {} columns",
                name,
                file.display(),
                relation.row_count(),
                relation.column_count()
            );
        }
        Command::List => {
            let datasets = store.describe_datasets()?;
            if datasets.is_empty() {
                println!("No datasets yet. Try `sheetsage ingest <file> --name <name>`.");
            }
            for info in datasets {
                println!(
                    "{:<24} {:>8} rows {:>4} cols   updated {}",
                    info.name, info.row_count, info.column_count, info.updated_at
                );
            }
        }
        Command::Show { name, rows } => {
            let relation = store.load_dataset(&name)?;
            println!("{}", relation.column_names().collect::<Vec<_>>().join("\t"));
            let types: Vec<&str> = relation
                .columns()
                .iter()
                .map(|c| c.values.iter().find(|v| !v.is_null()).map_or("null", Value::type_name))
                .collect();
            println!("{}", types.join("\t"));
            for row in relation.rows().take(rows) {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                println!("{}", cells.join("\t"));
            }
            if relation.row_count() > rows {
                println!("… {} more rows", relation.row_count() - rows);
            }
        }
        Command::Schema { name, turtle } => {
            let session = DatasetSession::open(&store, &name, &config.schema)?;
            if turtle {
                print!("{}", session.schema().to_turtle());
            } else {
                for property in session.schema().properties() {
                    println!("{:<32} ← {}", property.id, property.column);
                }
                println!(
                    "\nDictionary: {}",
                    serde_json::to_string(session.dictionary())?
                );
            }
        }
        Command::Ask { name, question } => {
            let session = DatasetSession::open(&store, &name, &config.schema)?;
            let generator = build_generator(&config)?;
            match session.ask(&generator, &question.join(" ")).await? {
                Some(outcome) => println!("{}", render_outcome(&outcome)),
                None => println!("Nothing to ask."),
            }
        }
        Command::Chat { name } => {
            let session = DatasetSession::open(&store, &name, &config.schema)?;
            let generator = build_generator(&config)?;
            chat(&session, &generator).await?;
        }
    }

    Ok(())
}

async fn chat(session: &DatasetSession, generator: &AnswerGenerator) -> Result<()> {
    println!(
        "💬 Chatting with '{}' ({} rows). Type 'exit' to quit.",
        session.name(),
        session.relation().row_count()
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if matches!(question, "exit" | "quit") {
            break;
        }

        match session.ask(generator, question).await {
            Ok(Some(outcome)) => println!("{}", render_outcome(&outcome)),
            Ok(None) => {}
            Err(e) => println!("⚠️  {e}"),
        }
    }
    Ok(())
}
