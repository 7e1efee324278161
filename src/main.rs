use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use docmod::cli::StatementRequest;
use docmod::driver::{ExecuteStatement, TcpTransport};
use docmod::local::LocalStore;
use docmod_core::ModifyStatement;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docmod")]
#[command(about = "Build, compile and apply document modify statements", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a request file and print the compiled statement
    Compile {
        /// Statement request (JSON)
        request: PathBuf,
    },

    /// Apply a request to collections loaded from a JSON data file
    Apply {
        /// Statement request (JSON)
        request: PathBuf,

        /// Data file: {"collection": [documents], ...}
        #[arg(short, long)]
        data: PathBuf,

        /// Write the modified collections back to the data file
        #[arg(long)]
        write: bool,
    },

    /// Submit a request to a server over the native driver protocol
    Submit {
        /// Statement request (JSON)
        request: PathBuf,

        /// Server address
        #[arg(long, env = "DOCMOD_ADDR", default_value = "localhost:6745")]
        addr: String,

        /// Database name
        #[arg(short, long, env = "DOCMOD_DATABASE")]
        database: String,

        /// Username for authentication
        #[arg(short = 'u', long, env = "DOCMOD_USERNAME")]
        username: Option<String>,

        /// Password for authentication
        #[arg(short = 'p', long, env = "DOCMOD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmod=info,docmod_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Commands::Compile { request } => {
            let statement = load_statement(&request)?;
            let compiled = statement.compile()?;
            for note in compiled.notes() {
                tracing::info!("{}", note);
            }
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }

        Commands::Apply {
            request,
            data,
            write,
        } => {
            let statement = load_statement(&request)?;
            let collection = statement
                .target_collection()
                .map(str::to_string)
                .context("Request has no target collection")?;

            let text = std::fs::read_to_string(&data)
                .with_context(|| format!("Failed to read {}", data.display()))?;
            let mut store = LocalStore::from_value(serde_json::from_str(&text)?)?;

            let result = statement.execute(&mut store).await?;
            for warning in &result.warnings {
                tracing::warn!("{}", warning);
            }
            tracing::info!("Modified {} documents", result.affected_items_count);

            println!("{}", serde_json::to_string_pretty(&result)?);
            if let Some(docs) = store.documents(&collection) {
                println!("{}", serde_json::to_string_pretty(docs)?);
            }

            if write {
                std::fs::write(&data, serde_json::to_string_pretty(&store.to_value())?)
                    .with_context(|| format!("Failed to write {}", data.display()))?;
                tracing::info!("Saved {}", data.display());
            }
        }

        Commands::Submit {
            request,
            addr,
            database,
            username,
            password,
        } => {
            let statement = load_statement(&request)?;
            let mut transport = TcpTransport::connect(&addr, &database).await?;
            if let Some(username) = username {
                transport
                    .auth(&username, password.as_deref().unwrap_or(""))
                    .await?;
            }

            let result = statement.execute(&mut transport).await?;
            tracing::info!("Modified {} documents", result.affected_items_count);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn load_statement(path: &Path) -> anyhow::Result<ModifyStatement> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let request = StatementRequest::from_json(&text)
        .with_context(|| format!("Invalid request file {}", path.display()))?;
    Ok(request.into_statement()?)
}
