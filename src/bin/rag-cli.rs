use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use rag_console::api::types::display_value;
use rag_console::api::{ApiClient, ApiError, Collection};
use rag_console::config::load_or_default;
use rag_console::config::validation::validate_config;
use rag_console::config::ConfigError;
use rag_console::health::display::status_line;
use rag_console::lifecycle::signals;
use rag_console::{observability, HealthMonitor};

#[derive(Parser)]
#[command(name = "rag-cli")]
#[command(about = "Management CLI for the document API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the health endpoint once
    Health,
    /// Upload a file into a collection
    Upload {
        file: PathBuf,
        #[arg(long)]
        collection: Option<String>,
    },
    /// Ask a question
    Chat {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long)]
        collection: Option<String>,
    },
    /// List or delete collections
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// Show all collections
    List {
        /// Keep listing until Ctrl-C
        #[arg(long)]
        watch: bool,
        /// Seconds between listings with --watch
        #[arg(long, default_value_t = 5)]
        every_secs: u64,
    },
    /// Delete a collection
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.api.base_url = url;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    observability::logging::init_logging(&config.observability);
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "Configuration file loaded");
    }

    let client = ApiClient::new(&config.api)?;
    tracing::debug!(
        base_url = %client.base_url(),
        collection = client.default_collection(),
        "API client ready"
    );

    let result = match cli.command {
        Commands::Health => {
            let monitor = HealthMonitor::new(&config.health)?;
            let state = monitor.probe().await;
            println!("{}", status_line(&state));
            if !state.is_healthy() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(())
        }
        Commands::Upload { file, collection } => client
            .upload(&file, collection.as_deref())
            .await
            .map(|reply| {
                println!("File uploaded successfully!");
                print_json(&reply);
            }),
        Commands::Chat { query, collection } => client
            .chat(&query.join(" "), collection.as_deref())
            .await
            .map(|reply| println!("{}", reply)),
        Commands::Collections { action } => match action {
            CollectionAction::List { watch, every_secs } => {
                if watch {
                    watch_collections(&client, Duration::from_secs(every_secs.max(1))).await
                } else {
                    client
                        .list_collections()
                        .await
                        .map(|list| print_collections(&list))
                }
            }
            CollectionAction::Delete { name, yes } => {
                if !yes && !confirm(&format!("Delete the collection \"{}\"?", name))? {
                    println!("Cancelled.");
                    return Ok(ExitCode::SUCCESS);
                }
                client.delete_collection(&name).await.map(|()| {
                    println!("Collection \"{}\" deleted successfully!", name);
                })
            }
        },
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn watch_collections(client: &ApiClient, every: Duration) -> Result<(), ApiError> {
    let mut ticker = tokio::time::interval(every);
    let stop = signals::shutdown_signal();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed listing is shown and retried on the next tick.
                match client.list_collections().await {
                    Ok(list) => print_collections(&list),
                    Err(e) => eprintln!("Failed to fetch collections: {}", e),
                }
            }
            _ = &mut stop => return Ok(()),
        }
    }
}

fn print_collections(list: &[Collection]) {
    if list.is_empty() {
        println!("No collections found.");
        return;
    }
    for collection in list {
        let mut line = collection.name.clone();
        if let Some(count) = &collection.document_count {
            line.push_str(&format!("  documents: {}", display_value(count)));
        }
        if let Some(created) = &collection.created_at {
            line.push_str(&format!("  created: {}", display_value(created)));
        }
        println!("{}", line);
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}
