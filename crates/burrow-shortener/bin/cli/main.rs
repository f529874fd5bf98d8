mod cli;

use crate::cli::{Command, LogFormat, StoreCommand, CLI};
use burrow_core::{BatchItem, Repository, Shortener};
use burrow_generator::RandomGenerator;
use burrow_shortener::{Settings, ShortenerService, StorageBackend};
use burrow_storage::{FileRepository, InMemoryRepository, PgRepository};
use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::io::Read;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn Error>;

#[derive(Debug, Serialize)]
struct BatchResponseRow {
    correlation_id: String,
    short_url: String,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    let settings = config.settings();
    settings.validate()?;
    let backend = settings.storage_backend();

    info!(
        listen_addr = %settings.listen_addr,
        base_url = %settings.base_url,
        storage_backend = %backend,
        "starting burrow"
    );

    match config.command {
        Command::Ping => ping(backend).await,
        Command::Store(command) => match backend {
            StorageBackend::InMemory => run(InMemoryRepository::new(), &settings, command).await,
            StorageBackend::File { path, restore } => {
                run(FileRepository::open(path, restore)?, &settings, command).await
            }
            StorageBackend::Postgres { dsn } => {
                run(PgRepository::connect(&dsn).await?, &settings, command).await
            }
        },
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn ping(backend: StorageBackend) -> Result<(), BoxError> {
    let StorageBackend::Postgres { dsn } = backend else {
        return Err("ping needs a database dsn".into());
    };

    PgRepository::connect(&dsn).await?.ping().await?;
    println!("ok");
    Ok(())
}

/// Runs one command, then finalizes the store exactly once.
async fn run<R: Repository>(
    repository: R,
    settings: &Settings,
    command: StoreCommand,
) -> Result<(), BoxError> {
    let service = ShortenerService::new(repository, RandomGenerator::seeded_from_clock());

    let outcome = execute(&service, settings, command).await;

    // Shutdown always completes; a failed final write is only logged.
    if let Err(err) = service.finalize().await {
        error!(error = %err, "unable to finalize storage");
    }

    outcome
}

async fn execute<S: Shortener>(
    service: &S,
    settings: &Settings,
    command: StoreCommand,
) -> Result<(), BoxError> {
    match command {
        StoreCommand::Shorten { url } => {
            let shortened = service.create_or_reuse(&url).await?;
            info!(
                code = %shortened.code(),
                created = shortened.is_created(),
                status = shortened.status_code(),
                "shortened url"
            );
            let state = if shortened.is_created() { "created" } else { "reused" };
            println!("{} {state}", shortened.code().to_url(&settings.base_url));
        }
        StoreCommand::Resolve { code } => {
            println!("{}", service.resolve_key(&code).await?);
        }
        StoreCommand::Lookup { url } => match service.lookup_by_original_url(&url).await? {
            Some(code) => println!("{}", code.to_url(&settings.base_url)),
            None => return Err(format!("no short code for {url}").into()),
        },
        StoreCommand::Batch { input } => {
            let raw = if input.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                tokio::fs::read_to_string(&input).await?
            };

            let items: Vec<BatchItem> = serde_json::from_str(&raw)?;
            let rows: Vec<BatchResponseRow> = service
                .create_batch(items)
                .await?
                .into_iter()
                .map(|entry| BatchResponseRow {
                    correlation_id: entry.correlation_id,
                    short_url: entry.short_code.to_url(&settings.base_url),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
