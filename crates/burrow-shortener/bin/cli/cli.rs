use burrow_shortener::config::{
    Settings, DEFAULT_BASE_URL, DEFAULT_FILE_STORAGE_PATH, DEFAULT_LISTEN_ADDR,
};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "SERVER_ADDRESS";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const FILE_STORAGE_PATH_ENV: &str = "FILE_STORAGE_PATH";
pub const DATABASE_DSN_ENV: &str = "DATABASE_DSN";
pub const RESTORE_ENV: &str = "RESTORE";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Shorten URLs and resolve short codes")]
pub struct CLI {
    #[arg(short = 'a', long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    #[arg(short = 'b', long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        short = 'f',
        long,
        env = FILE_STORAGE_PATH_ENV,
        default_value = DEFAULT_FILE_STORAGE_PATH
    )]
    pub file_storage_path: String,

    #[arg(short = 'd', long, env = DATABASE_DSN_ENV)]
    pub database_dsn: Option<String>,

    #[arg(long, env = RESTORE_ENV, default_value_t = true, action = ArgAction::Set)]
    pub restore: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the configured database answers.
    Ping,
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that run against the configured store.
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Shorten a URL, reusing its code if it has one.
    Shorten { url: String },
    /// Print the original URL behind a short code.
    Resolve { code: String },
    /// Print the short URL an original URL is stored under.
    Lookup { url: String },
    /// Shorten a JSON array of {"correlation_id", "original_url"} rows.
    /// Reads stdin when the path is `-`.
    Batch { input: PathBuf },
}

impl CLI {
    pub fn settings(&self) -> Settings {
        Settings {
            listen_addr: self.listen_addr.clone(),
            base_url: self.base_url.clone(),
            file_storage_path: self.file_storage_path.clone(),
            database_dsn: self.database_dsn.clone(),
            restore: self.restore,
        }
    }
}
