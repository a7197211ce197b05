use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "WEEKLINK_STORAGE_BACKEND";
pub const DATA_FILE_ENV: &str = "WEEKLINK_DATA_FILE";
pub const REDIS_URL_ENV: &str = "WEEKLINK_REDIS_URL";
pub const STORAGE_KEY_ENV: &str = "WEEKLINK_STORAGE_KEY";
pub const POLL_INTERVAL_ENV: &str = "WEEKLINK_POLL_INTERVAL_MS";
pub const GRANTED_ENV: &str = "WEEKLINK_GRANTED";
pub const CURRENT_URL_ENV: &str = "WEEKLINK_CURRENT_URL";

pub const DEFAULT_DATA_FILE: &str = "weeklink.json";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_GRANTED: &str = "storage,tabs,activeTab,contextMenus";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "file")]
    File,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "weeklink", about = "Save links for 7 days before they self-destruct.")]
pub struct CLI {
    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    #[arg(long, global = true, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    #[arg(long, global = true, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    /// Storage key holding the saved links.
    #[arg(long, global = true, env = STORAGE_KEY_ENV, default_value = weeklink_core::LINKS_KEY)]
    pub storage_key: String,

    /// How often `watch` re-renders and sweeps, in milliseconds.
    #[arg(long, global = true, env = POLL_INTERVAL_ENV, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Permissions this host grants, comma separated.
    #[arg(
        long,
        global = true,
        env = GRANTED_ENV,
        value_delimiter = ',',
        default_value = DEFAULT_GRANTED
    )]
    pub granted: Vec<String>,

    /// The URL of the "active tab", used by `save`.
    #[arg(long, global = true, env = CURRENT_URL_ENV)]
    pub current_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a URL for seven days.
    Add { url: String },
    /// Save the active tab's URL (see --current-url).
    Save,
    /// Show saved links with their countdowns.
    List,
    /// Delete a saved URL.
    Remove { url: String },
    /// Remove expired links now.
    Sweep,
    /// Simulate a click on the context-menu item.
    Click {
        #[arg(long)]
        link_url: Option<String>,
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Keep the popup open: re-render and sweep every poll interval until Ctrl-C.
    Watch,
}
