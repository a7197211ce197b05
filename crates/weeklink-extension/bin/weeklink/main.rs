mod cli;
mod host;

use crate::cli::{Command, StorageBackendArg, CLI};
use crate::host::TerminalHost;
use anyhow::{bail, Context};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weeklink_core::{has_required_capabilities, remaining_time, Clock, KeyValueStore};
use weeklink_extension::menu::{handle_menu_click, on_installed, MenuClick};
use weeklink_extension::popup::CAPABILITY_ADVISORY;
use weeklink_extension::{LinkStore, LinkStoreSettings, Popup, Sweeper};
use weeklink_storage::{InMemoryStore, JsonFileStore, RedisStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::try_parse()?;

    info!(
        storage_backend = %config.storage,
        storage_key = %config.storage_key,
        "starting weeklink"
    );

    match config.storage {
        StorageBackendArg::InMemory => run(config, InMemoryStore::new()).await,
        StorageBackendArg::File => {
            let store = JsonFileStore::new(config.data_file.clone());
            run(config, store).await
        }
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let store = RedisStore::connect(redis_url)
                .await
                .context("failed to connect to Redis")?;
            run(config, store).await
        }
    }
}

async fn run<S: KeyValueStore>(config: CLI, backend: S) -> anyhow::Result<()> {
    let host = Arc::new(TerminalHost::new(config.granted, config.current_url));
    on_installed(&*host).await;

    if !has_required_capabilities(&*host).await {
        bail!(CAPABILITY_ADVISORY);
    }

    let settings = LinkStoreSettings::builder().key(config.storage_key).build();
    let store = LinkStore::with_settings(backend, weeklink_core::SystemClock, settings);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);

    match config.command {
        Command::Add { url } => {
            let link = store.add(&url).await?;
            let time_left = remaining_time(link.saved_at, store.clock().now_millis());
            println!("Saved {} (time left: {time_left})", link.url);
        }
        Command::Save => {
            let mut popup = Popup::new(store, host);
            popup.open().await;
            popup.save_current().await;
            print!("{}", popup.view().render());
        }
        Command::List => {
            let mut popup = Popup::new(store, host);
            popup.open().await;
            print!("{}", popup.view().render());
        }
        Command::Remove { url } => {
            store.remove_link(&url).await?;
            println!("Removed {url}");
        }
        Command::Sweep => {
            let removed = store.remove_expired_links().await?;
            println!("Removed {removed} expired link(s)");
        }
        Command::Click { link_url, page_url } => {
            let click = MenuClick::save(link_url, page_url);
            match handle_menu_click(&store, &click).await {
                Some(link) => println!("Saved {}", link.url),
                None => println!("Nothing saved"),
            }
        }
        Command::Watch => watch(store, host, poll_interval).await?,
    }

    Ok(())
}

/// Keeps the popup on screen, re-rendering once per poll and sweeping in the
/// background, until Ctrl-C.
async fn watch<S, C>(
    store: LinkStore<S, C>,
    host: Arc<TerminalHost>,
    poll_interval: Duration,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    let sweeper = Sweeper::spawn(store.clone(), poll_interval);
    let mut popup = Popup::new(store, host);
    popup.open().await;

    let mut ticker = tokio::time::interval(poll_interval.max(Duration::from_millis(1)));
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
            _ = ticker.tick() => {
                popup.refresh().await;
                // clear the screen and home the cursor
                print!("\x1b[2J\x1b[H{}", popup.view().render());
            }
        }
    }

    sweeper.stop().await;
    info!("popup closed");
    Ok(())
}
