use jiff::SignedDuration;
use std::sync::Arc;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;
use weeklink_core::links::{partition_expired, upsert, without_url};
use weeklink_core::link::validate_url;
use weeklink_core::record::check_records;
use weeklink_core::{
    Clock, KeyValueStore, LinkError, RecordCheck, SavedLink, StorageError, SystemClock,
    LINKS_KEY, LINK_LIFETIME,
};

/// Settings for a [`LinkStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkStoreSettings {
    /// The storage key holding the collection.
    #[builder(default = LINKS_KEY.to_string(), setter(into))]
    pub key: String,
    /// How long a link lives before the sweep removes it.
    #[builder(default = LINK_LIFETIME)]
    pub lifetime: SignedDuration,
}

impl Default for LinkStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The persisted collection of saved links.
///
/// Wraps a [`KeyValueStore`] and a [`Clock`] to provide:
/// - URL validation on add
/// - replace-on-add de-duplication (the re-added URL moves to the end)
/// - silent filtering of malformed stored records
/// - removal of single and expired links
///
/// Note: every mutation is an unguarded read-modify-write against a single
/// key. Two operations racing each other (say an add and a sweep) can lose
/// an update; the last writer wins.
pub struct LinkStore<S, C = SystemClock> {
    store: Arc<S>,
    clock: Arc<C>,
    settings: LinkStoreSettings,
}

impl<S, C> Clone for LinkStore<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            settings: self.settings.clone(),
        }
    }
}

impl<S: KeyValueStore> LinkStore<S, SystemClock> {
    /// Creates a link store on the system clock with default settings.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> LinkStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self::with_settings(store, clock, LinkStoreSettings::default())
    }

    pub fn with_settings(store: S, clock: C, settings: LinkStoreSettings) -> Self {
        Self {
            store: Arc::new(store),
            clock: Arc::new(clock),
            settings,
        }
    }

    pub fn settings(&self) -> &LinkStoreSettings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Returns the saved links in collection order.
    ///
    /// Malformed stored records are dropped with a warning; only backend
    /// failures are errors.
    pub async fn read(&self) -> Result<Vec<SavedLink>, StorageError> {
        let key = self.settings.key.as_str();
        let value = match self.store.get(key).await? {
            None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
            Some(value) => value,
        };

        let Some(checks) = check_records(value) else {
            warn!(key, "stored link collection is not a list, treating it as empty");
            return Ok(Vec::new());
        };

        let mut links = Vec::with_capacity(checks.len());
        for check in checks {
            match check {
                RecordCheck::Valid(link) => links.push(link),
                RecordCheck::Rejected { raw, reason } => {
                    warn!(key, record = %raw, %reason, "dropping malformed saved link");
                }
            }
        }
        Ok(links)
    }

    /// Saves `url` with the current time, replacing any earlier entry for it.
    ///
    /// Fails with [`LinkError::InvalidUrl`] before touching storage if `url`
    /// is not a valid absolute URL.
    pub async fn add(&self, url: &str) -> Result<SavedLink, LinkError> {
        validate_url(url)?;

        let links = self.read().await?;
        let link = SavedLink::new(url, self.clock.now_millis());
        let links = upsert(links, link.clone());
        self.write(&links).await?;

        info!(url, saved_at = link.saved_at, "saved link");
        Ok(link)
    }

    /// Removes the entry for `url`. Removing an absent URL is not an error.
    pub async fn remove_link(&self, url: &str) -> Result<(), StorageError> {
        let links = self.read().await?;
        let before = links.len();
        let links = without_url(links, url);
        self.write(&links).await?;

        debug!(url, removed = before - links.len(), "removed link");
        Ok(())
    }

    /// Drops every link whose lifetime has elapsed and returns how many were
    /// removed. The collection is rewritten even if nothing expired.
    pub async fn remove_expired_links(&self) -> Result<usize, StorageError> {
        let links = self.read().await?;
        let (kept, expired) =
            partition_expired(links, self.clock.now_millis(), self.settings.lifetime);
        self.write(&kept).await?;

        if !expired.is_empty() {
            info!(removed = expired.len(), "removed expired links");
        }
        Ok(expired.len())
    }

    async fn write(&self, links: &[SavedLink]) -> Result<(), StorageError> {
        let value = serde_json::to_value(links).map_err(|e| {
            StorageError::Serialization(format!("failed to serialize saved links: {e}"))
        })?;
        self.store.set(&self.settings.key, value).await
    }
}
