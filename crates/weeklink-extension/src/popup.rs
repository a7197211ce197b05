//! The popup: a view model over the link store.
//!
//! [`Popup`] holds what the user sees between interactions and turns store
//! failures into a banner message. [`PopupView`] is a snapshot of that state
//! at a given instant, with countdowns computed for that instant.

use crate::link_store::LinkStore;
use jiff::tz::TimeZone;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};
use weeklink_core::expiry::format_saved_at;
use weeklink_core::{
    has_required_capabilities, CapabilityHost, Clock, Countdown, KeyValueStore, SavedLink,
    TabQuery,
};

pub const TITLE: &str = "Save links for 7 days before they self-destruct.";
pub const NO_LINKS: &str = "No links saved yet.";
pub const SAVE_BUTTON_LABEL: &str = "Save current URL";
pub const CAPABILITY_ADVISORY: &str =
    "Required permissions are missing. Please reload the extension or re-grant permissions.";

/// One saved link as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub url: String,
    /// When the link was saved, formatted in the viewer's time zone.
    pub saved: String,
    /// `"D:HH:MM:SS"` or `"Expired"`.
    pub time_left: String,
}

/// What the popup shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub title: &'static str,
    /// Set when the host is missing permissions. Nothing else is usable then.
    pub advisory: Option<&'static str>,
    /// `"Error: ..."` banner from the last failed action.
    pub error: Option<String>,
    pub current_url: Option<String>,
    pub save_enabled: bool,
    pub rows: Vec<LinkRow>,
}

impl PopupView {
    /// Renders the view as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);

        if let Some(advisory) = self.advisory {
            let _ = writeln!(out, "{advisory}");
            return out;
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "{error}");
        }

        match (&self.current_url, self.save_enabled) {
            (Some(url), true) => {
                let _ = writeln!(out, "[{SAVE_BUTTON_LABEL}] {url}");
            }
            _ => {
                let _ = writeln!(out, "[{SAVE_BUTTON_LABEL}] (unavailable: no active tab)");
            }
        }
        out.push('\n');

        if self.rows.is_empty() {
            let _ = writeln!(out, "{NO_LINKS}");
            return out;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, row.url);
            let _ = writeln!(
                out,
                "   Saved: {} | Time left: {}",
                row.saved, row.time_left
            );
        }
        out
    }
}

/// Popup state and actions.
///
/// The popup is useless without the host's permissions: until [`open`]
/// confirms them, every action is a no-op and the view shows an advisory.
///
/// [`open`]: Popup::open
pub struct Popup<S, C, H> {
    store: LinkStore<S, C>,
    host: Arc<H>,
    timezone: TimeZone,
    capabilities_ok: bool,
    links: Vec<SavedLink>,
    current_url: Option<String>,
    /// Banner from the last failed load; cleared by the next good load.
    load_error: Option<String>,
    /// Banner from the last failed save or delete; cleared by the next
    /// successful one.
    action_error: Option<String>,
}

impl<S, C, H> Popup<S, C, H>
where
    S: KeyValueStore,
    C: Clock,
    H: CapabilityHost + TabQuery,
{
    pub fn new(store: LinkStore<S, C>, host: Arc<H>) -> Self {
        Self {
            store,
            host,
            timezone: TimeZone::system(),
            capabilities_ok: false,
            links: Vec::new(),
            current_url: None,
            load_error: None,
            action_error: None,
        }
    }

    /// Uses `timezone` when formatting save times instead of the system zone.
    pub fn with_timezone(mut self, timezone: TimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Checks permissions, loads the saved links and the active tab URL.
    pub async fn open(&mut self) {
        self.capabilities_ok = has_required_capabilities(&*self.host).await;
        if !self.capabilities_ok {
            return;
        }

        self.refresh().await;

        match self.host.active_tab_url().await {
            Ok(url) => self.current_url = url.filter(|u| !u.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to query active tab");
                self.current_url = None;
            }
        }
    }

    /// Re-reads the saved links.
    pub async fn refresh(&mut self) {
        if !self.capabilities_ok {
            return;
        }
        match self.store.read().await {
            Ok(links) => {
                self.links = links;
                self.load_error = None;
            }
            Err(e) => {
                warn!(error = %e, "failed to load saved links");
                self.load_error = Some(format!("Error: Failed to load saved links: {e}"));
            }
        }
    }

    /// Saves the active tab's URL.
    pub async fn save_current(&mut self) {
        if !self.capabilities_ok {
            return;
        }
        let Some(url) = self.current_url.clone() else {
            debug!("no active tab url to save");
            return;
        };

        match self.store.add(&url).await {
            Ok(_) => {
                self.action_error = None;
                self.refresh().await;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "failed to save link");
                self.action_error = Some(format!("Error: Failed to save link: {e}"));
            }
        }
    }

    /// Deletes the saved entry for `url`.
    pub async fn delete(&mut self, url: &str) {
        if !self.capabilities_ok {
            return;
        }
        match self.store.remove_link(url).await {
            Ok(()) => {
                self.action_error = None;
                self.refresh().await;
            }
            Err(e) => {
                warn!(url, error = %e, "failed to delete link");
                self.action_error = Some(format!("Error: Failed to delete link: {e}"));
            }
        }
    }

    pub fn links(&self) -> &[SavedLink] {
        &self.links
    }

    pub fn store(&self) -> &LinkStore<S, C> {
        &self.store
    }

    /// Snapshots the popup with countdowns computed at `now` (milliseconds).
    pub fn view_at(&self, now: i64) -> PopupView {
        if !self.capabilities_ok {
            return PopupView {
                title: TITLE,
                advisory: Some(CAPABILITY_ADVISORY),
                error: None,
                current_url: None,
                save_enabled: false,
                rows: Vec::new(),
            };
        }

        let lifetime = self.store.settings().lifetime;
        let rows = self
            .links
            .iter()
            .map(|link| LinkRow {
                url: link.url.clone(),
                saved: format_saved_at(link.saved_at, &self.timezone)
                    .unwrap_or_else(|| "unknown".to_string()),
                time_left: Countdown::compute(link.saved_at, now, lifetime).to_string(),
            })
            .collect();

        PopupView {
            title: TITLE,
            advisory: None,
            error: self.action_error.clone().or_else(|| self.load_error.clone()),
            current_url: self.current_url.clone(),
            save_enabled: self.current_url.is_some(),
            rows,
        }
    }

    /// Snapshots the popup at the store clock's current time.
    pub fn view(&self) -> PopupView {
        self.view_at(self.store.clock().now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use weeklink_core::{HostError, ManualClock, StorageError, LINK_LIFETIME_MS};
    use weeklink_storage::InMemoryStore;

    struct FakeHost {
        granted: Vec<&'static str>,
        tab: Result<Option<&'static str>, ()>,
    }

    impl FakeHost {
        fn full(tab: Option<&'static str>) -> Self {
            Self {
                granted: vec!["storage", "tabs", "activeTab", "contextMenus"],
                tab: Ok(tab),
            }
        }
    }

    #[async_trait]
    impl CapabilityHost for FakeHost {
        async fn granted_capabilities(&self) -> Result<Vec<String>, HostError> {
            Ok(self.granted.iter().map(|g| g.to_string()).collect())
        }
    }

    #[async_trait]
    impl TabQuery for FakeHost {
        async fn active_tab_url(&self) -> Result<Option<String>, HostError> {
            self.tab
                .map(|tab| tab.map(str::to_string))
                .map_err(|_| HostError::Query("tabs api failed".into()))
        }
    }

    /// An in-memory store that can be told to fail the next few reads or
    /// every write.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryStore,
        failing_reads: AtomicUsize,
        failing_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> weeklink_core::error::Result<Option<Value>> {
            let failing = self
                .failing_reads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(StorageError::Timeout("blip".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> weeklink_core::error::Result<()> {
            if self.failing_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("quota exceeded".into()));
            }
            self.inner.set(key, value).await
        }
    }

    fn flaky_popup(
        backend: FlakyStore,
    ) -> Popup<FlakyStore, ManualClock, FakeHost> {
        let store = LinkStore::with_clock(backend, ManualClock::at_millis(0));
        Popup::new(store, Arc::new(FakeHost::full(Some("https://current.io"))))
            .with_timezone(TimeZone::UTC)
    }

    fn popup(
        host: FakeHost,
    ) -> (Popup<InMemoryStore, ManualClock, FakeHost>, ManualClock) {
        let clock = ManualClock::at_millis(0);
        let store = LinkStore::with_clock(InMemoryStore::new(), clock.clone());
        let popup = Popup::new(store, Arc::new(host)).with_timezone(TimeZone::UTC);
        (popup, clock)
    }

    #[tokio::test]
    async fn empty_popup() {
        let (mut popup, _) = popup(FakeHost::full(Some("https://current.io")));
        popup.open().await;

        let view = popup.view();
        assert_eq!(view.advisory, None);
        assert_eq!(view.current_url.as_deref(), Some("https://current.io"));
        assert!(view.save_enabled);
        assert!(view.rows.is_empty());
        assert!(view.render().contains(NO_LINKS));
    }

    #[tokio::test]
    async fn save_current_adds_row_with_countdown() {
        let (mut popup, clock) = popup(FakeHost::full(Some("https://current.io")));
        popup.open().await;
        popup.save_current().await;

        clock.set_millis(1_000);
        let view = popup.view();
        assert_eq!(
            view.rows,
            vec![LinkRow {
                url: "https://current.io".into(),
                saved: "1970-01-01 00:00:00".into(),
                time_left: "6:23:59:59".into(),
            }]
        );

        clock.set_millis(LINK_LIFETIME_MS);
        assert_eq!(popup.view().rows[0].time_left, "Expired");

        let rendered = popup.view().render();
        assert!(rendered.contains("1. https://current.io"));
        assert!(rendered.contains("Time left: Expired"));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (mut popup, _) = popup(FakeHost::full(Some("https://current.io")));
        popup.open().await;
        popup.save_current().await;
        assert_eq!(popup.links().len(), 1);

        popup.delete("https://current.io").await;
        assert!(popup.links().is_empty());
        assert!(popup.view().rows.is_empty());
    }

    #[tokio::test]
    async fn no_active_tab_disables_save() {
        let (mut popup, _) = popup(FakeHost::full(None));
        popup.open().await;
        popup.save_current().await;

        let view = popup.view();
        assert!(!view.save_enabled);
        assert!(view.rows.is_empty());
        assert!(view.render().contains("no active tab"));
    }

    #[tokio::test]
    async fn tab_query_failure_disables_save() {
        let (mut popup, _) = popup(FakeHost {
            tab: Err(()),
            ..FakeHost::full(None)
        });
        popup.open().await;

        let view = popup.view();
        assert_eq!(view.advisory, None);
        assert!(!view.save_enabled);
    }

    #[tokio::test]
    async fn missing_capabilities_block_everything() {
        let (mut popup, _) = popup(FakeHost {
            granted: vec!["storage", "tabs"],
            tab: Ok(Some("https://current.io")),
        });
        popup.open().await;
        popup.save_current().await;

        assert!(popup.store().read().await.unwrap().is_empty());

        let view = popup.view();
        assert_eq!(view.advisory, Some(CAPABILITY_ADVISORY));
        assert!(!view.save_enabled);
        assert!(view.render().contains(CAPABILITY_ADVISORY));
        assert!(!view.render().contains(SAVE_BUTTON_LABEL));
    }

    #[tokio::test]
    async fn unopened_popup_shows_advisory() {
        let (popup, _) = popup(FakeHost::full(Some("https://current.io")));
        assert_eq!(popup.view().advisory, Some(CAPABILITY_ADVISORY));
    }

    #[tokio::test]
    async fn failed_save_shows_banner_until_next_success() {
        let mut popup = flaky_popup(FlakyStore {
            failing_writes: AtomicBool::new(true),
            ..Default::default()
        });
        popup.open().await;
        popup.save_current().await;

        let view = popup.view();
        let banner = view.error.clone().expect("error banner");
        assert!(banner.starts_with("Error: Failed to save link"));
        assert!(banner.contains("quota exceeded"));
        assert!(view.render().contains(&banner));

        // a later refresh alone does not dismiss a failed save
        popup.refresh().await;
        assert_eq!(popup.view().error.as_deref(), Some(banner.as_str()));

        popup
            .store()
            .backend()
            .failing_writes
            .store(false, Ordering::SeqCst);
        popup.save_current().await;

        let view = popup.view();
        assert_eq!(view.error, None);
        assert_eq!(view.rows.len(), 1);
        assert!(!view.render().contains("Error:"));
    }

    #[tokio::test]
    async fn load_failure_banner_clears_after_good_load() {
        let mut popup = flaky_popup(FlakyStore {
            failing_reads: AtomicUsize::new(1),
            ..Default::default()
        });
        popup.open().await;

        let banner = popup.view().error.expect("error banner");
        assert!(banner.starts_with("Error: Failed to load saved links"));
        assert!(banner.contains("blip"));

        popup.save_current().await;
        popup.refresh().await;

        let view = popup.view();
        assert_eq!(view.error, None);
        assert_eq!(view.rows.len(), 1);
    }

    #[tokio::test]
    async fn save_failure_outranks_load_failure() {
        let mut popup = flaky_popup(FlakyStore {
            failing_reads: AtomicUsize::new(1),
            failing_writes: AtomicBool::new(true),
            ..Default::default()
        });
        popup.open().await;
        popup.save_current().await;

        let banner = popup.view().error.expect("error banner");
        assert!(banner.starts_with("Error: Failed to save link"));
    }

    #[tokio::test]
    async fn save_button_label() {
        let (mut popup, _) = popup(FakeHost::full(Some("https://current.io")));
        popup.open().await;
        assert!(popup
            .view()
            .render()
            .contains("[Save current URL] https://current.io"));

        popup.save_current().await;
        assert!(popup
            .view()
            .render()
            .contains("[Save current URL] https://current.io"));
    }

    #[tokio::test]
    async fn invalid_current_url_shows_banner() {
        let (mut popup, _) = popup(FakeHost::full(Some("about blank")));
        popup.open().await;
        popup.save_current().await;

        let banner = popup.view().error.expect("error banner");
        assert!(banner.contains("invalid url"));
    }
}
