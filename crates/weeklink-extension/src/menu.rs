//! Install-time menu registration and click dispatch.

use crate::link_store::LinkStore;
use serde::Deserialize;
use tracing::{debug, info, warn};
use weeklink_core::{Clock, KeyValueStore, MenuContext, MenuHost, MenuItem, SavedLink};

pub const SAVE_MENU_ITEM_ID: &str = "save-url-7days";
pub const SAVE_MENU_ITEM_TITLE: &str = "Save url for 7 days";

/// The context-menu item offered on links and pages.
pub fn save_link_menu_item() -> MenuItem {
    MenuItem {
        id: SAVE_MENU_ITEM_ID.to_string(),
        title: SAVE_MENU_ITEM_TITLE.to_string(),
        contexts: vec![MenuContext::Link, MenuContext::Page],
    }
}

/// Registers weeklink's menu item. Failures are logged, not returned.
pub async fn on_installed<H>(host: &H)
where
    H: MenuHost + ?Sized,
{
    let item = save_link_menu_item();
    match host.create_menu_item(&item).await {
        Ok(()) => debug!(id = %item.id, "registered context menu item"),
        Err(e) => warn!(id = %item.id, error = %e, "failed to register context menu item"),
    }
}

/// A context-menu click as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    /// The hyperlink that was right-clicked, if any.
    #[serde(default)]
    pub link_url: Option<String>,
    /// The page the click happened on.
    #[serde(default)]
    pub page_url: Option<String>,
}

impl MenuClick {
    /// A click on weeklink's own menu item.
    pub fn save(link_url: Option<String>, page_url: Option<String>) -> Self {
        Self {
            menu_item_id: SAVE_MENU_ITEM_ID.to_string(),
            link_url,
            page_url,
        }
    }

    /// The URL to save: the link target if present, else the page URL.
    /// Empty strings count as absent.
    pub fn target_url(&self) -> Option<&str> {
        non_empty(&self.link_url).or_else(|| non_empty(&self.page_url))
    }
}

fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.is_empty())
}

/// Saves the clicked link or page.
///
/// Clicks on other menu items and clicks without a URL are ignored. Store
/// failures are logged and swallowed; nothing is shown to the user at this
/// point. Returns the saved link on success.
pub async fn handle_menu_click<S, C>(
    store: &LinkStore<S, C>,
    click: &MenuClick,
) -> Option<SavedLink>
where
    S: KeyValueStore,
    C: Clock,
{
    if click.menu_item_id != SAVE_MENU_ITEM_ID {
        debug!(menu_item_id = %click.menu_item_id, "ignoring click on foreign menu item");
        return None;
    }

    let Some(url) = click.target_url() else {
        debug!("menu click carried no url");
        return None;
    };

    match store.add(url).await {
        Ok(link) => {
            info!(url, "saved link from context menu");
            Some(link)
        }
        Err(e) => {
            warn!(url, error = %e, "failed to save link from context menu");
            None
        }
    }
}
