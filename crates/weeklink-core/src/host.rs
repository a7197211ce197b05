//! Host environment surfaces besides storage and permissions.

use crate::error::HostError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Queries the host for the foreground tab.
#[async_trait]
pub trait TabQuery: Send + Sync + 'static {
    /// Returns the URL of the active tab in the current window, if any.
    async fn active_tab_url(&self) -> Result<Option<String>, HostError>;
}

/// Where a context-menu item is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuContext {
    /// Right-clicking a hyperlink.
    Link,
    /// Right-clicking anywhere on the page.
    Page,
}

/// A context-menu item registered with the host at install time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

/// Registers context-menu items with the host.
#[async_trait]
pub trait MenuHost: Send + Sync + 'static {
    async fn create_menu_item(&self, item: &MenuItem) -> Result<(), HostError>;
}
