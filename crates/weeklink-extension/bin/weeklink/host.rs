use async_trait::async_trait;
use tracing::info;
use weeklink_core::{CapabilityHost, HostError, MenuHost, MenuItem, TabQuery};

/// The terminal standing in for the browser.
///
/// Permissions and the "active tab" come from configuration; menu
/// registration is only logged since a terminal has no context menu.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    granted: Vec<String>,
    current_url: Option<String>,
}

impl TerminalHost {
    pub fn new(granted: Vec<String>, current_url: Option<String>) -> Self {
        let granted = granted
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        Self {
            granted,
            current_url,
        }
    }
}

#[async_trait]
impl CapabilityHost for TerminalHost {
    async fn granted_capabilities(&self) -> Result<Vec<String>, HostError> {
        Ok(self.granted.clone())
    }
}

#[async_trait]
impl TabQuery for TerminalHost {
    async fn active_tab_url(&self) -> Result<Option<String>, HostError> {
        Ok(self.current_url.clone())
    }
}

#[async_trait]
impl MenuHost for TerminalHost {
    async fn create_menu_item(&self, item: &MenuItem) -> Result<(), HostError> {
        info!(id = %item.id, title = %item.title, "context menu item available via `weeklink click`");
        Ok(())
    }
}
