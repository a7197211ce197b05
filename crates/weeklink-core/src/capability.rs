//! Checks that the host granted everything weeklink needs.

use crate::error::{CapabilityError, HostError};
use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// A permission the host must grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Local key-value storage.
    Storage,
    /// Querying tabs.
    Tabs,
    /// Reading the active tab.
    ActiveTab,
    /// Registering context-menu items.
    ContextMenus,
}

/// Every capability weeklink needs to run.
pub const REQUIRED_CAPABILITIES: [Capability; 4] = [
    Capability::Storage,
    Capability::Tabs,
    Capability::ActiveTab,
    Capability::ContextMenus,
];

impl Capability {
    /// The host's name for this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Storage => "storage",
            Capability::Tabs => "tabs",
            Capability::ActiveTab => "activeTab",
            Capability::ContextMenus => "contextMenus",
        }
    }

    /// Looks up a capability by its host name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        REQUIRED_CAPABILITIES
            .into_iter()
            .find(|capability| capability.as_str() == name)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports the permissions the host currently grants.
#[async_trait]
pub trait CapabilityHost: Send + Sync + 'static {
    /// Returns the host's names for every granted permission.
    async fn granted_capabilities(&self) -> Result<Vec<String>, HostError>;
}

/// Returns the required capabilities missing from `granted`, in
/// [`REQUIRED_CAPABILITIES`] order.
pub fn missing_capabilities<S: AsRef<str>>(granted: &[S]) -> Vec<Capability> {
    REQUIRED_CAPABILITIES
        .into_iter()
        .filter(|required| {
            !granted
                .iter()
                .any(|name| Capability::from_name(name.as_ref()) == Some(*required))
        })
        .collect()
}

/// Checks the host's granted permissions against [`REQUIRED_CAPABILITIES`].
pub async fn check_capabilities<H>(host: &H) -> Result<(), CapabilityError>
where
    H: CapabilityHost + ?Sized,
{
    let granted = host
        .granted_capabilities()
        .await
        .map_err(|e| CapabilityError::QueryFailed(e.to_string()))?;

    let missing = missing_capabilities(granted.as_slice());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CapabilityError::Missing(missing))
    }
}

/// Returns true if the host granted every required capability.
///
/// Never fails: a failed query counts as "capabilities unavailable".
pub async fn has_required_capabilities<H>(host: &H) -> bool
where
    H: CapabilityHost + ?Sized,
{
    match check_capabilities(host).await {
        Ok(()) => {
            debug!("all required capabilities granted");
            true
        }
        Err(CapabilityError::Missing(missing)) => {
            let names: Vec<&str> = missing.iter().map(Capability::as_str).collect();
            warn!(missing = ?names, "required capabilities are missing");
            false
        }
        Err(CapabilityError::QueryFailed(reason)) => {
            warn!(error = %reason, "failed to query granted capabilities");
            false
        }
    }
}
