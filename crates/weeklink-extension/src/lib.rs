//! The weeklink extension: link store service, expiry sweep, context-menu
//! entry point and popup view model.
//!
//! Core types are re-exported from `weeklink_core`.

pub mod link_store;
pub mod menu;
pub mod popup;
pub mod sweeper;

pub use link_store::{LinkStore, LinkStoreSettings};
pub use menu::{handle_menu_click, on_installed, MenuClick};
pub use popup::{Popup, PopupView};
pub use sweeper::{Sweeper, SweeperHandle};
pub use weeklink_core::{LinkError, SavedLink, StorageError};
