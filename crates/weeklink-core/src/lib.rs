//! Core types and traits for weeklink.
//!
//! This crate holds the saved-link data model, the pure collection logic,
//! the expiry calculator and the traits a host environment implements
//! (storage, permissions, tabs, menus). It performs no I/O of its own.

pub mod capability;
pub mod clock;
pub mod error;
pub mod expiry;
pub mod host;
pub mod link;
pub mod links;
pub mod record;
pub mod store;

pub use capability::{
    check_capabilities, has_required_capabilities, missing_capabilities, Capability,
    CapabilityHost, REQUIRED_CAPABILITIES,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CapabilityError, HostError, LinkError, StorageError};
pub use expiry::{remaining_time, Countdown, LINK_LIFETIME, LINK_LIFETIME_MS};
pub use host::{MenuContext, MenuHost, MenuItem, TabQuery};
pub use link::{SavedLink, LINKS_KEY};
pub use record::{RecordCheck, RejectReason};
pub use store::KeyValueStore;
