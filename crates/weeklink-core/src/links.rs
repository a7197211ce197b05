//! Pure operations over an in-memory saved-link collection.
//!
//! Storage round trips live in the link store; everything here is
//! deterministic and works on owned vectors.

use crate::expiry::is_expired;
use crate::link::SavedLink;
use jiff::SignedDuration;

/// Replaces any entry with the same URL and appends `link` at the end.
pub fn upsert(links: Vec<SavedLink>, link: SavedLink) -> Vec<SavedLink> {
    let mut links = without_url(links, &link.url);
    links.push(link);
    links
}

/// Drops every entry whose URL equals `url`. Absent URLs are a no-op.
pub fn without_url(links: Vec<SavedLink>, url: &str) -> Vec<SavedLink> {
    links.into_iter().filter(|link| link.url != url).collect()
}

/// Splits `links` into `(kept, expired)` at `now`, preserving order in both.
pub fn partition_expired(
    links: Vec<SavedLink>,
    now: i64,
    lifetime: SignedDuration,
) -> (Vec<SavedLink>, Vec<SavedLink>) {
    links
        .into_iter()
        .partition(|link| !is_expired(link.saved_at, now, lifetime))
}
