// ── Refresh application logic ──
//
// Applies the payloads of successful read actions to the UserStore.
// A list payload replaces the list wholesale; it is never merged.

use chrono::Utc;
use tracing::debug;
use usersync_api::{User, UserListing};

use super::UserStore;

/// Flatten a list payload into `(users, total)`.
///
/// Pages report their own total; bare sequences count themselves; any
/// other shape degrades to an empty list rather than an error.
pub(crate) fn normalize_listing(listing: UserListing) -> (Vec<User>, u64) {
    match listing {
        UserListing::Paged(page) => (page.records, page.total),
        UserListing::Bare(users) => {
            let total = u64::try_from(users.len()).unwrap_or(u64::MAX);
            (users, total)
        }
        UserListing::Other(value) => {
            debug!(payload = %value, "unrecognized list payload, treating as empty");
            (Vec::new(), 0)
        }
    }
}

impl UserStore {
    /// Replace the current user with a freshly read one.
    pub(crate) fn apply_user(&self, user: User) {
        self.state.send_modify(|state| {
            state.current_user = Some(user);
            state.last_synced = Some(Utc::now());
        });
    }

    /// Replace the user list and its total with a freshly read listing.
    pub(crate) fn apply_listing(&self, listing: UserListing) {
        let (users, total) = normalize_listing(listing);
        self.apply_users(users, total);
    }

    /// Replace the user list and its total.
    pub(crate) fn apply_users(&self, users: Vec<User>, total: u64) {
        self.state.send_modify(|state| {
            state.users = users;
            state.total = total;
            state.last_synced = Some(Utc::now());
        });
    }
}
