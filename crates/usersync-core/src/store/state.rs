// ── Store state snapshot ──

use chrono::{DateTime, Utc};
use usersync_api::User;

use crate::error::ErrorKind;

/// Everything the store knows, as one observable value.
///
/// Subscribers always see a whole snapshot, so `users` and `total` never
/// disagree with each other mid-update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Last user fetched by id, lookup, or the refresh after an update.
    pub current_user: Option<User>,
    /// Users of the last list fetched.
    pub users: Vec<User>,
    /// Total count reported with that list (or its length, for bare lists).
    pub total: u64,
    /// `true` while at least one store action is in flight.
    pub loading: bool,
    /// Message of the most recent action's failure, if it failed.
    pub error: Option<String>,
    /// Classification of `error`; set and cleared together with it.
    pub error_kind: Option<ErrorKind>,
    /// When a read action last succeeded.
    pub last_synced: Option<DateTime<Utc>>,
}
