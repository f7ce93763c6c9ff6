// ── User store ──
//
// Owns the observable `StoreState` and the actions that change it. Reads
// land the server's answer in state; writes never trust their own
// response as canonical and always follow up with a fresh read.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};
use usersync_api::{NewUser, User, UserId, UserPatch, UserService};

use super::StoreState;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::stream::StateStream;

/// Reactive store for the user resource.
///
/// Actions take `&self` and may run concurrently; share the store as an
/// `Arc<UserStore>`. Every mutation is broadcast to subscribers through a
/// `watch` channel.
pub struct UserStore {
    pub(crate) service: UserService,
    pub(crate) state: watch::Sender<StoreState>,
    /// Number of actions currently in flight. Only changed inside
    /// `send_modify`, so it always agrees with `StoreState::loading`.
    in_flight: AtomicUsize,
}

impl UserStore {
    pub fn new(service: UserService) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            service,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Build the service described by `config` and wrap it in a store.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_service()?))
    }

    /// The entity service backing this store.
    pub fn service(&self) -> &UserService {
        &self.service
    }

    // ── Read actions ─────────────────────────────────────────────────

    /// Fetch one user into `current_user`.
    ///
    /// Failures are recorded in `error`, never returned; `current_user`
    /// keeps its previous value.
    pub async fn fetch_user(&self, id: UserId) {
        self.track(async {
            match self.service.get_user(id).await {
                Ok(envelope) => self.apply_user(envelope.data),
                Err(err) => {
                    self.record_failure("fetch_user", err);
                }
            }
        })
        .await;
    }

    /// Fetch one page of users into `users` and `total`.
    ///
    /// `None` leaves the parameter to the server's default.
    pub async fn fetch_users(&self, page: Option<NonZeroU32>, size: Option<NonZeroU32>) {
        self.track(async {
            match self.service.list_users(page, size).await {
                Ok(envelope) => self.apply_listing(envelope.data),
                Err(err) => {
                    self.record_failure("fetch_users", err);
                }
            }
        })
        .await;
    }

    /// Fetch every user, unpaginated, into `users`; `total` becomes the
    /// number of users returned.
    pub async fn fetch_all_users(&self) {
        self.track(async {
            match self.service.list_all_users().await {
                Ok(envelope) => {
                    let users = envelope.data;
                    let total = u64::try_from(users.len()).unwrap_or(u64::MAX);
                    self.apply_users(users, total);
                }
                Err(err) => {
                    self.record_failure("fetch_all_users", err);
                }
            }
        })
        .await;
    }

    /// Look a user up by email into `current_user`.
    pub async fn find_user_by_email(&self, email: &str) {
        self.track(async {
            match self.service.find_by_email(email).await {
                Ok(envelope) => self.apply_user(envelope.data),
                Err(err) => {
                    self.record_failure("find_user_by_email", err);
                }
            }
        })
        .await;
    }

    // ── Write actions ────────────────────────────────────────────────

    /// Create a user, then refetch the first page of the list.
    ///
    /// Returns the user as the server created it. If the refetch fails the
    /// create still succeeds, with the refetch's failure left in `error`.
    pub async fn create_user(&self, draft: &NewUser) -> Result<User, CoreError> {
        self.track(async {
            let created = self
                .service
                .create_user(draft)
                .await
                .map_err(|err| self.record_failure("create_user", err))?
                .data;
            debug!(id = ?created.id, "user created, refreshing list");
            self.fetch_users(None, None).await;
            Ok(created)
        })
        .await
    }

    /// Update a user, then refetch that user into `current_user`.
    pub async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<User, CoreError> {
        self.track(async {
            let updated = self
                .service
                .update_user(id, patch)
                .await
                .map_err(|err| self.record_failure("update_user", err))?
                .data;
            debug!(id, "user updated, refreshing it");
            self.fetch_user(id).await;
            Ok(updated)
        })
        .await
    }

    /// Delete a user, then refetch the first page of the list.
    ///
    /// Returns whatever the server put in the envelope's `data`.
    pub async fn delete_user(&self, id: UserId) -> Result<serde_json::Value, CoreError> {
        self.track(async {
            let data = self
                .service
                .delete_user(id)
                .await
                .map_err(|err| self.record_failure("delete_user", err))?
                .data;
            debug!(id, "user deleted, refreshing list");
            self.fetch_users(None, None).await;
            Ok(data)
        })
        .await
    }

    /// Forget the last recorded failure.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| {
            state.error_kind = None;
            state.error.take().is_some()
        });
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.borrow().users.clone()
    }

    pub fn total(&self) -> u64 {
        self.state.borrow().total
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_synced
    }

    /// How long ago a read last succeeded, or `None` if none has.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_synced().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    // ── Action bookkeeping ───────────────────────────────────────────

    /// Run `action` as one store action: clear `error`, hold `loading`
    /// while it runs, and release it however the action ends (including
    /// when the future is dropped mid-flight).
    async fn track<T>(&self, action: impl Future<Output = T>) -> T {
        self.begin_action();
        let _in_flight = scopeguard::guard((), |()| self.end_action());
        action.await
    }

    fn begin_action(&self) {
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
            state.error = None;
            state.error_kind = None;
        });
    }

    fn end_action(&self) {
        self.state.send_modify(|state| {
            let before = self.in_flight.fetch_sub(1, Ordering::SeqCst);
            state.loading = before > 1;
        });
    }

    /// Log a failed action and record its message in `error`.
    fn record_failure(&self, action: &'static str, err: usersync_api::Error) -> CoreError {
        let err = CoreError::from(err);
        warn!(action, error = %err, "store action failed");
        let message = err.to_string();
        let kind = err.kind();
        self.state.send_modify(|state| {
            state.error = Some(message);
            state.error_kind = Some(kind);
        });
        err
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("service", &self.service)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
