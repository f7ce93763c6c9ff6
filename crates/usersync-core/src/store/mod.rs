// ── Reactive user store ──
//
// Single source of truth for what the client knows about users, with
// push-based change notification and read-after-write refresh.

mod refresh;
mod state;
mod user_store;

pub use state::StoreState;
pub use user_store::UserStore;
