// usersync-core: Reactive user store between usersync-api and consumers.

pub mod config;
pub mod error;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use error::{CoreError, ErrorKind};
pub use store::{StoreState, UserStore};
pub use stream::{StateStream, StateWatchStream};

// Re-export the wire types consumers hand to the store.
pub use usersync_api::{NewUser, ResourcePaths, User, UserId, UserPatch};
