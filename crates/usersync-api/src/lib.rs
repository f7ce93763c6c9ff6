// usersync-api: Async Rust client for the enveloped user-management API.

pub mod client;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod transport;
pub mod users;

pub use client::ApiClient;
pub use error::Error;
pub use interceptor::{Passthrough, RequestInterceptor, StaticHeaders};
pub use models::{Envelope, NewUser, Page, User, UserId, UserListing, UserPatch};
pub use transport::TransportConfig;
pub use users::{ResourcePaths, UserService};
