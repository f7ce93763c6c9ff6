// User resource endpoints
//
// One method per CRUD verb against a fixed resource path, plus the two
// lookups the server exposes next to them (unpaged listing, by email).
// No state, no retries, no caching: every call is a single request whose
// result is handed back unchanged.

use std::num::NonZeroU32;

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Envelope, NewUser, User, UserId, UserListing, UserPatch};

/// Resource paths for one deployment, relative to the base URL.
///
/// The layout is a contract with the backend and is pinned per
/// deployment, never negotiated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    /// Collection root: `GET`/`POST` here, `GET`/`PUT`/`DELETE` on `{collection}/{id}`.
    pub collection: String,
    /// Paginated listing, accepting optional `page` and `size` query parameters.
    pub paged_list: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            collection: "users".into(),
            paged_list: "users/page".into(),
        }
    }
}

impl ResourcePaths {
    /// Layout of deployments that expose the resource as `/user`.
    pub fn singular() -> Self {
        Self {
            collection: "user".into(),
            paged_list: "user/page".into(),
        }
    }
}

/// Typed facade over the user endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
    paths: ResourcePaths,
}

impl UserService {
    pub fn new(client: ApiClient, paths: ResourcePaths) -> Self {
        Self { client, paths }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    /// Fetch a single user.
    ///
    /// `GET {collection}/{id}`
    pub async fn get_user(&self, id: UserId) -> Result<Envelope<User>, Error> {
        let url = self.client.endpoint(&self.paths.collection, &[id.to_string().as_str()])?;
        debug!(id, "fetching user");
        self.client.get(url, &[]).await
    }

    /// Create a user.
    ///
    /// `POST {collection}`
    pub async fn create_user(&self, draft: &NewUser) -> Result<Envelope<User>, Error> {
        let url = self.client.endpoint(&self.paths.collection, &[])?;
        debug!(email = %draft.email, "creating user");
        self.client.post(url, draft).await
    }

    /// Apply a partial update to a user.
    ///
    /// `PUT {collection}/{id}`
    pub async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<Envelope<User>, Error> {
        let url = self.client.endpoint(&self.paths.collection, &[id.to_string().as_str()])?;
        debug!(id, "updating user");
        self.client.put(url, patch).await
    }

    /// Delete a user.
    ///
    /// `DELETE {collection}/{id}`. Servers differ in what they put in
    /// `data` here (`null`, `true`, the removed row), so it is kept as raw
    /// JSON.
    pub async fn delete_user(&self, id: UserId) -> Result<Envelope<serde_json::Value>, Error> {
        let url = self.client.endpoint(&self.paths.collection, &[id.to_string().as_str()])?;
        debug!(id, "deleting user");
        self.client.delete(url).await
    }

    /// List users one page at a time.
    ///
    /// `GET {paged_list}?page=&size=`; absent parameters are left out so
    /// the server applies its own defaults.
    pub async fn list_users(
        &self,
        page: Option<NonZeroU32>,
        size: Option<NonZeroU32>,
    ) -> Result<Envelope<UserListing>, Error> {
        let url = self.client.endpoint(&self.paths.paged_list, &[])?;
        let mut query = Vec::with_capacity(2);
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = size {
            query.push(("size", size.to_string()));
        }
        debug!(?page, ?size, "listing users");
        self.client.get(url, &query).await
    }

    /// List every user without pagination.
    ///
    /// `GET {collection}`
    pub async fn list_all_users(&self) -> Result<Envelope<Vec<User>>, Error> {
        let url = self.client.endpoint(&self.paths.collection, &[])?;
        debug!("listing all users");
        self.client.get(url, &[]).await
    }

    /// Look a user up by email address.
    ///
    /// `GET {collection}/email/{email}`
    pub async fn find_by_email(&self, email: &str) -> Result<Envelope<User>, Error> {
        let path = format!("{}/email", self.paths.collection);
        let url = self.client.endpoint(&path, &[email])?;
        debug!(email, "looking up user by email");
        self.client.get(url, &[]).await
    }
}
