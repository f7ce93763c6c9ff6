// User API wire types
//
// Every response is wrapped in the `Envelope<T>` shape. Fields use
// `#[serde(default)]` for anything the server may omit, and timestamps are
// the server's local `LocalDateTime` rendering (no offset).

use std::num::NonZeroU64;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = u64;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope.
///
/// ```json
/// { "code": 200, "message": "ok", "data": { ... }, "timestamp": 1700000000000 }
/// ```
///
/// Only envelopes with `code == 200` are ever handed to callers; anything
/// else is turned into `Error::Rejected` by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub message: String,
    pub data: T,
    /// Server clock in milliseconds, when the server sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    /// Discard the envelope and keep the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Success code carried by a successful envelope.
pub const SUCCESS_CODE: i64 = 200;

/// Loosely-typed envelope as it comes off the wire, before the `code` check.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

// ── User ─────────────────────────────────────────────────────────────

/// A user as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Absent until the server has created the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Request payload for creating a user. Identity and timestamps are
/// assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// Request payload for updating a user. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

// ── Pagination ───────────────────────────────────────────────────────

/// One page of a paginated listing.
///
/// `records` holds only this page, so `total` is usually larger than
/// `records.len()`. A zero `size` or `current` does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub size: Option<NonZeroU64>,
    #[serde(default)]
    pub current: Option<NonZeroU64>,
    #[serde(default)]
    pub pages: u64,
}

/// Payload of a list response.
///
/// Deployments answer the list endpoint either with a `Page` or with a
/// bare array; anything else is kept as raw JSON so the caller can decide
/// how to degrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserListing {
    Bare(Vec<User>),
    Paged(Page<User>),
    Other(serde_json::Value),
}
