//! Participant Identity Resolution
//!
//! The remote store is not consistent about how it references users: a
//! thread may carry a bare id string, a populated user object with the id
//! nested under `_id`/`id`/`userId`, or (from older records) a raw JSON
//! scalar. `RawRef` models those shapes as one tagged union resolved by a
//! single pure function, so the rest of the engine only ever sees a
//! canonical id string.
//!
//! `counterpart_of` derives the other participant of a two-party thread
//! relative to the current user. Resolution priority:
//!
//! 1. An explicit `counterpart` field, when present and resolvable
//! 2. Whichever of `from`/`to` does not resolve to the current user
//! 3. With an unknown current user, `to` then `from`
//!
//! A thread whose both sides resolve to the current user is malformed and
//! yields an empty string, never a false match.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Thread;

/// A participant (or listing) reference as it appears on the wire
///
/// Untagged: a JSON string becomes [`RawRef::Id`], any JSON object becomes
/// [`RawRef::Object`], and remaining scalars fall through to
/// [`RawRef::Other`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    /// Bare id string
    Id(String),
    /// Object carrying the id under a common key name
    Object(RefObject),
    /// Anything else; usable only when its string form is a token
    Other(Value),
}

/// The subset of an embedded object the resolver understands
///
/// All fields are optional so that any populated user or listing object
/// deserializes; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefObject {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(
        rename = "userId",
        alias = "user_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
}

impl RawRef {
    /// Construct a reference from a bare id
    pub fn id(value: impl Into<String>) -> Self {
        RawRef::Id(value.into())
    }

    /// Construct a reference nesting the id under `_id`
    pub fn object(value: impl Into<String>) -> Self {
        RawRef::Object(RefObject {
            object_id: Some(value.into()),
            ..RefObject::default()
        })
    }

    /// Resolve this reference to a canonical id string
    ///
    /// Returns the empty string when the reference carries no usable id.
    /// Resolving an already-canonical id returns it unchanged.
    pub fn canonical_id(&self) -> String {
        match self {
            RawRef::Id(s) => s.trim().to_string(),
            RawRef::Object(o) => o
                .object_id
                .as_deref()
                .or(o.id.as_deref())
                .or(o.user_id.as_deref())
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            RawRef::Other(value) => match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.trim().to_string(),
                _ => String::new(),
            },
        }
    }
}

fn resolve_opt(reference: Option<&RawRef>) -> String {
    reference.map(RawRef::canonical_id).unwrap_or_default()
}

/// Derive the counterpart id of `thread` relative to `current_user_id`
///
/// Pure; see the module docs for the resolution priority. An empty
/// `current_user_id` means the current user is unknown.
pub fn counterpart_of(thread: &Thread, current_user_id: &str) -> String {
    let explicit = resolve_opt(thread.counterpart.as_ref());
    if !explicit.is_empty() {
        return explicit;
    }

    let from = resolve_opt(thread.from.as_ref());
    let to = resolve_opt(thread.to.as_ref());

    if !current_user_id.is_empty() {
        let from_is_me = from == current_user_id;
        let to_is_me = to == current_user_id;
        match (from_is_me, to_is_me) {
            // Malformed: both sides are the current user.
            (true, true) => return String::new(),
            (true, false) => return to,
            (false, true) => return from,
            (false, false) => {}
        }
    }

    // Current user unknown, or neither side matches: prefer `to`.
    if !to.is_empty() {
        to
    } else {
        from
    }
}
