//! Profile Types
//!
//! User profile returned by `userinfo` and user created by `dbconnections/signup`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// User profile claims.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// OIDC subject claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Management API user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Sent as RFC 3339 by some endpoints and as epoch seconds by others.
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// Linked identities, present when the profile comes from the management API.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<UserIdentity>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub app_metadata: Map<String, Value>,
    /// Any other claim.
    #[serde(flatten)]
    pub extra_info: HashMap<String, Value>,
}

impl UserProfile {
    /// User identifier: `sub` when present, otherwise `user_id`.
    pub fn id(&self) -> Option<&str> {
        self.sub.as_deref().or(self.user_id.as_deref())
    }

    /// Look up a claim that has no dedicated field.
    pub fn extra(&self, claim: &str) -> Option<&Value> {
        self.extra_info.get(claim)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Rfc3339(DateTime<Utc>),
    #[serde(with = "chrono::serde::ts_seconds")]
    Seconds(DateTime<Utc>),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp = Option::<Timestamp>::deserialize(deserializer)?;
    Ok(timestamp.map(|timestamp| match timestamp {
        Timestamp::Rfc3339(at) | Timestamp::Seconds(at) => at,
    }))
}

/// Identity linked to a user profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub connection: String,
    pub provider: String,
    #[serde(default, rename = "isSocial")]
    pub is_social: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// User created by a database connection sign-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUser {
    #[serde(default, rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}
