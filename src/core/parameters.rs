//! Request Parameters
//!
//! Ordered key/value body of an API call and the builder that assembles it.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{GrantType, PasswordlessType};

pub const CLIENT_ID_KEY: &str = "client_id";
pub const GRANT_TYPE_KEY: &str = "grant_type";
pub const CONNECTION_KEY: &str = "connection";
pub const REALM_KEY: &str = "realm";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const SCOPE_KEY: &str = "scope";
pub const AUDIENCE_KEY: &str = "audience";
pub const SEND_KEY: &str = "send";

/// Default scope of the authentication builder.
pub const SCOPE_OPENID: &str = "openid";

/// Body of an API call.
///
/// Keys are unique and the last write wins. Insertion order is kept so the
/// serialized body is deterministic; equality ignores it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ParameterSet {
    values: Map<String, Value>,
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, overwriting any previous one. `null` removes the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        match value.into() {
            Value::Null => {
                self.values.remove(&key);
            }
            value => {
                self.values.insert(key, value);
            }
        }
    }

    /// Merge another set into this one; its values win on collision.
    pub fn merge(&mut self, other: ParameterSet) {
        for (key, value) in other.values {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of a key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Grant type currently set, if it is a known one.
    pub fn grant_type(&self) -> Option<GrantType> {
        self.get_str(GRANT_TYPE_KEY).and_then(GrantType::from_wire)
    }

    /// The set as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl From<Map<String, Value>> for ParameterSet {
    fn from(values: Map<String, Value>) -> Self {
        values.into_iter().collect()
    }
}

/// Fluent builder for a [`ParameterSet`].
#[derive(Clone, Debug, Default)]
pub struct ParameterBuilder {
    parameters: ParameterSet,
}

impl ParameterBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for token requests, with `scope=openid` preset.
    pub fn new_authentication_builder() -> Self {
        Self::new().set_scope(SCOPE_OPENID)
    }

    /// Start from an existing set.
    pub fn from_parameters(parameters: ParameterSet) -> Self {
        Self { parameters }
    }

    /// Set any key. `null` (e.g. a `None` option) removes the key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    pub fn set_client_id(self, client_id: impl Into<String>) -> Self {
        self.set(CLIENT_ID_KEY, client_id.into())
    }

    pub fn set_grant_type(self, grant_type: GrantType) -> Self {
        self.set(GRANT_TYPE_KEY, grant_type.as_str())
    }

    pub fn set_connection(self, connection: impl Into<String>) -> Self {
        self.set(CONNECTION_KEY, connection.into())
    }

    pub fn set_realm(self, realm: impl Into<String>) -> Self {
        self.set(REALM_KEY, realm.into())
    }

    pub fn set_refresh_token(self, refresh_token: impl Into<String>) -> Self {
        self.set(REFRESH_TOKEN_KEY, refresh_token.into())
    }

    pub fn set_scope(self, scope: impl Into<String>) -> Self {
        self.set(SCOPE_KEY, scope.into())
    }

    pub fn set_audience(self, audience: impl Into<String>) -> Self {
        self.set(AUDIENCE_KEY, audience.into())
    }

    /// Delivery kind of a passwordless start.
    pub fn set_send(self, passwordless_type: PasswordlessType) -> Self {
        self.set(SEND_KEY, passwordless_type.send_value())
    }

    /// Merge all entries, overwriting on collision.
    pub fn add_all(mut self, parameters: ParameterSet) -> Self {
        self.parameters.merge(parameters);
        self
    }

    pub fn clear_all(mut self) -> Self {
        self.parameters = ParameterSet::new();
        self
    }

    /// Snapshot of the current entries.
    pub fn as_parameters(&self) -> ParameterSet {
        self.parameters.clone()
    }

    pub fn build(self) -> ParameterSet {
        self.parameters
    }
}
