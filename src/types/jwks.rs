//! JSON Web Key Set
//!
//! Keys published at `.well-known/jwks.json`, used to verify ID tokens.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A JSON Web Key Set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

/// A single JSON Web Key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type, e.g. "RSA".
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// RSA modulus, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA exponent, base64url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x5c: Vec<String>,
}

impl JsonWebKeySet {
    /// Find a key by its `kid`.
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }

    /// Keys indexed by `kid`. Keys without an id are skipped.
    pub fn keys_by_id(&self) -> HashMap<&str, &JsonWebKey> {
        self.keys
            .iter()
            .filter_map(|key| key.kid.as_deref().map(|kid| (kid, key)))
            .collect()
    }

    /// RSA decoding keys indexed by `kid`. Keys that are not usable RSA keys
    /// are skipped.
    #[cfg(feature = "jwt")]
    pub fn decoding_keys(&self) -> HashMap<String, jsonwebtoken::DecodingKey> {
        self.keys
            .iter()
            .filter_map(|key| {
                let kid = key.kid.clone()?;
                match key.decoding_key() {
                    Some(decoding_key) => Some((kid, decoding_key)),
                    None => {
                        tracing::warn!(kid = %kid, kty = %key.kty, "Skipping unusable JSON web key");
                        None
                    }
                }
            })
            .collect()
    }
}

impl JsonWebKey {
    pub fn is_rsa(&self) -> bool {
        self.kty == "RSA"
    }

    /// Decoding key for an RSA key with modulus and exponent.
    #[cfg(feature = "jwt")]
    pub fn decoding_key(&self) -> Option<jsonwebtoken::DecodingKey> {
        if !self.is_rsa() {
            return None;
        }
        let (n, e) = (self.n.as_deref()?, self.e.as_deref()?);
        jsonwebtoken::DecodingKey::from_rsa_components(n, e).ok()
    }
}
