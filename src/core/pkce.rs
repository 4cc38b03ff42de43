//! PKCE
//!
//! RFC 7636 proof key for the authorization-code exchange. Only the `S256`
//! challenge method is produced.

use base64::Engine;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::core::parameters::{ParameterBuilder, ParameterSet};
use crate::error::{AuthResult, RequestError};

pub const CODE_CHALLENGE_METHOD: &str = "S256";

const DEFAULT_VERIFIER_LENGTH: usize = 64;

/// Verifier/challenge pair for one authorization.
///
/// The challenge goes to the authorize endpoint, the verifier is sent later
/// with [`AuthenticationApiClient::token`](crate::AuthenticationApiClient::token).
#[derive(Clone, Debug)]
pub struct Pkce {
    code_verifier: SecretString,
    code_challenge: String,
}

impl Pkce {
    /// Fresh random verifier of 64 characters.
    pub fn new() -> Self {
        let code_verifier = generate_verifier(DEFAULT_VERIFIER_LENGTH);
        let code_challenge = compute_challenge(&code_verifier);
        Self {
            code_verifier: SecretString::new(code_verifier),
            code_challenge,
        }
    }

    /// Use a caller-supplied verifier.
    pub fn from_verifier(verifier: impl Into<String>) -> AuthResult<Self> {
        let code_verifier = verifier.into();
        if !is_valid_verifier(&code_verifier) {
            return Err(RequestError::InvalidParameter {
                field: "code_verifier".to_string(),
                message: "expected 43 to 128 unreserved characters".to_string(),
            }
            .into());
        }
        let code_challenge = compute_challenge(&code_verifier);
        Ok(Self {
            code_verifier: SecretString::new(code_verifier),
            code_challenge,
        })
    }

    /// Verifier to send with the code exchange.
    pub fn code_verifier(&self) -> &str {
        self.code_verifier.expose_secret()
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    /// `code_challenge` and `code_challenge_method` for the authorize URL.
    pub fn challenge_parameters(&self) -> ParameterSet {
        ParameterBuilder::new()
            .set("code_challenge", self.code_challenge.clone())
            .set("code_challenge_method", CODE_CHALLENGE_METHOD)
            .build()
    }
}

impl Default for Pkce {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_verifier(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let bytes_needed = (length * 3 + 3) / 4;
    let random_bytes: Vec<u8> = (0..bytes_needed).map(|_| rng.gen()).collect();

    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&random_bytes);
    encoded[..length].to_string()
}

/// BASE64URL(SHA256(verifier)) without padding.
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash)
}

/// 43 to 128 unreserved characters.
pub fn is_valid_verifier(verifier: &str) -> bool {
    (43..=128).contains(&verifier.len())
        && verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}
