use crate::error::{IdentityError, IdentityErrorExt};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use ed25519_dalek::{PUBLIC_KEY_LENGTH, VerifyingKey};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Ed25519 verification key advertised through the JWKS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    /// RFC 7638 thumbprint of the key.
    pub kid: String,
    /// Base64url public key bytes.
    pub x: String,
}

/// JSON Web Key (OKP / Ed25519).
#[derive(Debug, Serialize)]
pub struct Jwk<'a> {
    pub kty: &'static str,
    pub crv: &'static str,
    #[serde(rename = "use")]
    pub key_use: &'static str,
    pub alg: &'static str,
    pub kid: &'a str,
    pub x: &'a str,
}

impl SigningKey {
    /// Parses a standard-alphabet base64 Ed25519 public key.
    ///
    /// # Errors
    /// Returns [`IdentityError::Config`] when the value is not base64 or not 32 bytes long,
    /// and [`IdentityError::InvalidKey`] when the bytes do not encode a curve point.
    pub fn from_base64(encoded: &str) -> Result<Self, IdentityError> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| IdentityError::Config {
            message: format!("signing key is not valid base64: {e}").into(),
            context: None,
        })?;

        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            bytes.as_slice().try_into().map_err(|_| IdentityError::Config {
                message: format!(
                    "signing key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                    bytes.len()
                )
                .into(),
                context: None,
            })?;

        let verifying_key =
            VerifyingKey::from_bytes(&bytes).context("Ed25519 public key decoding")?;

        Ok(Self::from_verifying_key(&verifying_key))
    }

    #[must_use]
    pub fn from_verifying_key(verifying_key: &VerifyingKey) -> Self {
        let x = URL_SAFE_NO_PAD.encode(verifying_key.as_bytes());
        // Required members in lexicographic order, no whitespace.
        let canonical = format!(r#"{{"crv":"Ed25519","kty":"OKP","x":"{x}"}}"#);
        let kid = URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()));

        Self { kid, x }
    }

    #[must_use]
    pub fn to_jwk(&self) -> Jwk<'_> {
        Jwk { kty: "OKP", crv: "Ed25519", key_use: "sig", alg: "EdDSA", kid: &self.kid, x: &self.x }
    }
}
