// crates/fragkit-core/src/config.rs

//! Trust-store configuration.
//!
//! The configuration file is the JSON shape the page's config collaborator
//! serves: `{"allowUnsigned": bool, "keys": [{name, hash, key}]}` where
//! each `key` is an EC public key in JWK interchange form, restricted to
//! verification. The pipeline only ever reads a loaded config; updating
//! one is an explicit replace, never in-place mutation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Hash algorithm a trusted key signs under (WebCrypto names on the wire).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256.
    #[serde(rename = "SHA-256")]
    Sha256,
    /// SHA-384.
    #[serde(rename = "SHA-384")]
    Sha384,
    /// SHA-512.
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        })
    }
}

/// Named elliptic curve of a JWK.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 (secp256r1).
    #[serde(rename = "P-256")]
    P256,
    /// NIST P-384 (secp384r1).
    #[serde(rename = "P-384")]
    P384,
}

impl Curve {
    /// Byte length of one coordinate on this curve.
    #[must_use]
    pub const fn coordinate_len(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
        })
    }
}

/// EC public key in JWK interchange form (verify-only usage).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    /// Key type; `"EC"` for every key fragkit accepts.
    pub kty: String,
    /// Named curve.
    pub crv: Curve,
    /// X coordinate, base64url without padding.
    pub x: String,
    /// Y coordinate, base64url without padding.
    pub y: String,
    /// Declared algorithm, e.g. `"ECDSA"`; informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Extractability flag carried over from the key's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    /// Permitted operations; expected to be `["verify"]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
}

/// One entry of the trust store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrustedKey {
    /// Human-readable key name, reported on a successful match.
    pub name: String,
    /// Digest the signer used.
    pub hash: HashAlg,
    /// Public key material.
    pub key: Jwk,
}

/// Loaded trust-store configuration.
///
/// The default matches the collaborator's built-in fallback:
/// `{"allowUnsigned":false,"keys":[]}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Accept unsigned (lowercase-tag) fragments.
    #[serde(default)]
    pub allow_unsigned: bool,
    /// Keys eligible to validate signatures, in declaration order.
    #[serde(default)]
    pub keys: Vec<TrustedKey>,
}

impl Config {
    /// Read a configuration from JSON.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        serde_json::from_reader(rdr).context("deserialize JSON trust-store config")
    }

    /// Read a configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let f = File::open(path_ref)
            .with_context(|| format!("open {}", path_ref.to_string_lossy()))?;
        Self::from_reader(BufReader::new(f))
    }
}
