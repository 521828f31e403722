// crates/fragkit-trust/src/jwk.rs

//! JWK import: EC public keys in interchange form → curve verifying keys.
//!
//! Coordinates arrive base64url-encoded without padding; the SEC1
//! uncompressed point `0x04 || x || y` is rebuilt and validated by the
//! curve implementation (on-curve check included).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use fragkit_core::config::{Curve, Jwk};
use thiserror::Error;

/// Why a JWK could not be imported.
///
/// Import failures make a candidate unusable, never a verification
/// oracle: the verifier skips the candidate and reports the same
/// aggregate failure as any other non-match.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JwkError {
    /// `kty` was not `"EC"`.
    #[error("unsupported key type {0:?}")]
    NotEc(String),
    /// A coordinate failed base64url decoding or had the wrong length.
    #[error("bad {axis} coordinate")]
    BadCoordinate {
        /// Which coordinate (`"x"` or `"y"`).
        axis: &'static str,
    },
    /// The rebuilt point is not on the declared curve.
    #[error("point is not on {0}")]
    OffCurve(Curve),
}

/// An imported, verify-only EC public key.
#[derive(Clone, Debug)]
pub enum PublicKey {
    /// NIST P-256 key.
    P256(p256::ecdsa::VerifyingKey),
    /// NIST P-384 key.
    P384(p384::ecdsa::VerifyingKey),
}

/// Import one JWK as a verifying key on its declared curve.
pub fn import(jwk: &Jwk) -> Result<PublicKey, JwkError> {
    if jwk.kty != "EC" {
        return Err(JwkError::NotEc(jwk.kty.clone()));
    }

    let sec1 = sec1_point(jwk)?;
    match jwk.crv {
        Curve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
            .map(PublicKey::P256)
            .map_err(|_| JwkError::OffCurve(jwk.crv)),
        Curve::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
            .map(PublicKey::P384)
            .map_err(|_| JwkError::OffCurve(jwk.crv)),
    }
}

/// Rebuild the SEC1 uncompressed point from base64url coordinates.
fn sec1_point(jwk: &Jwk) -> Result<Vec<u8>, JwkError> {
    let want = jwk.crv.coordinate_len();
    let x = decode_coordinate(&jwk.x, want, "x")?;
    let y = decode_coordinate(&jwk.y, want, "y")?;

    let mut sec1 = Vec::with_capacity(1 + 2 * want);
    sec1.push(0x04);
    sec1.extend_from_slice(&x);
    sec1.extend_from_slice(&y);
    Ok(sec1)
}

fn decode_coordinate(b64: &str, want: usize, axis: &'static str) -> Result<Vec<u8>, JwkError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(b64)
        .map_err(|_| JwkError::BadCoordinate { axis })?;
    if bytes.len() != want {
        return Err(JwkError::BadCoordinate { axis });
    }
    Ok(bytes)
}

/// Export a P-256 verifying key to JWK coordinate strings (test support
/// and key-listing tooling).
#[must_use]
pub fn p256_coordinates(vk: &p256::ecdsa::VerifyingKey) -> (String, String) {
    use p256::elliptic_curve::sec1::ToEncodedPoint;
    let point = vk.to_encoded_point(false);
    (
        URL_SAFE_NO_PAD.encode(point.x().map_or(&[][..], |x| x.as_slice())),
        URL_SAFE_NO_PAD.encode(point.y().map_or(&[][..], |y| y.as_slice())),
    )
}

/// Export a P-384 verifying key to JWK coordinate strings.
#[must_use]
pub fn p384_coordinates(vk: &p384::ecdsa::VerifyingKey) -> (String, String) {
    use p384::elliptic_curve::sec1::ToEncodedPoint;
    let point = vk.to_encoded_point(false);
    (
        URL_SAFE_NO_PAD.encode(point.x().map_or(&[][..], |x| x.as_slice())),
        URL_SAFE_NO_PAD.encode(point.y().map_or(&[][..], |y| y.as_slice())),
    )
}
