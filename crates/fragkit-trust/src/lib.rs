// crates/fragkit-trust/src/lib.rs

//! fragkit-trust — multi-key ECDSA verification over fragment payloads.
//!
//! Given a payload, a detached signature, and the trust store's candidate
//! keys, [`EcdsaVerifier`] digests the payload under each candidate's
//! declared hash and checks the raw `r||s` signature against the
//! candidate's curve key. The first success wins; failure is reported
//! only after every candidate has failed, and the failure carries no
//! per-candidate detail.
//!
//! Attempts are pure functions of their inputs, so a first-success
//! race would be equivalent to this deterministic sequential loop.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// JWK import to curve verifying keys.
pub mod jwk;

pub use jwk::{import, JwkError, PublicKey};

use fragkit_core::config::{HashAlg, TrustedKey};
use fragkit_core::error::VerifyError;
use fragkit_core::pipeline::{SecurityContext, SignatureVerifier};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use sha2::{Digest, Sha256, Sha384, Sha512};
use tracing::trace;

/// Digest `payload` under the candidate's declared hash.
#[must_use]
pub fn digest(hash: HashAlg, payload: &[u8]) -> Vec<u8> {
    match hash {
        HashAlg::Sha256 => Sha256::digest(payload).to_vec(),
        HashAlg::Sha384 => Sha384::digest(payload).to_vec(),
        HashAlg::Sha512 => Sha512::digest(payload).to_vec(),
    }
}

/// ECDSA backend for the pipeline's [`SignatureVerifier`] seam.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaVerifier;

impl EcdsaVerifier {
    /// Check one candidate. Unimportable keys and malformed signatures
    /// count as non-matches, not errors.
    fn attempt(payload: &[u8], signature: &[u8], candidate: &TrustedKey) -> bool {
        let Ok(key) = jwk::import(&candidate.key) else {
            trace!(key = %candidate.name, "candidate key unimportable, skipping");
            return false;
        };
        let prehash = digest(candidate.hash, payload);
        match key {
            PublicKey::P256(vk) => p256::ecdsa::Signature::from_slice(signature)
                .is_ok_and(|sig| vk.verify_prehash(&prehash, &sig).is_ok()),
            PublicKey::P384(vk) => p384::ecdsa::Signature::from_slice(signature)
                .is_ok_and(|sig| vk.verify_prehash(&prehash, &sig).is_ok()),
        }
    }
}

impl SignatureVerifier for EcdsaVerifier {
    fn verify<'k>(
        &self,
        payload: &[u8],
        signature: &[u8],
        candidates: &'k [TrustedKey],
        ctx: SecurityContext,
    ) -> Result<&'k TrustedKey, VerifyError> {
        if ctx == SecurityContext::Insecure {
            return Err(VerifyError::InsecureContext);
        }
        if signature.is_empty() {
            return Err(VerifyError::NoMatch);
        }
        for candidate in candidates {
            if Self::attempt(payload, signature, candidate) {
                trace!(key = %candidate.name, "signature matched");
                return Ok(candidate);
            }
        }
        Err(VerifyError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragkit_core::config::{Curve, Jwk};
    use p256::ecdsa::signature::hazmat::PrehashSigner;

    /// Deterministic P-256 key pair for tests.
    fn p256_pair(seed: u8) -> (p256::ecdsa::SigningKey, TrustedKey) {
        let sk = p256::ecdsa::SigningKey::from_slice(&[seed; 32]).unwrap();
        let (x, y) = jwk::p256_coordinates(sk.verifying_key());
        let trusted = TrustedKey {
            name: format!("p256-{seed}"),
            hash: HashAlg::Sha256,
            key: Jwk {
                kty: "EC".to_owned(),
                crv: Curve::P256,
                x,
                y,
                alg: Some("ECDSA".to_owned()),
                ext: Some(true),
                key_ops: vec!["verify".to_owned()],
            },
        };
        (sk, trusted)
    }

    fn sign_p256(sk: &p256::ecdsa::SigningKey, hash: HashAlg, payload: &[u8]) -> Vec<u8> {
        let sig: p256::ecdsa::Signature = sk.sign_prehash(&digest(hash, payload)).unwrap();
        sig.to_vec()
    }

    #[test]
    fn single_key_verifies() {
        let (sk, trusted) = p256_pair(1);
        let payload = b"Cname,qty\nbolt,7";
        let sig = sign_p256(&sk, HashAlg::Sha256, payload);
        let candidates = [trusted];
        let got = EcdsaVerifier
            .verify(payload, &sig, &candidates, SecurityContext::Secure)
            .unwrap();
        assert_eq!(got.name, "p256-1");
    }

    #[test]
    fn tampered_payload_rejected() {
        let (sk, trusted) = p256_pair(1);
        let sig = sign_p256(&sk, HashAlg::Sha256, b"Coriginal");
        let err = EcdsaVerifier
            .verify(b"Ctampered", &sig, &[trusted], SecurityContext::Secure)
            .unwrap_err();
        assert_eq!(err, VerifyError::NoMatch);
    }

    #[test]
    fn declared_hash_selects_the_digest() {
        let (sk, mut trusted) = p256_pair(1);
        let payload = b"Cpayload";
        // Signed over SHA-384; a store entry declaring SHA-256 must not
        // validate it, the matching entry must.
        let sig = sign_p256(&sk, HashAlg::Sha384, payload);
        assert!(EcdsaVerifier
            .verify(payload, &sig, std::slice::from_ref(&trusted), SecurityContext::Secure)
            .is_err());
        trusted.hash = HashAlg::Sha384;
        assert!(EcdsaVerifier
            .verify(payload, &sig, &[trusted], SecurityContext::Secure)
            .is_ok());
    }

    #[test]
    fn p384_key_with_sha512() {
        use p384::ecdsa::signature::hazmat::PrehashSigner as _;
        let sk = p384::ecdsa::SigningKey::from_slice(&[3u8; 48]).unwrap();
        let (x, y) = jwk::p384_coordinates(sk.verifying_key());
        let trusted = TrustedKey {
            name: "p384".to_owned(),
            hash: HashAlg::Sha512,
            key: Jwk {
                kty: "EC".to_owned(),
                crv: Curve::P384,
                x,
                y,
                alg: None,
                ext: None,
                key_ops: vec![],
            },
        };
        let payload = b"Thello\tworld";
        let sig: p384::ecdsa::Signature =
            sk.sign_prehash(&digest(HashAlg::Sha512, payload)).unwrap();
        let sig_bytes = sig.to_vec();
        let candidates = [trusted];
        let got = EcdsaVerifier
            .verify(payload, &sig_bytes, &candidates, SecurityContext::Secure)
            .unwrap();
        assert_eq!(got.name, "p384");
    }

    #[test]
    fn multi_key_first_success_any_order() {
        let (_, a) = p256_pair(1);
        let (sk_b, b) = p256_pair(2);
        let (_, c) = p256_pair(3);
        let payload = b"Cdata";
        let sig = sign_p256(&sk_b, HashAlg::Sha256, payload);

        for order in [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), b.clone(), a.clone()],
            vec![b.clone(), a.clone(), c.clone()],
        ] {
            let got = EcdsaVerifier
                .verify(payload, &sig, &order, SecurityContext::Secure)
                .unwrap();
            assert_eq!(got.name, "p256-2");
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let (sk, trusted) = p256_pair(5);
        let payload = b"Cstable";
        let sig = sign_p256(&sk, HashAlg::Sha256, payload);
        let keys = vec![trusted];
        let first = EcdsaVerifier
            .verify(payload, &sig, &keys, SecurityContext::Secure)
            .map(|k| k.name.clone());
        let second = EcdsaVerifier
            .verify(payload, &sig, &keys, SecurityContext::Secure)
            .map(|k| k.name.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn unimportable_candidate_is_skipped() {
        let (sk, good) = p256_pair(1);
        let mut broken = good.clone();
        broken.name = "broken".to_owned();
        broken.key.x = "///".to_owned();
        let payload = b"Cdata";
        let sig = sign_p256(&sk, HashAlg::Sha256, payload);
        let candidates = [broken, good];
        let got = EcdsaVerifier
            .verify(payload, &sig, &candidates, SecurityContext::Secure)
            .unwrap();
        assert_eq!(got.name, "p256-1");
    }

    #[test]
    fn zero_candidates_fail() {
        let err = EcdsaVerifier
            .verify(b"Cx", b"sig", &[], SecurityContext::Secure)
            .unwrap_err();
        assert_eq!(err, VerifyError::NoMatch);
    }

    #[test]
    fn empty_signature_fails() {
        let (_, trusted) = p256_pair(1);
        let err = EcdsaVerifier
            .verify(b"Cx", b"", &[trusted], SecurityContext::Secure)
            .unwrap_err();
        assert_eq!(err, VerifyError::NoMatch);
    }

    #[test]
    fn insecure_context_fails_closed() {
        let (sk, trusted) = p256_pair(1);
        let payload = b"Cdata";
        let sig = sign_p256(&sk, HashAlg::Sha256, payload);
        let err = EcdsaVerifier
            .verify(payload, &sig, &[trusted], SecurityContext::Insecure)
            .unwrap_err();
        assert_eq!(err, VerifyError::InsecureContext);
    }
}
