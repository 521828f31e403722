// crates/fragkit-core/src/pipeline.rs

//! Verification pipeline facade.
//!
//! Ties the envelope decoder to a pluggable [`SignatureVerifier`] and
//! produces a [`VerifiedFragment`] whose trust status is an explicit
//! field — the tag byte is never case-folded to mark a payload as
//! trusted. Rejections for "unsigned but required" and "signed but
//! unverifiable" are indistinguishable by design.

use crate::config::{Config, TrustedKey};
use crate::content::ContentKind;
use crate::envelope::Envelope;
use crate::error::{FragmentError, VerifyError};
use tracing::debug;

/// Whether the surrounding execution context is trustworthy.
///
/// An insecure context makes every verification fail closed, regardless
/// of signature or key validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityContext {
    /// Cryptographic verification is meaningful here.
    Secure,
    /// Verification must reject, never silently skip.
    Insecure,
}

/// Explicit trust status of a decoded fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trust {
    /// A trusted key validated the detached signature.
    Signed {
        /// Name of the matching trust-store entry.
        key_name: String,
    },
    /// No signature was required and none was checked.
    Unsigned,
}

/// A fragment that passed envelope decoding and trust checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedFragment {
    /// Content type from the tag byte.
    pub kind: ContentKind,
    /// How the fragment came to be trusted.
    pub trust: Trust,
    /// Content body (tag byte excluded).
    pub body: Vec<u8>,
}

/// Seam for the signature backend.
///
/// Implementations try each candidate key and return the first that
/// validates `signature` over `payload`; attempts are pure, so losers
/// are harmless. An empty candidate set fails with
/// [`VerifyError::NoMatch`].
pub trait SignatureVerifier {
    /// Find a candidate key that validates the signature.
    fn verify<'k>(
        &self,
        payload: &[u8],
        signature: &[u8],
        candidates: &'k [TrustedKey],
        ctx: SecurityContext,
    ) -> Result<&'k TrustedKey, VerifyError>;
}

/// Decode and trust-check one raw fragment buffer.
///
/// The single entry point renderers consume: either a fully verified
/// fragment comes back, or a typed failure — never a partially trusted
/// payload.
pub fn decode_fragment<V: SignatureVerifier>(
    raw: &[u8],
    config: &Config,
    ctx: SecurityContext,
    verifier: &V,
) -> Result<VerifiedFragment, FragmentError> {
    let env = Envelope::decode(raw)?;
    debug!(
        kind = %env.kind,
        signed = env.requires_signature,
        len = raw.len(),
        "decoded envelope"
    );

    let trust = match env.signature {
        Some(sig) => {
            let key = verifier.verify(env.payload, sig, &config.keys, ctx)?;
            debug!(key = %key.name, "signature verified");
            Trust::Signed {
                key_name: key.name.clone(),
            }
        }
        None if config.allow_unsigned => Trust::Unsigned,
        None => return Err(VerifyError::NoMatch.into()),
    };

    Ok(VerifiedFragment {
        kind: env.kind,
        trust,
        body: env.body().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Curve, HashAlg, Jwk, TrustedKey};

    fn key(name: &str) -> TrustedKey {
        TrustedKey {
            name: name.to_owned(),
            hash: HashAlg::Sha256,
            key: Jwk {
                kty: "EC".to_owned(),
                crv: Curve::P256,
                x: String::new(),
                y: String::new(),
                alg: None,
                ext: None,
                key_ops: vec!["verify".to_owned()],
            },
        }
    }

    /// Accepts iff the signature equals a fixed byte string; honors the
    /// fail-closed rule like a real backend must.
    struct StubVerifier(&'static [u8]);

    impl SignatureVerifier for StubVerifier {
        fn verify<'k>(
            &self,
            _payload: &[u8],
            signature: &[u8],
            candidates: &'k [TrustedKey],
            ctx: SecurityContext,
        ) -> Result<&'k TrustedKey, VerifyError> {
            if ctx == SecurityContext::Insecure {
                return Err(VerifyError::InsecureContext);
            }
            if signature == self.0 {
                candidates.first().ok_or(VerifyError::NoMatch)
            } else {
                Err(VerifyError::NoMatch)
            }
        }
    }

    fn trusting() -> Config {
        Config {
            allow_unsigned: false,
            keys: vec![key("k1")],
        }
    }

    #[test]
    fn signed_fragment_reports_key_name() {
        let raw = b"Ca,b\x01\x02\x03\x00\x03";
        let got = decode_fragment(
            raw,
            &trusting(),
            SecurityContext::Secure,
            &StubVerifier(b"\x01\x02\x03"),
        )
        .unwrap();
        assert_eq!(got.kind, ContentKind::Csv);
        assert_eq!(
            got.trust,
            Trust::Signed {
                key_name: "k1".to_owned()
            }
        );
        assert_eq!(got.body, b"a,b");
    }

    #[test]
    fn bad_signature_is_rejected() {
        let raw = b"Ca,b\xFF\xFF\xFF\x00\x03";
        let err = decode_fragment(
            raw,
            &trusting(),
            SecurityContext::Secure,
            &StubVerifier(b"\x01\x02\x03"),
        )
        .unwrap_err();
        assert_eq!(err, FragmentError::Verification(VerifyError::NoMatch));
    }

    #[test]
    fn unsigned_rejected_unless_allowed() {
        let raw = b"ca,b";
        let verifier = StubVerifier(b"");
        let strict = trusting();
        let err =
            decode_fragment(raw, &strict, SecurityContext::Secure, &verifier).unwrap_err();
        assert_eq!(err, FragmentError::Verification(VerifyError::NoMatch));

        let lax = Config {
            allow_unsigned: true,
            ..strict
        };
        let got = decode_fragment(raw, &lax, SecurityContext::Secure, &verifier).unwrap();
        assert_eq!(got.trust, Trust::Unsigned);
    }

    #[test]
    fn insecure_context_fails_closed_even_for_good_signature() {
        let raw = b"Ca,b\x01\x02\x03\x00\x03";
        let err = decode_fragment(
            raw,
            &trusting(),
            SecurityContext::Insecure,
            &StubVerifier(b"\x01\x02\x03"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            FragmentError::Verification(VerifyError::InsecureContext)
        );
    }

    #[test]
    fn unsigned_rejection_matches_bad_signature_rejection() {
        // No oracle: both failure paths surface the identical kind.
        let verifier = StubVerifier(b"\x01");
        let strict = trusting();
        let unsigned =
            decode_fragment(b"ca,b", &strict, SecurityContext::Secure, &verifier).unwrap_err();
        let badsig = decode_fragment(
            b"Ca,b\xFF\x00\x01",
            &strict,
            SecurityContext::Secure,
            &verifier,
        )
        .unwrap_err();
        assert_eq!(unsigned, badsig);
    }
}
