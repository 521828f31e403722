// crates/fragkit-core/src/error.rs

//! Typed error taxonomy.
//!
//! Every failure the core can surface to a renderer is one of these
//! kinds; the core's contract is to distinguish the kinds, not to format
//! them for humans. Verification failures stay deliberately opaque — no
//! variant records which candidate key came close (no oracle behavior).

use crate::envelope::EnvelopeError;
use thiserror::Error;

/// Signature verification failure.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The execution context is not secure; verification fails closed.
    #[error("verification requires a secure context")]
    InsecureContext,
    /// No trusted key validated the signature (including the zero-key
    /// and missing-required-signature cases).
    #[error("signature did not match any trusted key")]
    NoMatch,
}

/// Any failure between raw fragment bytes and a verified payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    /// Malformed, empty, or unrecognized envelope.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// Signature required but absent, invalid, or unverifiable.
    #[error(transparent)]
    Verification(#[from] VerifyError),
}
