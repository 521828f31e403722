// crates/fragkit-core/src/lib.rs

//! fragkit-core — the fragment envelope protocol and its surroundings.
//!
//! This crate defines the **stable boundary** used across fragkit crates:
//! - the content-type registry ([`ContentKind`]: tag byte ↔ kind/MIME),
//! - the envelope trailer codec ([`Envelope`]: payload vs. detached
//!   signature),
//! - the trust-store configuration model ([`Config`], [`TrustedKey`]),
//! - the URL-fragment transport codec (base64 + raw deflate), and
//! - the verification pipeline facade ([`decode_fragment`]), generic over
//!   a [`SignatureVerifier`] so the crypto backend stays pluggable.
//!
//! ```
//! use fragkit_core::{ContentKind, Envelope};
//!
//! let env = Envelope::decode(b"ph1,h2").unwrap();
//! assert_eq!(env.kind, ContentKind::Plain);
//! assert!(env.signature.is_none());
//! assert_eq!(env.body(), b"h1,h2");
//! ```

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

/// Trust-store configuration (the `config.json` shape).
pub mod config;
/// Content-type tag registry.
pub mod content;
/// Envelope trailer parsing.
pub mod envelope;
/// Typed error taxonomy shared across the pipeline.
pub mod error;
/// Verification pipeline facade.
pub mod pipeline;
/// URL-fragment transport codec (base64 + raw deflate).
pub mod transport;

pub use config::{Config, Curve, HashAlg, Jwk, TrustedKey};
pub use content::ContentKind;
pub use envelope::{Envelope, EnvelopeError};
pub use error::{FragmentError, VerifyError};
pub use pipeline::{decode_fragment, SecurityContext, SignatureVerifier, Trust, VerifiedFragment};

/// Commonly-used items for quick imports.
pub mod prelude {
    pub use crate::config::{Config, TrustedKey};
    pub use crate::content::ContentKind;
    pub use crate::envelope::Envelope;
    pub use crate::error::{FragmentError, VerifyError};
    pub use crate::pipeline::{decode_fragment, SecurityContext, Trust, VerifiedFragment};
}
