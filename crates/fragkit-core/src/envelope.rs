// crates/fragkit-core/src/envelope.rs

//! Envelope trailer parsing.
//!
//! Signed fragments carry a detached signature in a fixed trailer: the
//! last 2 bytes are a big-endian unsigned signature length `L`, the `L`
//! bytes before them are the signature, and everything before that —
//! including the leading tag byte — is the signed payload. Unsigned
//! (lowercase-tag) fragments are all payload.

use crate::content::ContentKind;
use thiserror::Error;

/// Failure to split a raw buffer into payload and signature.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Zero-length fragment, rejected before dispatch.
    #[error("empty fragment")]
    Empty,
    /// Tag byte outside the recognized set, rejected before dispatch.
    #[error("unrecognized type tag 0x{0:02x}")]
    UnknownTag(u8),
    /// Declared signature length does not fit in the buffer.
    #[error("declared signature length {declared} exceeds {len}-byte buffer")]
    Truncated {
        /// Signature length from the trailer.
        declared: usize,
        /// Total buffer length.
        len: usize,
    },
}

/// A decoded fragment envelope, borrowing from the raw buffer.
///
/// Constructed once per incoming fragment; immutable after construction.
/// The input buffer is never modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Content type from the tag byte.
    pub kind: ContentKind,
    /// Whether the tag was the uppercase (signature-required) variant.
    pub requires_signature: bool,
    /// Signed region: the tag byte plus the content body.
    pub payload: &'a [u8],
    /// Detached signature, absent for unsigned tags.
    ///
    /// May be present but empty when the trailer declared `L == 0`;
    /// verification treats that the same as a missing required signature.
    pub signature: Option<&'a [u8]>,
}

impl<'a> Envelope<'a> {
    /// Split `raw` into payload and signature per the trailer format.
    pub fn decode(raw: &'a [u8]) -> Result<Self, EnvelopeError> {
        let (&tag, _) = raw.split_first().ok_or(EnvelopeError::Empty)?;
        let (kind, signed) =
            ContentKind::from_tag(tag).ok_or(EnvelopeError::UnknownTag(tag))?;

        if !signed {
            return Ok(Self {
                kind,
                requires_signature: false,
                payload: raw,
                signature: None,
            });
        }

        // tag byte + signature + 2-byte length must all fit.
        let trailer_at = raw
            .len()
            .checked_sub(2)
            .filter(|&at| at >= 1)
            .ok_or(EnvelopeError::Truncated {
                declared: 0,
                len: raw.len(),
            })?;
        let declared = usize::from(u16::from_be_bytes([raw[trailer_at], raw[trailer_at + 1]]));
        let sig_at = trailer_at
            .checked_sub(declared)
            .filter(|&at| at >= 1)
            .ok_or(EnvelopeError::Truncated {
                declared,
                len: raw.len(),
            })?;

        Ok(Self {
            kind,
            requires_signature: true,
            payload: &raw[..sig_at],
            signature: Some(&raw[sig_at..trailer_at]),
        })
    }

    /// The content body: the payload minus the leading tag byte.
    #[must_use]
    pub fn body(&self) -> &'a [u8] {
        &self.payload[1..]
    }
}

/// Frame a signed fragment: tag byte + body + signature + length trailer.
///
/// The authoring inverse of [`Envelope::decode`]. Returns `None` when the
/// signature does not fit the 16-bit length field.
pub fn frame_signed(kind: ContentKind, body: &[u8], signature: &[u8]) -> Option<Vec<u8>> {
    let len = u16::try_from(signature.len()).ok()?;
    let mut out = Vec::with_capacity(1 + body.len() + signature.len() + 2);
    out.push(kind.signed_tag());
    out.extend_from_slice(body);
    out.extend_from_slice(signature);
    out.extend_from_slice(&len.to_be_bytes());
    Some(out)
}

/// Frame an unsigned fragment: tag byte + body.
#[must_use]
pub fn frame_unsigned(kind: ContentKind, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(kind.tag());
    out.extend_from_slice(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_rejected() {
        assert_eq!(Envelope::decode(b""), Err(EnvelopeError::Empty));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(Envelope::decode(b"zabc"), Err(EnvelopeError::UnknownTag(b'z')));
    }

    #[test]
    fn unsigned_tag_is_all_payload() {
        let env = Envelope::decode(b"chello").unwrap();
        assert_eq!(env.kind, ContentKind::Csv);
        assert!(!env.requires_signature);
        assert_eq!(env.payload, b"chello");
        assert_eq!(env.body(), b"hello");
        assert_eq!(env.signature, None);
    }

    #[test]
    fn signed_tag_splits_trailer() {
        // payload "Chi", signature "SS", trailer 0x0002.
        let raw = b"ChiSS\x00\x02";
        let env = Envelope::decode(raw).unwrap();
        assert_eq!(env.kind, ContentKind::Csv);
        assert!(env.requires_signature);
        assert_eq!(env.payload, b"Chi");
        assert_eq!(env.body(), b"hi");
        assert_eq!(env.signature, Some(&b"SS"[..]));
    }

    #[test]
    fn zero_length_signature_is_present_but_empty() {
        let raw = b"Chi\x00\x00";
        let env = Envelope::decode(raw).unwrap();
        assert_eq!(env.payload, b"Chi");
        assert_eq!(env.signature, Some(&b""[..]));
    }

    #[test]
    fn oversized_declared_length_is_malformed() {
        // Declares a 300-byte signature in a 7-byte buffer.
        let raw = b"Chi??\x01\x2c";
        assert_eq!(
            Envelope::decode(raw),
            Err(EnvelopeError::Truncated {
                declared: 300,
                len: 7
            })
        );
    }

    #[test]
    fn signature_swallowing_tag_byte_is_malformed() {
        // L = len - 2 would leave no payload at all.
        let raw = b"C\x12\x34\x00\x03";
        assert_eq!(
            Envelope::decode(raw),
            Err(EnvelopeError::Truncated {
                declared: 3,
                len: 5
            })
        );
    }

    #[test]
    fn signed_tag_too_short_for_trailer() {
        assert!(matches!(
            Envelope::decode(b"C"),
            Err(EnvelopeError::Truncated { .. })
        ));
        assert!(matches!(
            Envelope::decode(b"C\x00"),
            Err(EnvelopeError::Truncated { .. })
        ));
    }

    #[test]
    fn frame_signed_roundtrip() {
        let raw = frame_signed(ContentKind::Tsv, b"a\tb", b"sig-bytes").unwrap();
        let env = Envelope::decode(&raw).unwrap();
        assert_eq!(env.kind, ContentKind::Tsv);
        assert_eq!(env.body(), b"a\tb");
        assert_eq!(env.signature, Some(&b"sig-bytes"[..]));
    }
}
