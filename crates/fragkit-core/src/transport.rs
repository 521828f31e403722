// crates/fragkit-core/src/transport.rs

//! URL-fragment transport codec.
//!
//! Fragments travel inside a URL hash as base64 over raw-deflate
//! (`DecompressionStream("deflate-raw")` on the consuming side), so the
//! codec here is `base64(deflate_raw(bytes))` and its inverse.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Decode a URL-hash fragment string into raw envelope bytes.
pub fn decode(fragment: &str) -> Result<Vec<u8>> {
    let compressed = STANDARD
        .decode(fragment.trim())
        .context("base64-decode fragment")?;
    let mut out = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut out)
        .context("inflate fragment")?;
    Ok(out)
}

/// Encode raw envelope bytes into a URL-hash fragment string.
pub fn encode(bytes: &[u8]) -> Result<String> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::best());
    enc.write_all(bytes).context("deflate fragment")?;
    let compressed = enc.finish().context("finish deflate stream")?;
    Ok(STANDARD.encode(compressed))
}
