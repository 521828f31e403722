// crates/fragkit-core/src/content.rs

//! Content-type tag registry.
//!
//! Byte 0 of a decoded fragment is its type tag. Lowercase tags are the
//! plain variants; their uppercase counterparts mean "a detached
//! signature trails the payload". Verification status is carried
//! separately (see [`crate::pipeline::Trust`]) — the tag byte is never
//! rewritten to mark a payload as trusted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized fragment content types.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// `p` — plain text.
    Plain,
    /// `h` — HTML document.
    Html,
    /// `s` — SVG image.
    Svg,
    /// `m` — Markdown.
    Markdown,
    /// `b` — BBCode.
    Bbcode,
    /// `c` — comma-separated table.
    Csv,
    /// `t` — tab-separated table.
    Tsv,
    /// `d` — directory listing (tab-separated link table).
    Dir,
    /// `u` — URI list.
    Url,
    /// `x` — XML document.
    Xml,
}

/// All kinds, in tag order.
pub const ALL_KINDS: [ContentKind; 10] = [
    ContentKind::Plain,
    ContentKind::Html,
    ContentKind::Svg,
    ContentKind::Markdown,
    ContentKind::Bbcode,
    ContentKind::Csv,
    ContentKind::Tsv,
    ContentKind::Dir,
    ContentKind::Url,
    ContentKind::Xml,
];

impl ContentKind {
    /// Canonical (lowercase) tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Plain => b'p',
            Self::Html => b'h',
            Self::Svg => b's',
            Self::Markdown => b'm',
            Self::Bbcode => b'b',
            Self::Csv => b'c',
            Self::Tsv => b't',
            Self::Dir => b'd',
            Self::Url => b'u',
            Self::Xml => b'x',
        }
    }

    /// Tag byte for the signed variant of this kind.
    #[must_use]
    pub const fn signed_tag(self) -> u8 {
        self.tag().to_ascii_uppercase()
    }

    /// Look up a tag byte.
    ///
    /// Returns the kind and whether the tag is the signed (uppercase)
    /// variant; `None` for bytes outside the recognized set.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<(Self, bool)> {
        let kind = match tag.to_ascii_lowercase() {
            b'p' => Self::Plain,
            b'h' => Self::Html,
            b's' => Self::Svg,
            b'm' => Self::Markdown,
            b'b' => Self::Bbcode,
            b'c' => Self::Csv,
            b't' => Self::Tsv,
            b'd' => Self::Dir,
            b'u' => Self::Url,
            b'x' => Self::Xml,
            _ => return None,
        };
        Some((kind, tag.is_ascii_uppercase()))
    }

    /// MIME type the renderer dispatches on.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Html => "text/html",
            Self::Svg => "image/svg+xml",
            Self::Markdown => "text/markdown",
            Self::Bbcode => "text/x-bbcode",
            Self::Csv => "text/csv",
            Self::Tsv | Self::Dir => "text/tab-separated-values",
            Self::Url => "text/uri-list",
            Self::Xml => "application/xml",
        }
    }

    /// Whether the payload is delimited text destined for the table view.
    #[must_use]
    pub const fn is_tabular(self) -> bool {
        matches!(self, Self::Csv | Self::Tsv | Self::Dir)
    }

    /// Delimiter character for tabular kinds.
    #[must_use]
    pub const fn delimiter(self) -> Option<char> {
        match self {
            Self::Csv => Some(','),
            Self::Tsv | Self::Dir => Some('\t'),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Html => "html",
            Self::Svg => "svg",
            Self::Markdown => "markdown",
            Self::Bbcode => "bbcode",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Dir => "dir",
            Self::Url => "url",
            Self::Xml => "xml",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip_both_cases() {
        for kind in ALL_KINDS {
            assert_eq!(ContentKind::from_tag(kind.tag()), Some((kind, false)));
            assert_eq!(ContentKind::from_tag(kind.signed_tag()), Some((kind, true)));
        }
    }

    #[test]
    fn unknown_tags_rejected() {
        for tag in [b'z', b'0', b' ', 0u8, 0xFF] {
            assert_eq!(ContentKind::from_tag(tag), None);
        }
    }

    #[test]
    fn tabular_kinds_have_delimiters() {
        assert_eq!(ContentKind::Csv.delimiter(), Some(','));
        assert_eq!(ContentKind::Tsv.delimiter(), Some('\t'));
        assert_eq!(ContentKind::Dir.delimiter(), Some('\t'));
        assert_eq!(ContentKind::Html.delimiter(), None);
        assert!(ContentKind::Csv.is_tabular());
        assert!(!ContentKind::Plain.is_tabular());
    }
}
