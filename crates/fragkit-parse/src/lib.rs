// crates/fragkit-parse/src/lib.rs

//! fragkit-parse — incremental tokenizer/phraser framework + delimited text.
//!
//! Parsing happens in two resumable stages:
//! - a character-level [`Tokenizer`] driven by a [`TokenScanner`] state
//!   machine, producing typed [`Token`]s, and
//! - a token-level [`Phraser`] driven by a [`PhraseGrouper`], producing
//!   typed [`Phrase`]s (structural units such as table rows).
//!
//! [`parse`] wires both stages into a lazy, single-pass iterator of phrases;
//! a second pass over the same input is simply a new `parse` call. The
//! concrete CSV/TSV dialect (RFC-4180 quoting) lives in [`dialect`], and
//! [`table`] materializes phrases into unescaped rows.
//!
//! ```
//! use fragkit_parse::{Dialect, Table};
//!
//! let t = Table::parse("a,b\n\"c,d\",e", Dialect::csv());
//! assert_eq!(t.rows, vec![
//!     vec!["a".to_owned(), "b".to_owned()],
//!     vec!["c,d".to_owned(), "e".to_owned()],
//! ]);
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

/// Delimited-text (CSV/TSV) scanner and row grouper.
pub mod dialect;
/// Lazy parser driver combining tokenizer and phraser.
pub mod driver;
/// Token-level grouping stage.
pub mod phrase;
/// Row/table materialization and serialization.
pub mod table;
/// Character-level scanning stage.
pub mod token;

pub use dialect::{DelimScanner, Dialect, RowGrouper, PHRASE_ROW, TOKEN_CELL, TOKEN_DELIM, TOKEN_NL};
pub use driver::{parse, process_to_end, Phrases};
pub use phrase::{Phrase, PhraseGrouper, PhraseKind, Phraser};
pub use table::{escape_cell, row_from_phrase, unescape_cell, Row, Table};
pub use token::{Token, TokenKind, TokenScanner, Tokenizer, Tokens};

/// Commonly-used items for quick imports.
pub mod prelude {
    pub use crate::dialect::{DelimScanner, Dialect, RowGrouper};
    pub use crate::driver::{parse, process_to_end};
    pub use crate::phrase::{Phrase, Phraser};
    pub use crate::table::{Row, Table};
    pub use crate::token::{Token, Tokenizer};
}
