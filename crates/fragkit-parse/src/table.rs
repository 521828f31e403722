// crates/fragkit-parse/src/table.rs

//! Row and table materialization.
//!
//! A row phrase holds raw tokens; materialization drops the structural
//! tokens and unescapes quoted cells. Tables are built by fully draining
//! the parser, so a table is all-or-nothing: no partial tables exist.

use crate::dialect::{DelimScanner, Dialect, RowGrouper, TOKEN_CELL};
use crate::driver::parse;
use crate::phrase::Phrase;

/// The unquoted cell values of one line.
pub type Row = Vec<String>;

/// An ordered sequence of rows, with an optional header row split off.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Column titles, when the dialect's first-row-header flag was set.
    pub header: Option<Row>,
    /// Data rows.
    pub rows: Vec<Row>,
}

impl Table {
    /// Parse `input` under `dialect`, draining the lazy phrase sequence.
    ///
    /// Parsing never fails: malformed input degrades per the dialect's
    /// leniency rules rather than erroring.
    #[must_use]
    pub fn parse(input: &str, dialect: Dialect) -> Self {
        let mut rows: Vec<Row> = parse(input, DelimScanner::new(dialect.delimiter), RowGrouper)
            .map(|p| row_from_phrase(&p))
            .collect();
        let header = if dialect.first_row_header && !rows.is_empty() {
            Some(rows.remove(0))
        } else {
            None
        };
        Self { header, rows }
    }

    /// Serialize back to delimited text with RFC-4180 quoting.
    ///
    /// Cells containing the delimiter, a quote, or a line break are
    /// quoted; a row of a single empty cell is rendered as `""` so it
    /// does not collapse into a blank line. The output carries no
    /// trailing line terminator.
    #[must_use]
    pub fn render(&self, delimiter: char) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        if let Some(h) = &self.header {
            lines.push(render_row(h, delimiter));
        }
        for r in &self.rows {
            lines.push(render_row(r, delimiter));
        }
        lines.join("\n")
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Materialize a row phrase: keep cell tokens, unescape their text.
#[must_use]
pub fn row_from_phrase(p: &Phrase<'_>) -> Row {
    p.tokens
        .iter()
        .filter(|t| t.kind == TOKEN_CELL)
        .map(|t| unescape_cell(t.text))
        .collect()
}

/// Undo RFC-4180 quoting on one raw cell.
///
/// A cell starting with `"` has its surrounding quotes stripped and
/// internal `""` collapsed to `"`. An unterminated quoted cell (no
/// closing quote before end of input) is handled the same way.
#[must_use]
pub fn unescape_cell(raw: &str) -> String {
    let Some(stripped) = raw.strip_prefix('"') else {
        return raw.to_owned();
    };
    let inner = stripped.strip_suffix('"').unwrap_or(stripped);
    inner.replace("\"\"", "\"")
}

/// Apply RFC-4180 quoting to one cell value if it needs it.
#[must_use]
pub fn escape_cell(value: &str, delimiter: char) -> String {
    let needs_quoting = value.contains(delimiter)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quoting {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
        out
    } else {
        value.to_owned()
    }
}

fn render_row(row: &[String], delimiter: char) -> String {
    // A lone empty cell would render as a blank line, which parses back
    // as no row at all; quoting it keeps the row round-trippable.
    if let [only] = row {
        if only.is_empty() {
            return "\"\"".to_owned();
        }
    }
    row.iter()
        .map(|c| escape_cell(c, delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}
