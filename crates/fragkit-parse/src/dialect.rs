// crates/fragkit-parse/src/dialect.rs

//! Delimited-text dialect: CSV/TSV cell and row semantics.
//!
//! CSV and TSV differ only in the delimiter character. Quoting follows
//! RFC 4180: a cell starting with `"` runs to the next `"` not doubled,
//! with `""` meaning a literal quote; delimiters and newlines inside a
//! quoted run belong to the cell. An unterminated quote at end of input
//! closes the cell there — leniency, never an error.

use crate::phrase::{Phrase, PhraseGrouper, PhraseKind, Phraser};
use crate::token::{Token, TokenKind, TokenScanner, Tokenizer};

/// A cell's raw text (quotes included for quoted cells).
pub const TOKEN_CELL: TokenKind = 1;
/// A single delimiter character.
pub const TOKEN_DELIM: TokenKind = 2;
/// A line terminator (`\n`, `\r\n`, or bare `\r`).
pub const TOKEN_NL: TokenKind = 3;

/// One table row.
pub const PHRASE_ROW: PhraseKind = 1;

/// Dialect selector: delimiter plus the header flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Cell delimiter (`,` for CSV, `\t` for TSV).
    pub delimiter: char,
    /// Whether the first row is column titles rather than data.
    pub first_row_header: bool,
}

impl Dialect {
    /// Comma-separated values, no header row.
    #[must_use]
    pub const fn csv() -> Self {
        Self {
            delimiter: ',',
            first_row_header: false,
        }
    }

    /// Tab-separated values, no header row.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            first_row_header: false,
        }
    }

    /// Same dialect with the first row treated as column titles.
    #[must_use]
    pub const fn with_header(mut self) -> Self {
        self.first_row_header = true;
        self
    }
}

/// Where the scanner is within a line.
///
/// `LineStart` and `CellStart` both expect a cell next; the distinction
/// is what end-of-input means there (nothing pending vs. a final empty
/// cell after a delimiter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    LineStart,
    CellStart,
    AfterCell,
}

/// Cell scanner for one delimiter choice.
#[derive(Debug)]
pub struct DelimScanner {
    delim: char,
    /// Characters that end an unquoted run: the delimiter and line ends.
    stop_set: String,
    state: ScanState,
}

impl DelimScanner {
    /// Scanner for the given delimiter character.
    #[must_use]
    pub fn new(delim: char) -> Self {
        let mut stop_set = String::with_capacity(6);
        stop_set.push(delim);
        stop_set.push('\r');
        stop_set.push('\n');
        Self {
            delim,
            stop_set,
            state: ScanState::LineStart,
        }
    }

    fn scan_cell<'a>(&mut self, tk: &mut Tokenizer<'a>) -> Option<Token<'a>> {
        match tk.peek() {
            None => {
                if self.state == ScanState::LineStart {
                    // Clean end: no pending cells on this line.
                    return None;
                }
                // Input ended on a delimiter; the final cell is empty.
                self.state = ScanState::AfterCell;
                Some(tk.token(TOKEN_CELL))
            }
            Some('\r' | '\n') if self.state == ScanState::LineStart => {
                // Blank line: no cell to emit, hand over to the separator
                // state so the newline becomes a structural token.
                self.scan_sep(tk)
            }
            Some('"') => {
                tk.next_char();
                loop {
                    tk.except_run("\"");
                    if !tk.accept("\"") {
                        // End of input inside the quotes: close the cell.
                        break;
                    }
                    if !tk.accept("\"") {
                        // Lone quote terminates; a doubled one continues.
                        break;
                    }
                }
                self.state = ScanState::AfterCell;
                Some(tk.token(TOKEN_CELL))
            }
            Some(_) => {
                tk.except_run(&self.stop_set);
                self.state = ScanState::AfterCell;
                Some(tk.token(TOKEN_CELL))
            }
        }
    }

    fn scan_sep<'a>(&mut self, tk: &mut Tokenizer<'a>) -> Option<Token<'a>> {
        match tk.peek() {
            None => None,
            Some(c) if c == self.delim => {
                tk.next_char();
                self.state = ScanState::CellStart;
                Some(tk.token(TOKEN_DELIM))
            }
            Some('\r' | '\n') => {
                // `\r\n` is one terminator; a bare `\r` or `\n` also is.
                tk.accept("\r");
                tk.accept("\n");
                self.state = ScanState::LineStart;
                Some(tk.token(TOKEN_NL))
            }
            Some(_) => {
                // Stray text after a quoted cell; absorb it as another
                // cell rather than failing.
                tk.except_run(&self.stop_set);
                Some(tk.token(TOKEN_CELL))
            }
        }
    }
}

impl TokenScanner for DelimScanner {
    fn scan<'a>(&mut self, tk: &mut Tokenizer<'a>) -> Option<Token<'a>> {
        match self.state {
            ScanState::LineStart | ScanState::CellStart => self.scan_cell(tk),
            ScanState::AfterCell => self.scan_sep(tk),
        }
    }
}

/// Groups a run of cell/delimiter tokens plus a newline into one row.
///
/// A degenerate final row with no trailing newline is still emitted; a
/// newline span containing no cells (blank line, trailing terminator)
/// produces no row at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct RowGrouper;

impl PhraseGrouper for RowGrouper {
    fn group<'a, I: Iterator<Item = Token<'a>>>(
        &mut self,
        ph: &mut Phraser<'a, I>,
    ) -> Option<Phrase<'a>> {
        loop {
            match ph.next_token() {
                None => {
                    let p = ph.phrase(PHRASE_ROW);
                    if p.tokens.iter().any(|t| t.kind == TOKEN_CELL) {
                        return Some(p);
                    }
                    return None;
                }
                Some(t) if t.kind == TOKEN_NL => {
                    let p = ph.phrase(PHRASE_ROW);
                    if p.tokens.iter().any(|t| t.kind == TOKEN_CELL) {
                        return Some(p);
                    }
                    // Cell-less span: discard and keep grouping.
                }
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{parse, process_to_end};

    fn kinds(input: &str, delim: char) -> Vec<TokenKind> {
        let mut sc = DelimScanner::new(delim);
        let mut tk = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(t) = sc.scan(&mut tk) {
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn token_shape_simple() {
        assert_eq!(
            kinds("a,b\nc", ','),
            vec![TOKEN_CELL, TOKEN_DELIM, TOKEN_CELL, TOKEN_NL, TOKEN_CELL]
        );
    }

    #[test]
    fn empty_cells_are_tokens() {
        // ",a," is three cells: "", "a", "".
        assert_eq!(
            kinds(",a,", ','),
            vec![TOKEN_CELL, TOKEN_DELIM, TOKEN_CELL, TOKEN_DELIM, TOKEN_CELL]
        );
    }

    #[test]
    fn quoted_cell_swallows_delimiters() {
        let mut sc = DelimScanner::new(',');
        let mut tk = Tokenizer::new("\"a,b\",c");
        let t = sc.scan(&mut tk).unwrap();
        assert_eq!(t.kind, TOKEN_CELL);
        assert_eq!(t.text, "\"a,b\"");
    }

    #[test]
    fn doubled_quote_stays_in_cell() {
        let mut sc = DelimScanner::new(',');
        let mut tk = Tokenizer::new("\"a\"\"b\",c");
        let t = sc.scan(&mut tk).unwrap();
        assert_eq!(t.text, "\"a\"\"b\"");
        assert_eq!(sc.scan(&mut tk).unwrap().kind, TOKEN_DELIM);
        assert_eq!(sc.scan(&mut tk).unwrap().text, "c");
    }

    #[test]
    fn unterminated_quote_is_lenient() {
        let mut sc = DelimScanner::new(',');
        let mut tk = Tokenizer::new("\"a,b\nrest");
        let t = sc.scan(&mut tk).unwrap();
        assert_eq!(t.kind, TOKEN_CELL);
        // Everything to end of input is one cell.
        assert_eq!(t.text, "\"a,b\nrest");
        assert_eq!(sc.scan(&mut tk), None);
    }

    #[test]
    fn crlf_is_one_newline_token() {
        assert_eq!(
            kinds("a\r\nb", ','),
            vec![TOKEN_CELL, TOKEN_NL, TOKEN_CELL]
        );
    }

    #[test]
    fn tab_dialect() {
        assert_eq!(
            kinds("a\tb", '\t'),
            vec![TOKEN_CELL, TOKEN_DELIM, TOKEN_CELL]
        );
        // A comma is ordinary cell text in TSV.
        assert_eq!(kinds("a,b", '\t'), vec![TOKEN_CELL]);
    }

    #[test]
    fn rows_group_on_newlines() {
        let rows = process_to_end(parse("a,b\nc,d", DelimScanner::new(','), RowGrouper));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.kind == PHRASE_ROW));
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        let cells = |input: &str| -> Vec<Vec<String>> {
            process_to_end(parse(input, DelimScanner::new(','), RowGrouper))
                .iter()
                .map(|p| {
                    p.tokens
                        .iter()
                        .filter(|t| t.kind == TOKEN_CELL)
                        .map(|t| t.text.to_owned())
                        .collect()
                })
                .collect()
        };
        assert_eq!(cells("a,b\nc,d\n"), cells("a,b\nc,d"));
        assert_eq!(cells("a,b\nc,d\n").len(), 2);
    }

    #[test]
    fn blank_lines_add_no_rows() {
        let rows = process_to_end(parse("a\n\n\nb", DelimScanner::new(','), RowGrouper));
        assert_eq!(rows.len(), 2);
    }
}
