// crates/fragkit-parse/src/token.rs

//! Character-level scanning stage.
//!
//! A [`Tokenizer`] is a cursor over one immutable input string plus a
//! pending-slice marker. A dialect supplies a [`TokenScanner`], a small
//! state machine whose `scan` step classifies the next run of characters
//! and emits one [`Token`]; [`Tokens`] adapts the pair into an iterator.
//!
//! There is no tokenizer-level error: the only terminal condition is
//! stream exhaustion, and malformed input degrades to "rest of the input
//! is one token".

/// Integer tag classifying a token. Dialects define their own constants.
pub type TokenKind = i32;

/// One scanned unit: a kind, the raw text slice, and its byte offset.
///
/// Tokens borrow from the input string and are immutable once emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Dialect-defined kind tag.
    pub kind: TokenKind,
    /// Raw slice of the input covered by this token.
    pub text: &'a str,
    /// Byte offset of `text` within the input.
    pub pos: usize,
}

/// Cursor over an input string with a pending-slice start marker.
///
/// Invariant: `start <= pos <= input.len()`, maintained by construction
/// (the cursor only ever moves forward, and [`Tokenizer::get`] advances
/// `start` to the cursor).
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Wrap an input string with the cursor at the beginning.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
        }
    }

    /// Next character without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance past and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advance iff the next character is a member of `set`.
    pub fn accept(&mut self, set: &str) -> bool {
        match self.peek() {
            Some(c) if set.contains(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Advance until a character in `set` is encountered or input ends.
    ///
    /// Returns the stopping character (not consumed), or `None` at end of
    /// input.
    pub fn except_run(&mut self, set: &str) -> Option<char> {
        while let Some(c) = self.peek() {
            if set.contains(c) {
                return Some(c);
            }
            self.pos += c.len_utf8();
        }
        None
    }

    /// The pending slice (from the last commit point to the cursor).
    #[must_use]
    pub fn pending(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Return and clear the pending slice.
    pub fn get(&mut self) -> &'a str {
        let s = &self.input[self.start..self.pos];
        self.start = self.pos;
        s
    }

    /// Commit the pending slice as a token of `kind`.
    pub fn token(&mut self, kind: TokenKind) -> Token<'a> {
        let pos = self.start;
        Token {
            kind,
            text: self.get(),
            pos,
        }
    }

    /// Whether the cursor has reached the end of the input.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }
}

/// Resumable scanning state machine for one dialect.
///
/// Each `scan` call classifies the next run of characters and emits one
/// token; `None` signals end of stream. Context sensitivity ("are we
/// inside a quoted cell") lives in the scanner's own state, selected by
/// the previous step.
pub trait TokenScanner {
    /// Produce the next token, or `None` at end of input.
    fn scan<'a>(&mut self, tk: &mut Tokenizer<'a>) -> Option<Token<'a>>;
}

/// Iterator adapter driving a [`TokenScanner`] over a [`Tokenizer`].
///
/// Fused: once the scanner reports end of stream no further tokens are
/// produced.
#[derive(Debug)]
pub struct Tokens<'a, S> {
    tk: Tokenizer<'a>,
    scanner: S,
    done: bool,
}

impl<'a, S: TokenScanner> Tokens<'a, S> {
    /// Bind a scanner to fresh tokenizer state over `input`.
    #[must_use]
    pub const fn new(input: &'a str, scanner: S) -> Self {
        Self {
            tk: Tokenizer::new(input),
            scanner,
            done: false,
        }
    }
}

impl<'a, S: TokenScanner> Iterator for Tokens<'a, S> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let t = self.scanner.scan(&mut self.tk);
        if t.is_none() {
            self.done = true;
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut tk = Tokenizer::new("abc");
        assert_eq!(tk.peek(), Some('a'));
        assert_eq!(tk.next_char(), Some('a'));
        assert!(tk.accept("b"));
        assert!(!tk.accept("z"));
        assert_eq!(tk.get(), "ab");
        assert_eq!(tk.next_char(), Some('c'));
        assert_eq!(tk.get(), "c");
        assert!(tk.is_done());
        assert_eq!(tk.next_char(), None);
    }

    #[test]
    fn except_run_stops_before_member() {
        let mut tk = Tokenizer::new("hello,world");
        assert_eq!(tk.except_run(","), Some(','));
        assert_eq!(tk.get(), "hello");
        // The stopping character was not consumed.
        assert_eq!(tk.peek(), Some(','));
    }

    #[test]
    fn except_run_to_end() {
        let mut tk = Tokenizer::new("no delimiters here");
        assert_eq!(tk.except_run(","), None);
        assert_eq!(tk.get(), "no delimiters here");
        assert!(tk.is_done());
    }

    #[test]
    fn multibyte_input() {
        let mut tk = Tokenizer::new("héllo,wörld");
        assert_eq!(tk.except_run(","), Some(','));
        assert_eq!(tk.get(), "héllo");
        assert!(tk.accept(","));
        assert_eq!(tk.except_run(","), None);
        let t = tk.token(7);
        assert_eq!(t.text, ",wörld");
        assert_eq!(t.pos, 6);
    }
}
