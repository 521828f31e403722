// crates/fragkit-parse/src/phrase.rs

//! Token-level grouping stage.
//!
//! Mirrors the character stage one level up: a [`Phraser`] is a cursor
//! over a token sequence with one-token lookahead and a buffered span,
//! and a [`PhraseGrouper`] is the state machine that commits buffered
//! spans as [`Phrase`]s.

use crate::token::{Token, TokenKind};

/// Integer tag classifying a phrase. Dialects define their own constants.
pub type PhraseKind = i32;

/// A grouped run of tokens representing one structural unit.
///
/// A phrase owns its tokens; tokens are never shared across phrases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase<'a> {
    /// Dialect-defined kind tag.
    pub kind: PhraseKind,
    /// Tokens covered by this phrase, in input order.
    pub tokens: Vec<Token<'a>>,
}

/// Cursor over a token sequence with lookahead and a pending span.
///
/// Tokens consumed via [`Phraser::next_token`] accumulate in an internal
/// buffer until committed with [`Phraser::phrase`] (or discarded with
/// [`Phraser::get`]).
#[derive(Debug)]
pub struct Phraser<'a, I: Iterator<Item = Token<'a>>> {
    tokens: I,
    peeked: Option<Token<'a>>,
    buf: Vec<Token<'a>>,
    done: bool,
}

impl<'a, I: Iterator<Item = Token<'a>>> Phraser<'a, I> {
    /// Wrap a token sequence.
    pub const fn new(tokens: I) -> Self {
        Self {
            tokens,
            peeked: None,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Next token without advancing.
    pub fn peek(&mut self) -> Option<Token<'a>> {
        if self.peeked.is_none() && !self.done {
            self.peeked = self.tokens.next();
            if self.peeked.is_none() {
                self.done = true;
            }
        }
        self.peeked
    }

    /// Advance to the next token, adding it to the pending span.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let t = self.peek()?;
        self.peeked = None;
        self.buf.push(t);
        Some(t)
    }

    /// Advance until a token whose kind is in `kinds` is next, or the
    /// sequence ends.
    ///
    /// Returns the stopping kind (the token itself is not consumed), or
    /// `None` at end of stream.
    pub fn except_run(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        loop {
            match self.peek() {
                None => return None,
                Some(t) if kinds.contains(&t.kind) => return Some(t.kind),
                Some(_) => {
                    self.next_token();
                }
            }
        }
    }

    /// Return and clear the pending token span.
    pub fn get(&mut self) -> Vec<Token<'a>> {
        std::mem::take(&mut self.buf)
    }

    /// Commit the pending span as a phrase of `kind`.
    pub fn phrase(&mut self, kind: PhraseKind) -> Phrase<'a> {
        Phrase {
            kind,
            tokens: self.get(),
        }
    }
}

/// Resumable grouping state machine for one dialect.
pub trait PhraseGrouper {
    /// Produce the next phrase, or `None` at end of stream.
    fn group<'a, I: Iterator<Item = Token<'a>>>(
        &mut self,
        ph: &mut Phraser<'a, I>,
    ) -> Option<Phrase<'a>>;
}
