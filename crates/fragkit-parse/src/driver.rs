// crates/fragkit-parse/src/driver.rs

//! Lazy parser driver.
//!
//! [`parse`] binds fresh tokenizer/phraser state to one input string and
//! returns [`Phrases`], a pull-based iterator that produces one phrase at
//! a time. Stopping early simply stops driving the state machines; a
//! second pass is a new `parse` call over the same (immutable) input.

use crate::phrase::{Phrase, PhraseGrouper, Phraser};
use crate::token::{TokenScanner, Tokens};

/// Lazy, single-pass sequence of phrases over one input string.
///
/// Fused after the grouper reports end of stream.
#[derive(Debug)]
pub struct Phrases<'a, S: TokenScanner, G> {
    phraser: Phraser<'a, Tokens<'a, S>>,
    grouper: G,
    done: bool,
}

impl<'a, S: TokenScanner, G: PhraseGrouper> Iterator for Phrases<'a, S, G> {
    type Item = Phrase<'a>;

    fn next(&mut self) -> Option<Phrase<'a>> {
        if self.done {
            return None;
        }
        let p = self.grouper.group(&mut self.phraser);
        if p.is_none() {
            self.done = true;
        }
        p
    }
}

/// Drive `scanner` and `grouper` over `input`, yielding phrases lazily.
pub fn parse<'a, S: TokenScanner, G: PhraseGrouper>(
    input: &'a str,
    scanner: S,
    grouper: G,
) -> Phrases<'a, S, G> {
    Phrases {
        phraser: Phraser::new(Tokens::new(input, scanner)),
        grouper,
        done: false,
    }
}

/// Eagerly drain a phrase sequence into a concrete list.
///
/// Use when downstream needs random access rather than incremental
/// consumption.
pub fn process_to_end<'a>(seq: impl Iterator<Item = Phrase<'a>>) -> Vec<Phrase<'a>> {
    seq.collect()
}
