//! The ordered list of symbol tokens a puzzle is built from.
//!
//! Index 0 is always the reserved "empty" symbol; every other index maps to
//! one caller-supplied token. Lookups run both directions because the board
//! works in indices internally but problems and solutions are read and
//! printed as tokens.

use std::collections::HashMap;

use crate::error::{Result, SolverError};

/// Bidirectional token <-> index mapping for one puzzle's symbol alphabet.
///
/// Index `0` is the empty symbol and has no token of its own; it prints as
/// whatever the caller configures for empty cells (callers of this crate
/// typically use `.`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    tokens: Vec<String>,
    index_of: HashMap<String, usize>,
}

impl Alphabet {
    /// Parses a whitespace-delimited list of tokens. The first token is
    /// reserved as a placeholder for "empty" (its text is unused — `problem`
    /// always treats index 0 as empty regardless of what's written here) and
    /// is not also a valid non-empty symbol.
    ///
    /// Fails if: the list is empty, a token contains a comma, or the same
    /// token appears twice.
    pub fn parse(spec: &str) -> Result<Alphabet> {
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(SolverError::configuration(
                "symbols: alphabet must contain at least an empty-symbol token",
            ));
        }
        for token in &tokens {
            if token.contains(',') {
                return Err(SolverError::configuration(format!(
                    "symbols: token {token:?} may not contain a comma"
                )));
            }
        }

        let mut index_of = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            if index_of.insert((*token).to_owned(), i).is_some() {
                return Err(SolverError::configuration(format!(
                    "symbols: duplicate token {token:?}"
                )));
            }
        }

        Ok(Alphabet {
            tokens: tokens.into_iter().map(str::to_owned).collect(),
            index_of,
        })
    }

    /// Number of symbols including the reserved empty symbol at index 0.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of non-empty symbols, i.e. the largest legal set size.
    pub fn num_symbols(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Looks up the internal index for a token, `None` for unknown tokens.
    /// The reserved empty token at index 0 is intentionally not
    /// addressable by this lookup — "empty" is represented by the absence
    /// of a recognized token, not by its literal text.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index_of.get(token).copied().filter(|&i| i != 0)
    }

    /// The display text for a symbol index, or `None` for the empty symbol
    /// (index 0) or an out-of-range index.
    pub fn token_of(&self, index: usize) -> Option<&str> {
        if index == 0 {
            None
        } else {
            self.tokens.get(index).map(String::as_str)
        }
    }

    /// True iff any alphabet token is more than one character long. Problem
    /// strings need an explicit delimiter whenever this holds (or when any
    /// allowed-symbol-set name is long — see
    /// [`crate::allowed::AllowedSymbolSets::needs_delimiter`]).
    pub fn needs_delimiter(&self) -> bool {
        self.tokens
            .iter()
            .skip(1)
            .any(|token| token.chars().count() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_char_digits() {
        let alphabet = Alphabet::parse(". 1 2 3 4 5 6 7 8 9").unwrap();
        assert_eq!(alphabet.len(), 10);
        assert_eq!(alphabet.num_symbols(), 9);
        assert_eq!(alphabet.index_of("5"), Some(5));
        assert_eq!(alphabet.token_of(5), Some("5"));
        assert_eq!(alphabet.token_of(0), None);
        assert!(!alphabet.needs_delimiter());
    }

    #[test]
    fn multi_char_tokens_need_delimiter() {
        let alphabet = Alphabet::parse(". 10 11 12").unwrap();
        assert!(alphabet.needs_delimiter());
    }

    #[test]
    fn rejects_comma_in_token() {
        assert!(Alphabet::parse(". a,b c").is_err());
    }

    #[test]
    fn rejects_duplicate_token() {
        assert!(Alphabet::parse(". a b a").is_err());
    }

    #[test]
    fn rejects_empty_spec() {
        assert!(Alphabet::parse("   ").is_err());
    }

    #[test]
    fn empty_token_not_addressable() {
        let alphabet = Alphabet::parse(". 1 2").unwrap();
        assert_eq!(alphabet.index_of("."), None);
    }
}
