//! Named per-cell symbol restrictions ("allowed-symbol sets").
//!
//! A puzzle like odd/even Sudoku tags some givens-free cells with a name
//! (`o`, `e`, ...) instead of a value; that name restricts which symbols may
//! ever be placed there. Each name maps to a bitmask over the alphabet's
//! non-empty symbols, stored as a `bitvec::vec::BitVec` so alphabets bigger
//! than a machine word don't force a wider integer type.

use std::collections::BTreeMap;

use bitvec::prelude::*;

use crate::alphabet::Alphabet;
use crate::error::{Result, SolverError};

/// A collection of named symbol masks, keyed by name and kept in sorted
/// order so iteration (and therefore `needs_delimiter`, and any serialized
/// form) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedSymbolSets {
    masks: BTreeMap<String, BitVec>,
}

impl AllowedSymbolSets {
    pub fn new() -> AllowedSymbolSets {
        AllowedSymbolSets {
            masks: BTreeMap::new(),
        }
    }

    /// Applies a configuration value of the form described in §6.1:
    /// newline-separated `name=tok,tok,...` entries. An entry with an empty
    /// right-hand side deletes that name. A wholly blank value clears every
    /// allowed-symbol set.
    pub fn configure(&mut self, spec: &str, alphabet: &Alphabet) -> Result<()> {
        if spec.trim().is_empty() {
            self.masks.clear();
            return Ok(());
        }

        // Validate every line before mutating so a bad line leaves
        // previously-applied configuration untouched.
        let mut pending: Vec<(String, Option<BitVec>)> = Vec::new();
        for line in spec.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (name, rhs) = line.split_once('=').ok_or_else(|| {
                SolverError::configuration(format!(
                    "allowed_symbols: expected `name=tok,tok,...`, got {line:?}"
                ))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SolverError::configuration(
                    "allowed_symbols: empty set name",
                ));
            }
            if alphabet.index_of(name).is_some() {
                return Err(SolverError::configuration(format!(
                    "allowed_symbols: name {name:?} collides with an alphabet token"
                )));
            }

            let rhs = rhs.trim();
            if rhs.is_empty() {
                pending.push((name.to_owned(), None));
                continue;
            }

            let mut mask = bitvec![0; alphabet.len()];
            for tok in rhs.split(',') {
                let tok = tok.trim();
                let index = alphabet.index_of(tok).ok_or_else(|| {
                    SolverError::configuration(format!(
                        "allowed_symbols: unknown symbol {tok:?} in set {name:?}"
                    ))
                })?;
                mask.set(index, true);
            }
            pending.push((name.to_owned(), Some(mask)));
        }

        for (name, mask) in pending {
            match mask {
                Some(mask) => {
                    self.masks.insert(name, mask);
                }
                None => {
                    self.masks.remove(&name);
                }
            }
        }
        Ok(())
    }

    /// The mask for a named allowed-symbol set, if it exists.
    pub fn mask_of(&self, name: &str) -> Option<&BitSlice> {
        self.masks.get(name).map(|m| m.as_bitslice())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.masks.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// True iff any configured name is more than one character long.
    pub fn needs_delimiter(&self) -> bool {
        self.masks.keys().any(|name| name.chars().count() > 1)
    }
}
