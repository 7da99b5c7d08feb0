use itertools::Itertools;

use crate::{math::Bijection, Show};

/// The position of a symbol in an [`Alphabet`].
pub type SymbolIndex = usize;

/// Represents an alphabet, which is an ordered collection of distinct symbols. Each symbol is a
/// [`String`] and it is identified by its position in the alphabet, the [`SymbolIndex`]. The order
/// of the symbols is the order in which they were inserted, it only determines the order in which
/// transitions are iterated and has no further meaning.
///
/// # Example
/// ```
/// use dfamin::prelude::*;
///
/// let alphabet = Alphabet::from_iter(["zero", "one", "zero"]);
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.position("one"), Some(1));
/// assert_eq!(alphabet.symbol(0), Some("zero"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Alphabet(Bijection<SymbolIndex, String>);

impl Alphabet {
    /// Creates a new [`Alphabet`] of the given size. The symbols are the first `size` letters
    /// of the latin alphabet, i.e. 'a' to 'z'. For larger sizes, the remaining symbols are
    /// numbered, so the symbol at position 30 is `s30`.
    pub fn of_size(size: usize) -> Self {
        Self::from_iter((0..size).map(|i| {
            if i < 26 {
                ((b'a' + i as u8) as char).to_string()
            } else {
                format!("s{i}")
            }
        }))
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if and only if the alphabet contains no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the given symbol to the end of the alphabet and returns its position. If the symbol
    /// is already present, nothing is changed and its existing position is returned.
    pub fn push<S: Into<String>>(&mut self, symbol: S) -> SymbolIndex {
        let symbol = symbol.into();
        if let Some(position) = self.0.get_by_right(&symbol) {
            return *position;
        }
        let position = self.0.len();
        self.0.insert(position, symbol);
        position
    }

    /// Returns the position of `symbol` in the alphabet, or `None` if it does not exist.
    pub fn position(&self, symbol: &str) -> Option<SymbolIndex> {
        self.0.get_by_right(symbol).copied()
    }

    /// Returns the symbol at the given position, or `None` if the position is out of range.
    pub fn symbol(&self, position: SymbolIndex) -> Option<&str> {
        self.0.get_by_left(&position).map(|s| s.as_str())
    }

    /// Checks whether `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains_right(symbol)
    }

    /// Iterates over the positions of all symbols, this is simply the range `0..size`.
    pub fn indices(&self) -> std::ops::Range<SymbolIndex> {
        0..self.size()
    }

    /// Returns an iterator over all symbols, in the order of their positions.
    pub fn universe(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|(_, s)| s.as_str())
    }

    /// Checks whether `self` and `other` consist of the same symbols, regardless of their order.
    pub fn same_symbols(&self, other: &Alphabet) -> bool {
        self.size() == other.size() && self.universe().all(|symbol| other.contains(symbol))
    }

    /// For every position of `self`, gives the position of the same symbol in `other`, or `None`
    /// if `other` does not contain it.
    pub fn translation(&self, other: &Alphabet) -> Vec<Option<SymbolIndex>> {
        self.universe().map(|symbol| other.position(symbol)).collect()
    }

    /// Translates a word given as a sequence of positions into the sequence of symbols. Positions
    /// that do not belong to the alphabet are skipped.
    pub fn symbols_of<'a, W>(&'a self, word: W) -> impl Iterator<Item = &'a str> + 'a
    where
        W: IntoIterator<Item = SymbolIndex>,
        W::IntoIter: 'a,
    {
        word.into_iter().filter_map(|i| self.symbol(i))
    }

    /// Translates a word given as a sequence of symbols into the sequence of their positions.
    /// Returns `None` if any of the symbols does not belong to the alphabet.
    pub fn indices_of<W, S>(&self, word: W) -> Option<Vec<SymbolIndex>>
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        word.into_iter()
            .map(|sym| self.position(sym.as_ref()))
            .collect()
    }

    /// Produces a human readable representation of a word that is given as a sequence of positions.
    /// Symbols are separated by a `.` unless all of them consist of a single character.
    pub fn show_word(&self, word: &[SymbolIndex]) -> String {
        if word.is_empty() {
            return "ε".to_string();
        }
        let symbols = self.symbols_of(word.iter().copied()).collect_vec();
        if symbols.iter().all(|s| s.chars().count() == 1) {
            symbols.join("")
        } else {
            symbols.join(".")
        }
    }
}

/// Creates an alphabet from an iterator over symbols, where duplicates are ignored and the
/// remaining symbols are kept in the order in which they are first seen.
impl<S: Into<String>> FromIterator<S> for Alphabet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut alphabet = Alphabet::default();
        for symbol in iter {
            alphabet.push(symbol);
        }
        alphabet
    }
}

impl Show for Alphabet {
    fn show(&self) -> String {
        format!("{{{}}}", self.universe().join(", "))
    }
}
