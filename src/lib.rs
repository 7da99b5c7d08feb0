//! Library for minimizing deterministic finite automata in Rust.
//!
//! A [`DFA`] consists of a finite set of states, which are identified by dense indices `0..n`, an
//! [`Alphabet`] of string symbols and a (possibly partial) transition function. Additionally, it
//! designates one initial state and a set of accepting states. A state may lack an outgoing
//! transition for some symbol, in which case any word that attempts to take this transition is
//! rejected. Such a missing transition is never identified with any actual state of the automaton.
//!
//! The main purpose of this crate is computing the unique minimal automaton that accepts the same
//! language as a given [`DFA`]. Two independent algorithms are provided, which can be selected via
//! [`MinimizationAlgorithm`]:
//! - partition refinement in the style of Moore, see [`minimization::partition_refinement`], which
//!   starts with the partition into accepting and rejecting states and splits classes until a fixed
//!   point is reached.
//! - table filling in the style of Myhill and Nerode, see [`minimization::table_filling`], which
//!   marks pairs of states as distinguishable by propagating distinguishability backwards.
//!
//! Both algorithms produce a [`math::Partition`] of the states, which is turned into a new automaton
//! by the [`transition_system::Quotient`] construction. Finally, states that are not reachable from
//! the initial state are removed with [`DFA::trim`].
//!
//! Further, the crate can read and write automata in the XML format used by JFLAP (see the `jflap`
//! module, available on the `jflap` feature) and generate random automata as well as some
//! parametrized families of automata (see the `random` module, available on the `random` feature).
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfamin::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, SymbolIndex},
        automaton::{DFABuilder, StateIndex, DFA},
        error::DfaError,
        math,
        math::Partition,
        minimization::MinimizationAlgorithm,
        transition_system::{MinimalRepresentatives, Quotient, ReachableStateIndices},
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Defines the errors that can occur when constructing or querying automata.
pub mod error;
pub use error::DfaError;

/// Defines the deterministic finite automaton and the means to construct it.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::DFA;

/// This module deals with the structure of an automaton, that is reachability, quotients and
/// different representations of the transition function.
pub mod transition_system;

/// Contains implementations of the different minimization algorithms.
pub mod minimization;
pub use minimization::MinimizationAlgorithm;

/// Reading and writing automata in the XML format of JFLAP. This is feature gated behind the `jflap` feature.
#[cfg(feature = "jflap")]
pub mod jflap;

/// Implements the generation of random automata and of parametrized families of automata.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, words and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example q0, q1, q2, ... and for a word it is the concatenation of its symbols.
    /// This is mainly used for debugging purposes.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for usize {
    fn show(&self) -> String {
        format!("q{self}")
    }
}

impl Show for Option<usize> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The automaton from the german wikipedia article on DFA minimization. States 0 and 1 as
    /// well as states 2, 3 and 4 are equivalent.
    pub fn wiki_dfa() -> DFA {
        DFABuilder::default()
            .with_state_colors([false, false, true, true, true, false])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 0),
                (1, 'b', 3),
                (2, 'a', 4),
                (2, 'b', 5),
                (3, 'a', 4),
                (3, 'b', 5),
                (4, 'a', 4),
                (4, 'b', 5),
                (5, 'a', 5),
                (5, 'b', 5),
            ])
            .into_dfa(0)
            .unwrap()
    }

    /// Five states over the binary alphabet, states 1 and 3 as well as 2 and 4 are equivalent.
    pub fn binary_dfa() -> DFA {
        DFABuilder::default()
            .with_accepting([2, 4])
            .with_edges([
                (0, '0', 1),
                (0, '1', 3),
                (1, '0', 1),
                (1, '1', 2),
                (2, '0', 3),
                (2, '1', 4),
                (3, '0', 3),
                (3, '1', 4),
                (4, '0', 1),
                (4, '1', 2),
            ])
            .into_dfa(0)
            .unwrap()
    }

    /// A partial automaton, state 2 and 3 only differ in that 3 has no `b` transition.
    pub fn partial_dfa() -> DFA {
        DFABuilder::default()
            .with_accepting([2, 3])
            .with_edges([
                (0, 'a', 2),
                (0, 'b', 3),
                (1, 'a', 1),
                (2, 'a', 2),
                (2, 'b', 2),
                (3, 'a', 3),
            ])
            .into_dfa(0)
            .unwrap()
    }

    /// A random partial automaton with at most seven states and at most three symbols. About a
    /// third of the transitions is missing, the initial state is arbitrary and the accepting
    /// states are not necessarily reachable.
    #[cfg(feature = "random")]
    pub fn random_partial_dfa(rng: &mut fastrand::Rng) -> DFA {
        let size = rng.usize(1..8);
        let mut dfa = DFA::new(size, Alphabet::of_size(rng.usize(1..4)));
        for q in 0..size {
            for a in dfa.alphabet().indices() {
                if rng.u8(..3) > 0 {
                    dfa.add_transition_index(q, a, rng.usize(..size)).unwrap();
                }
            }
            dfa.set_accepting(q, rng.u8(..3) == 0).unwrap();
        }
        dfa.set_initial(rng.usize(..size)).unwrap();
        dfa
    }

    #[test]
    fn show_states_and_words() {
        assert_eq!(3usize.show(), "q3");
        assert_eq!(vec![0usize, 2].show(), "{q0, q2}");
        assert_eq!(None::<usize>.show(), "-");
        assert_eq!((1usize, true).show(), "(q1, +)");
    }
}
