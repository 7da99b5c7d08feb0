use std::collections::VecDeque;

use tracing::trace;

use crate::{math::Set, prelude::*};

/// A state of the product of two automata. A component is `None` once the run in the respective
/// automaton has left through a missing transition, such a run can never accept again.
pub type ProductIndex = (Option<StateIndex>, Option<StateIndex>);

/// Explores the product of `left` started in `l` and `right` started in `r` breadth-first and
/// returns a shortest word on which the two disagree, that is, which is accepted from exactly one
/// of the two states. Returns `None` if the two states accept the same language.
///
/// Symbols are matched by name, so the order of the two alphabets is irrelevant. The returned
/// word consists of positions in the alphabet of `left`, and a symbol that `right` does not know
/// is treated like a missing transition in `right`.
pub fn shortest_separating_word(
    left: &DFA,
    l: StateIndex,
    right: &DFA,
    r: StateIndex,
) -> Option<Vec<SymbolIndex>> {
    let accepting = |dfa: &DFA, q: Option<StateIndex>| q.is_some_and(|q| dfa.is_accepting(q));
    let translation = left.alphabet().translation(right.alphabet());

    let origin: ProductIndex = (Some(l), Some(r));
    let mut seen: Set<ProductIndex> = Set::from_iter([origin]);
    let mut queue = VecDeque::from([(vec![], origin)]);

    while let Some((word, (p, q))) = queue.pop_front() {
        if accepting(left, p) != accepting(right, q) {
            trace!("found separating word of length {}", word.len());
            return Some(word);
        }
        if p.is_none() && q.is_none() {
            continue;
        }
        for a in left.alphabet().indices() {
            let successor = (
                p.and_then(|p| left.successor_index(p, a)),
                q.zip(translation[a]).and_then(|(q, b)| right.successor_index(q, b)),
            );
            if seen.insert(successor) {
                let mut extended = word.clone();
                extended.push(a);
                queue.push_back((extended, successor));
            }
        }
    }
    None
}

impl DFA {
    /// Attempts to separate the state `left` from the state `right` by finding a word that leads to
    /// different colors. This means that the returned word is in the symmetric difference of
    /// the languages accepted from the two states. The returned word is a shortest one.
    pub fn separate(&self, left: StateIndex, right: StateIndex) -> Option<Vec<SymbolIndex>> {
        if left == right || left >= self.size() || right >= self.size() {
            return None;
        }
        shortest_separating_word(self, left, self, right)
    }

    /// Checks whether `self` is equivalent to `other`, i.e. whether the two DFAs accept the same
    /// language. Both automata must have the same set of symbols, their order does not matter.
    pub fn equivalent(&self, other: &DFA) -> Result<bool, DfaError> {
        Ok(self.separating_word(other)?.is_none())
    }

    /// Returns a shortest word that is accepted by exactly one of `self` and `other`, or `None`
    /// if both accept the same language. The word is given in positions of the alphabet of `self`.
    pub fn separating_word(&self, other: &DFA) -> Result<Option<Vec<SymbolIndex>>, DfaError> {
        if !self.alphabet().same_symbols(other.alphabet()) {
            return Err(DfaError::AlphabetMismatch {
                left: self.alphabet().show(),
                right: other.alphabet().show(),
            });
        }
        Ok(shortest_separating_word(
            self,
            self.initial()?,
            other,
            other.initial()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn separating_states() {
        let dfa = crate::tests::wiki_dfa();
        assert_eq!(dfa.separate(0, 1), None);
        assert_eq!(dfa.separate(2, 4), None);
        assert_eq!(dfa.separate(0, 2), Some(vec![]));
        // from 0 the word b is accepted, from 5 nothing is
        assert_eq!(dfa.separate(0, 5), Some(vec![1]));
    }

    #[test]
    fn missing_transitions_separate() {
        let dfa = crate::tests::partial_dfa();
        // 3 accepts a*, while 2 accepts every word
        assert_eq!(dfa.separate(2, 3), Some(vec![1]));
    }

    #[test]
    fn equivalence() {
        let dfa = crate::tests::wiki_dfa();
        let small = DFABuilder::default()
            .with_state_colors([false, true, false])
            .with_edges([
                (0, 'a', 0),
                (0, 'b', 1),
                (1, 'a', 1),
                (1, 'b', 2),
                (2, 'a', 2),
                (2, 'b', 2),
            ])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.equivalent(&small), Ok(true));

        let other = DFABuilder::default()
            .with_state_colors([false, true])
            .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 1)])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.separating_word(&other), Ok(Some(vec![1, 1])));

        let mismatch = DFABuilder::default()
            .with_edges([(0, 'c', 0)])
            .into_dfa(0)
            .unwrap();
        assert!(matches!(
            dfa.equivalent(&mismatch),
            Err(DfaError::AlphabetMismatch { .. })
        ));
    }

    #[test]
    fn alphabet_order_is_irrelevant() {
        let dfa = DFABuilder::default()
            .with_accepting([1])
            .with_edges([(0, 'a', 0), (0, 'b', 1)])
            .into_dfa(0)
            .unwrap();
        let mut reordered = DFA::new(2, Alphabet::from_iter(["b", "a"]));
        reordered.add_transition(0, "a", 0).unwrap();
        reordered.add_transition(0, "b", 1).unwrap();
        reordered.set_accepting(1, true).unwrap();
        reordered.set_initial(0).unwrap();
        assert_eq!(dfa.equivalent(&reordered), Ok(true));
        assert_eq!(reordered.equivalent(&dfa), Ok(true));

        reordered.set_accepting(0, true).unwrap();
        // the word is given in positions of the alphabet of the receiver
        assert_eq!(dfa.separating_word(&reordered), Ok(Some(vec![])));
        reordered.set_accepting(0, false).unwrap();
        reordered.add_transition(1, "a", 1).unwrap();
        assert_eq!(dfa.separating_word(&reordered), Ok(Some(vec![1, 0])));
        assert_eq!(reordered.separating_word(&dfa), Ok(Some(vec![0, 1])));
    }
}
