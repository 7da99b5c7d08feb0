use crate::{math::Set, prelude::*};
use std::collections::VecDeque;

/// Type alias for a minimal representative of a state which is its length-lexicographically minimal
/// access sequence and its state index.
pub type MinimalRepresentative = (Vec<SymbolIndex>, StateIndex);

/// Struct that can return the minimal representatives of an automaton. A minimal representative
/// for a state `q` is the length-lexicographically minimal word (with respect to the order of
/// the alphabet) with which `q` can be reached from a given state. The states are produced in
/// breadth-first order, following only transitions that are present.
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a> {
    dfa: &'a DFA,
    seen: Set<StateIndex>,
    queue: VecDeque<MinimalRepresentative>,
}

impl<'a> MinimalRepresentatives<'a> {
    /// Starts the exploration in `origin`. If `origin` is `None` or does not exist, the iterator
    /// is empty.
    pub fn new(dfa: &'a DFA, origin: Option<StateIndex>) -> Self {
        let origin = origin.filter(|q| *q < dfa.size());
        let seen = origin.into_iter().collect();
        let queue = origin.map(|q| (vec![], q)).into_iter().collect();
        Self { dfa, seen, queue }
    }
}

impl Iterator for MinimalRepresentatives<'_> {
    type Item = MinimalRepresentative;

    fn next(&mut self) -> Option<Self::Item> {
        let (access, q) = self.queue.pop_front()?;
        for (a, p) in self.dfa.edges_from(q) {
            if self.seen.insert(p) {
                let mut new_access = access.clone();
                new_access.push(a);
                self.queue.push_back((new_access, p))
            }
        }
        Some((access, q))
    }
}

/// Allows iterating over the indices of all reachable states in breadth-first order.
#[derive(Debug, Clone)]
pub struct ReachableStateIndices<'a>(MinimalRepresentatives<'a>);

impl Iterator for ReachableStateIndices<'_> {
    type Item = StateIndex;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, q)| q)
    }
}

impl<'a> ReachableStateIndices<'a> {
    /// Starts the exploration in `origin`, see [`MinimalRepresentatives::new`].
    pub fn new(dfa: &'a DFA, origin: Option<StateIndex>) -> Self {
        Self(MinimalRepresentatives::new(dfa, origin))
    }
}

impl DFA {
    /// Returns the minimal representatives of all states reachable from the initial state. This
    /// is empty if no initial state is set.
    pub fn minimal_representatives(&self) -> MinimalRepresentatives<'_> {
        MinimalRepresentatives::new(self, self.initial().ok())
    }

    /// Returns the minimal representatives of all states reachable from `origin`.
    pub fn minimal_representatives_from(&self, origin: StateIndex) -> MinimalRepresentatives<'_> {
        MinimalRepresentatives::new(self, Some(origin))
    }

    /// Iterates over the states that are reachable from the initial state.
    pub fn reachable_state_indices(&self) -> ReachableStateIndices<'_> {
        ReachableStateIndices::new(self, self.initial().ok())
    }

    /// Iterates over the states that are reachable from `origin`.
    pub fn reachable_state_indices_from(&self, origin: StateIndex) -> ReachableStateIndices<'_> {
        ReachableStateIndices::new(self, Some(origin))
    }

    /// Returns true if every state is reachable from the initial state.
    pub fn is_accessible(&self) -> bool {
        self.reachable_state_indices().count() == self.size()
    }

    /// Tries to construct a shortest (finite) word that is accepted. If the accepted language is
    /// empty, the function returns `None`.
    pub fn give_word(&self) -> Option<Vec<SymbolIndex>> {
        self.minimal_representatives()
            .find_map(|(mr, q)| self.is_accepting(q).then_some(mr))
    }

    /// Returns true if and only if the accepted language is empty.
    pub fn is_empty_language(&self) -> bool {
        self.give_word().is_none()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    #[test]
    fn reachable_states() {
        let dfa = DFABuilder::default()
            .with_state_colors([false, false, true, false])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 0),
                (1, 'a', 2),
                (1, 'b', 0),
                (2, 'a', 2),
                (2, 'b', 2),
                (3, 'a', 0),
            ])
            .into_dfa(0)
            .unwrap();

        assert_eq!(
            dfa.minimal_representatives().collect_vec(),
            vec![(vec![], 0), (vec![0], 1), (vec![0, 0], 2)]
        );
        assert_eq!(dfa.reachable_state_indices().collect_vec(), vec![0, 1, 2]);
        assert_eq!(dfa.reachable_state_indices_from(2).collect_vec(), vec![2]);
        assert_eq!(
            dfa.reachable_state_indices_from(3).collect_vec(),
            vec![3, 0, 1, 2]
        );
        assert!(!dfa.is_accessible());
        assert_eq!(dfa.give_word(), Some(vec![0, 0]));
    }

    #[test]
    fn empty_language() {
        let dfa = DFABuilder::default()
            .with_accepting([1])
            .with_edges([(0, 'a', 0), (1, 'a', 0)])
            .into_dfa(0)
            .unwrap();
        assert!(dfa.is_empty_language());

        let uninitialized = DFA::new(2, Alphabet::of_size(1));
        assert_eq!(uninitialized.reachable_state_indices().count(), 0);
    }
}
