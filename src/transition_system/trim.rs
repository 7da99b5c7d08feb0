use itertools::Itertools;
use tracing::debug;

use crate::{math::Bijection, prelude::*};

impl DFA {
    /// Removes all states that are not reachable from the initial state and returns the resulting
    /// automaton. The remaining states are renumbered contiguously while preserving their relative
    /// order, so a state with a lower index in `self` also has a lower index in the result.
    /// Trimming an automaton that is already trim yields an identical automaton.
    ///
    /// # Example
    /// ```
    /// use dfamin::prelude::*;
    ///
    /// let dfa = DFABuilder::default()
    ///     .with_accepting([2])
    ///     .with_edges([(0, 'a', 2), (1, 'a', 0), (2, 'a', 0)])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let trimmed = dfa.trim().unwrap();
    /// assert_eq!(trimmed.size(), 2);
    /// assert_eq!(trimmed.successor(0, "a"), Some(1));
    /// assert!(trimmed.is_accepting(1));
    /// ```
    pub fn trim(&self) -> Result<DFA, DfaError> {
        Ok(self.trim_with_bijection()?.0)
    }

    /// Works like [`DFA::trim`], but additionally returns the bijection between the indices of
    /// the reachable states in `self` (left) and their indices in the trimmed automaton (right).
    pub fn trim_with_bijection(
        &self,
    ) -> Result<(DFA, Bijection<StateIndex, StateIndex>), DfaError> {
        let initial = self.initial()?;

        let mut reachable = vec![false; self.size()];
        for q in self.reachable_state_indices() {
            reachable[q] = true;
        }

        let map: Bijection<StateIndex, StateIndex> = self
            .state_indices()
            .filter(|q| reachable[*q])
            .enumerate()
            .map(|(new, old)| (old, new))
            .collect();
        let removed = self.size() - map.len();
        if removed > 0 {
            debug!(
                "removing {removed} unreachable states {}",
                self.state_indices()
                    .filter(|q| !reachable[*q])
                    .collect_vec()
                    .show()
            );
        }

        let mut out = DFA::new(map.len(), self.alphabet().clone());
        for (old, new) in map.iter() {
            out.set_accepting(*new, self.is_accepting(*old))?;
            for (a, p) in self.edges_from(*old) {
                let target = map
                    .get_by_left(&p)
                    .expect("targets of reachable states are reachable");
                out.add_transition_index(*new, a, *target)?;
            }
        }
        out.set_initial(
            *map.get_by_left(&initial)
                .expect("the initial state is reachable"),
        )?;
        Ok((out, map))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn with_garbage() -> DFA {
        DFABuilder::default()
            .with_accepting([1, 3])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 3),
                (1, 'a', 1),
                (2, 'a', 0),
                (2, 'b', 4),
                (3, 'b', 0),
                (4, 'a', 4),
            ])
            .into_dfa(0)
            .unwrap()
    }

    #[test]
    fn removes_unreachable_states() {
        let dfa = with_garbage();
        let (trimmed, map) = dfa.trim_with_bijection().unwrap();
        assert_eq!(trimmed.size(), 3);
        assert_eq!(map.get_by_left(&3), Some(&2));
        assert_eq!(map.get_by_left(&2), None);
        assert_eq!(trimmed.successor(0, "b"), Some(2));
        assert_eq!(trimmed.successor(2, "b"), Some(0));
        assert_eq!(trimmed.successor(2, "a"), None);
        assert_eq!(trimmed.accepting_states().collect::<Vec<_>>(), vec![1, 2]);
        assert!(trimmed.is_accessible());
        assert_eq!(dfa.equivalent(&trimmed), Ok(true));
    }

    #[test]
    fn trim_is_idempotent() {
        let once = with_garbage().trim().unwrap();
        let twice = once.trim().unwrap();
        assert_eq!(once, twice);

        let wiki = crate::tests::wiki_dfa();
        assert_eq!(wiki.trim().unwrap(), wiki);
    }

    #[test]
    fn initial_state_is_renumbered() {
        let dfa = DFABuilder::default()
            .with_accepting([2])
            .with_edges([(2, 'a', 3), (3, 'a', 2), (0, 'a', 1)])
            .into_dfa(3)
            .unwrap();
        let trimmed = dfa.trim().unwrap();
        assert_eq!(trimmed.size(), 2);
        assert_eq!(trimmed.initial(), Ok(1));
        assert!(trimmed.accepts_chars("a"));
        assert!(!trimmed.accepts_chars("aa"));
    }

    #[test]
    fn uninitialized_cannot_be_trimmed() {
        let dfa = DFA::new(2, Alphabet::of_size(2));
        assert_eq!(dfa.trim(), Err(DfaError::UninitializedAutomaton));
    }
}
