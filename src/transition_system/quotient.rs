use itertools::Itertools;
use tracing::trace;

use crate::{math::Partition, prelude::*};

/// A quotient takes an automaton and merges states which are in the same class of some
/// [`Partition`]. We assume that the [`Partition`] is a congruence, meaning if we have two
/// classes `X, Y`, then for all `p`, `q` in X and all symbols `a` in the alphabet, there is a
/// transition from `p` on `a` to some state in `Y` if and only if the same is true for `q`.
/// Moreover, `p` has a transition on `a` if and only if `q` has one. Thus, there is a transition
/// between states (which are congruence classes) of the quotient for some symbol `a`, if
/// there is a transition between the states contained in the classes.
///
/// The id of a class is its position in the partition, and this id becomes the index of the
/// corresponding state in the automaton that is produced by [`Quotient::collect_dfa`].
#[derive(Debug, Clone)]
pub struct Quotient<'a> {
    dfa: &'a DFA,
    partition: Partition,
    class_of: Vec<usize>,
}

impl<'a> Quotient<'a> {
    /// Creates a new quotient of the given automaton by the given [`Partition`]. Fails if some
    /// state of the automaton is not contained in precisely one class of the partition, or if the
    /// partition mentions states that do not exist.
    pub fn new(dfa: &'a DFA, partition: Partition) -> Result<Self, DfaError> {
        let mut class_of = vec![None; dfa.size()];
        for (id, class) in partition.iter().enumerate() {
            for q in class {
                dfa.check_state(*q)?;
                if class_of[*q].replace(id).is_some() {
                    return Err(DfaError::InvalidPartition(*q));
                }
            }
        }
        let class_of = class_of
            .into_iter()
            .enumerate()
            .map(|(q, id)| id.ok_or(DfaError::InvalidPartition(q)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            dfa,
            partition,
            class_of,
        })
    }

    /// Returns a reference to the [`Partition`] underlying the quotient.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Gives a reference to the underlying automaton.
    pub fn dfa(&self) -> &DFA {
        self.dfa
    }

    /// Returns the number of classes, which is the number of states of the quotient.
    pub fn size(&self) -> usize {
        self.partition.size()
    }

    /// Returns the id of the class containing the given state `q`, or `None` if `q` does not exist.
    pub fn find_id_by_state(&self, q: StateIndex) -> Option<usize> {
        self.class_of.get(q).copied()
    }

    /// Returns an iterator over the states in the class with the given `id`, in ascending order.
    /// If no such class exists, `None` is returned.
    pub fn class_iter_by_id(&self, id: usize) -> Option<impl Iterator<Item = StateIndex> + '_> {
        self.partition.get(id).map(|s| s.iter().cloned())
    }

    /// Returns the representative of the class with the given `id`, which is its least member.
    pub fn class_representative(&self, id: usize) -> Option<StateIndex> {
        self.partition.get(id)?.first().copied()
    }

    /// Computes the transition of the class with the given `id` on `symbol`, by looking at the
    /// transition of the class representative.
    pub fn successor_class(&self, id: usize, symbol: SymbolIndex) -> Option<usize> {
        let representative = self.class_representative(id)?;
        self.dfa
            .successor_index(representative, symbol)
            .map(|p| self.class_of[p])
    }

    /// Verifies that the partition is a congruence that respects acceptance: all members of a
    /// class agree on acceptance, and for every symbol either none of them has a transition or all
    /// of them have a transition into the same class.
    pub fn is_congruence(&self) -> bool {
        self.partition.iter().enumerate().all(|(id, class)| {
            let consistent_acceptance = class
                .iter()
                .map(|q| self.dfa.is_accepting(*q))
                .all_equal();
            let consistent_transitions = self.dfa.alphabet().indices().all(|a| {
                class
                    .iter()
                    .map(|q| self.dfa.successor_index(*q, a).map(|p| self.class_of[p]))
                    .all_equal()
            });
            if !(consistent_acceptance && consistent_transitions) {
                trace!(
                    "class {id} with members {} is inconsistent",
                    class.iter().collect_vec().show()
                );
                return false;
            }
            true
        })
    }

    /// Builds the quotient automaton. For each class with id `i`, the resulting automaton has a
    /// state `i`, which is initial if the class contains the initial state and accepting if the
    /// class contains an accepting state. For each symbol on which the representative of class `i`
    /// has a transition, there is a transition from `i` to the class containing the target of
    /// the representative's transition.
    pub fn collect_dfa(&self) -> Result<DFA, DfaError> {
        let initial = self.dfa.initial()?;
        let mut out = DFA::new(self.size(), self.dfa.alphabet().clone());
        for (id, class) in self.partition.iter().enumerate() {
            out.set_accepting(id, class.iter().any(|q| self.dfa.is_accepting(*q)))?;
            for a in self.dfa.alphabet().indices() {
                if let Some(target) = self.successor_class(id, a) {
                    out.add_transition_index(id, a, target)?;
                }
            }
        }
        out.set_initial(self.class_of[initial])?;
        Ok(out)
    }
}

impl DFA {
    /// Builds the quotient of `self` with respect to the given partition, which must be a
    /// congruence. See [`Quotient`] for details.
    pub fn quotient(&self, partition: Partition) -> Result<DFA, DfaError> {
        Quotient::new(self, partition)?.collect_dfa()
    }
}
