use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::prelude::*;

/// Records for each unordered pair of distinct states whether they have been shown to be
/// distinguishable. Only the lower triangle of the `n x n` table is stored, in a [`BitSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinguishabilityTable {
    size: usize,
    marked: BitSet,
}

impl DistinguishabilityTable {
    /// Creates a table for `size` states in which no pair is marked.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marked: BitSet::with_capacity(size * size.saturating_sub(1) / 2),
        }
    }

    fn slot(p: StateIndex, q: StateIndex) -> usize {
        let (low, high) = if p < q { (p, q) } else { (q, p) };
        high * (high - 1) / 2 + low
    }

    /// Returns the number of states the table is built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Marks `p` and `q` as distinguishable and returns true if they were not marked before.
    /// A state is never distinguishable from itself, so marking `(q, q)` does nothing. Pairs
    /// involving a state outside of the table are ignored as well.
    pub fn mark(&mut self, p: StateIndex, q: StateIndex) -> bool {
        if p >= self.size || q >= self.size {
            return false;
        }
        p != q && self.marked.insert(Self::slot(p, q))
    }

    /// Returns true if the pair `(p, q)` is marked.
    pub fn is_distinguishable(&self, p: StateIndex, q: StateIndex) -> bool {
        p != q && p < self.size && q < self.size && self.marked.contains(Self::slot(p, q))
    }

    /// Counts the marked pairs.
    pub fn marked_pairs(&self) -> usize {
        self.marked.len()
    }

    /// Iterates over all unordered pairs `(p, q)` with `p < q`.
    pub fn pairs(&self) -> impl Iterator<Item = (StateIndex, StateIndex)> {
        (0..self.size).tuple_combinations()
    }

    /// Groups the states into classes of pairwise indistinguishable states. Going through the
    /// states in ascending order, each state that is not yet assigned opens a new class, which
    /// also receives all larger unassigned states that are not distinguishable from it.
    pub fn partition(&self) -> Partition {
        let mut assigned = vec![false; self.size];
        let mut classes = vec![];
        for p in 0..self.size {
            if assigned[p] {
                continue;
            }
            let mut class = vec![p];
            assigned[p] = true;
            for q in (p + 1)..self.size {
                if !assigned[q] && !self.is_distinguishable(p, q) {
                    assigned[q] = true;
                    class.push(q);
                }
            }
            classes.push(class);
        }
        Partition::new(classes)
    }
}

/// Decides whether `p` and `q` are distinguished by the empty word or by a symbol on which only
/// one of them has a transition.
fn initially_distinguishable(dfa: &DFA, p: StateIndex, q: StateIndex) -> bool {
    dfa.is_accepting(p) != dfa.is_accepting(q)
        || dfa.alphabet().indices().any(|a| {
            dfa.successor_index(p, a).is_some() != dfa.successor_index(q, a).is_some()
        })
}

/// Fills the table of distinguishable pairs of states in the manner of Myhill and Nerode.
///
/// First, every pair that differs in acceptance is marked. A missing transition is treated as
/// leading to a distinguished target, so pairs where exactly one of the two states has a
/// transition on some symbol are marked as well. Then the table is swept repeatedly and a pair
/// is marked if some symbol leads to a pair that is already marked, until a sweep marks nothing
/// new. The pairs that remain unmarked are exactly the equivalent ones.
pub fn distinguishability_table(dfa: &DFA) -> DistinguishabilityTable {
    let mut table = DistinguishabilityTable::new(dfa.size());
    for (p, q) in table.pairs().collect_vec() {
        if initially_distinguishable(dfa, p, q) {
            table.mark(p, q);
        }
    }
    trace!("{} pairs are distinguishable initially", table.marked_pairs());

    let mut sweep = 0;
    loop {
        sweep += 1;
        let mut changed = false;
        for (p, q) in table.pairs().collect_vec() {
            if table.is_distinguishable(p, q) {
                continue;
            }
            let separated = dfa.alphabet().indices().any(|a| {
                match (dfa.successor_index(p, a), dfa.successor_index(q, a)) {
                    (Some(p_succ), Some(q_succ)) => table.is_distinguishable(p_succ, q_succ),
                    _ => false,
                }
            });
            if separated {
                changed |= table.mark(p, q);
            }
        }
        trace!("sweep {sweep} leaves {} marked pairs", table.marked_pairs());
        if !changed {
            break;
        }
    }
    debug!(
        "table filling stabilized after {sweep} sweeps with {} of {} pairs marked",
        table.marked_pairs(),
        dfa.size() * dfa.size().saturating_sub(1) / 2
    );
    table
}

/// Minimizes `dfa` by table filling, see [`distinguishability_table`]. The classes of
/// indistinguishable states form the states of the quotient, whose unreachable states are
/// removed. Transitions that are missing in `dfa` remain missing in the result.
///
/// This handles the same trivial cases as
/// [`partition_refinement`](super::partition_refinement) and fails if `dfa` has no
/// initial state.
pub fn table_filling(dfa: &DFA) -> Result<DFA, DfaError> {
    if let Some(minimal) = super::trivial_minimum(dfa)? {
        return Ok(minimal);
    }
    debug!("minimizing {} by table filling", dfa.summary());
    super::collapse(dfa, distinguishability_table(dfa).partition())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        minimization::moore_partition,
        tests::{binary_dfa, partial_dfa, wiki_dfa},
    };

    #[test]
    fn table_storage() {
        let mut table = DistinguishabilityTable::new(4);
        assert_eq!(table.pairs().count(), 6);
        assert!(table.mark(3, 1));
        assert!(!table.mark(1, 3));
        assert!(!table.mark(2, 2));
        assert!(!table.mark(1, 4));
        assert!(!table.is_distinguishable(4, 1));
        assert!(table.is_distinguishable(1, 3));
        assert!(!table.is_distinguishable(0, 3));
        assert_eq!(table.marked_pairs(), 1);
        assert!(table.mark(0, 3));
        assert!(table.mark(3, 2));
        assert_eq!(
            table.partition(),
            Partition::new([vec![0, 1, 2], vec![3]])
        );
    }

    #[test_log::test]
    fn distinguishable_pairs() {
        let table = distinguishability_table(&binary_dfa());
        assert!(!table.is_distinguishable(1, 3));
        assert!(!table.is_distinguishable(2, 4));
        assert!(table.is_distinguishable(0, 1));
        assert!(table.is_distinguishable(0, 3));
        assert!(table.is_distinguishable(1, 2));
        assert_eq!(table.marked_pairs(), 10 - 2);
    }

    #[test]
    fn agrees_with_partition_refinement() {
        for dfa in [wiki_dfa(), binary_dfa(), partial_dfa()] {
            assert_eq!(
                distinguishability_table(&dfa).partition(),
                moore_partition(&dfa)
            );
        }
    }

    #[test]
    fn separating_words_witness_marks() {
        let dfa = wiki_dfa();
        let table = distinguishability_table(&dfa);
        for (p, q) in table.pairs() {
            assert_eq!(
                table.is_distinguishable(p, q),
                dfa.separate(p, q).is_some(),
                "disagreement on {p} and {q}"
            );
        }
    }

    #[test]
    fn missing_transitions_are_kept() {
        let dfa = DFABuilder::default()
            .with_accepting([1, 2])
            .with_edges([(0, 'a', 1), (0, 'b', 2), (1, 'a', 1), (2, 'a', 2)])
            .into_dfa(0)
            .unwrap();
        let minimal = table_filling(&dfa).unwrap();
        assert_eq!(minimal.size(), 2);
        assert_eq!(minimal.successor(1, "b"), None);
        assert_eq!(minimal.transition_count(), 3);
        assert_eq!(minimal.equivalent(&dfa), Ok(true));
    }
}
