use itertools::Itertools;
use tracing::{debug, trace};

use crate::{math::Map, prelude::*};

/// The behaviour of a state with respect to the current partition: the block it lies in and, for
/// each symbol, the block its successor lies in or `None` if there is no transition.
type Signature = (usize, Vec<Option<usize>>);

/// Computes the coarsest partition of the states of `dfa` into classes of equivalent states,
/// following the algorithm of Moore.
///
/// The computation starts with a block for the accepting and one for the rejecting states. In
/// each pass, every state is assigned a signature consisting of its current block and the
/// blocks of its successors, and the states are regrouped by their signatures. This produces a
/// fresh assignment of block ids in every pass, which only ever splits blocks. A missing
/// transition counts as a separate target, so a state that has a transition on some symbol is
/// never equivalent to a state that does not. Once a pass does not increase the number of blocks,
/// a fixed point is reached.
///
/// All states are taken into account, regardless of whether they are reachable.
pub fn moore_partition(dfa: &DFA) -> Partition {
    let mut block_ids: Vec<usize> = dfa
        .state_indices()
        .map(|q| usize::from(dfa.is_accepting(q)))
        .collect();
    let mut blocks = block_ids.iter().unique().count();

    for pass in 1.. {
        let mut signatures: Map<Signature, usize> = Map::default();
        let refined: Vec<usize> = dfa
            .state_indices()
            .map(|q| {
                let signature = (
                    block_ids[q],
                    dfa.alphabet()
                        .indices()
                        .map(|a| dfa.successor_index(q, a).map(|p| block_ids[p]))
                        .collect_vec(),
                );
                let fresh = signatures.len();
                *signatures.entry(signature).or_insert(fresh)
            })
            .collect();
        block_ids = refined;

        trace!("pass {pass} split {blocks} blocks into {}", signatures.len());
        if signatures.len() == blocks {
            debug!("partition refinement stabilized with {blocks} blocks after {pass} passes");
            break;
        }
        blocks = signatures.len();
    }

    Partition::from_block_ids(&block_ids)
}

/// Minimizes `dfa` using partition refinement, see [`moore_partition`]. The equivalence classes
/// become the states of the quotient automaton, from which all unreachable classes are removed.
///
/// Automata without accepting states, and complete automata in which all states accept, are
/// mapped directly to an automaton with a single state that loops on every symbol. Fails if
/// `dfa` has no initial state.
pub fn partition_refinement(dfa: &DFA) -> Result<DFA, DfaError> {
    if let Some(minimal) = super::trivial_minimum(dfa)? {
        return Ok(minimal);
    }
    debug!("minimizing {} by partition refinement", dfa.summary());
    super::collapse(dfa, moore_partition(dfa))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{binary_dfa, partial_dfa, wiki_dfa};

    #[test_log::test]
    fn moore_partitions() {
        assert_eq!(
            moore_partition(&wiki_dfa()),
            Partition::new([vec![0, 1], vec![2, 3, 4], vec![5]])
        );
        assert_eq!(
            moore_partition(&binary_dfa()),
            Partition::new([vec![0], vec![1, 3], vec![2, 4]])
        );
    }

    #[test]
    fn missing_transitions_split() {
        assert_eq!(
            moore_partition(&partial_dfa()),
            Partition::new([vec![0], vec![1], vec![2], vec![3]])
        );
    }

    #[test]
    fn block_ids_follow_state_order() {
        let partition = moore_partition(&binary_dfa());
        assert_eq!(partition.block_ids(), vec![0, 1, 2, 1, 2]);
    }

    #[test]
    fn empty_automaton_has_empty_partition() {
        let dfa = DFA::new(0, Alphabet::of_size(2));
        assert_eq!(moore_partition(&dfa).size(), 0);
    }

    #[test]
    fn unreachable_classes_are_removed() {
        // 2 and 3 are equivalent, 4 is not reachable
        let dfa = DFABuilder::default()
            .with_accepting([1, 4])
            .with_edges([
                (0, 'a', 1),
                (1, 'a', 2),
                (2, 'a', 3),
                (3, 'a', 3),
                (4, 'a', 0),
            ])
            .into_dfa(0)
            .unwrap();
        let minimal = partition_refinement(&dfa).unwrap();
        assert_eq!(minimal.size(), 3);
        assert!(minimal.is_accessible());
        assert_eq!(minimal.equivalent(&dfa), Ok(true));
    }
}
