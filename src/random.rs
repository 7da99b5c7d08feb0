use fastrand::Rng;
use tracing::{debug, trace};

use crate::prelude::*;

/// Generates a random complete automaton with `size` states over the given `alphabet`, in which
/// every state is reachable from the initial state `0`. The algorithm is as follows:
/// 1. Build a random spanning tree: repeatedly pick a free transition slot (a state and a symbol
///    without transition) of an already connected state and let it point to a random state that
///    is not yet connected.
/// 2. Let every remaining free slot point to a state drawn uniformly at random.
/// 3. Explore the automaton depth-first from the initial state and make each visited state
///    accepting with probability 1/10. If this leaves the automaton without accepting states,
///    the last visited state becomes accepting.
///
/// Panics if `size` is zero, or if the alphabet is empty and `size` is larger than one.
pub fn generate_random_dfa(size: usize, alphabet: Alphabet) -> DFA {
    generate_random_dfa_with_rng(&mut Rng::new(), size, alphabet)
}

/// Works as [`generate_random_dfa`], but draws from the given random number generator, which
/// makes the result reproducible when the generator is seeded.
pub fn generate_random_dfa_with_rng(rng: &mut Rng, size: usize, alphabet: Alphabet) -> DFA {
    assert!(size > 0, "an automaton needs at least one state");
    assert!(
        size == 1 || !alphabet.is_empty(),
        "states cannot be connected without symbols"
    );
    let mut dfa = DFA::new(size, alphabet);

    let mut open: Vec<(StateIndex, SymbolIndex)> =
        dfa.alphabet().indices().map(|a| (0, a)).collect();
    let mut unconnected: Vec<StateIndex> = (1..size).collect();
    while !unconnected.is_empty() {
        let (q, a) = open.swap_remove(rng.usize(..open.len()));
        let p = unconnected.swap_remove(rng.usize(..unconnected.len()));
        trace!("connecting {} via {a} from {}", p.show(), q.show());
        dfa.add_transition_index(q, a, p)
            .expect("open slots have no transition");
        open.extend(dfa.alphabet().indices().map(|a| (p, a)));
    }

    for (q, a) in open {
        dfa.add_transition_index(q, a, rng.usize(..size))
            .expect("open slots have no transition");
    }

    let mut visited = vec![false; size];
    let mut stack = vec![0];
    let mut last = 0;
    while let Some(q) = stack.pop() {
        if visited[q] {
            continue;
        }
        visited[q] = true;
        last = q;
        if rng.u8(..10) == 0 {
            dfa.set_accepting(q, true).expect("state exists");
        }
        stack.extend(dfa.edges_from(q).map(|(_, p)| p).filter(|p| !visited[*p]));
    }
    if dfa.accepting_states().next().is_none() {
        dfa.set_accepting(last, true).expect("state exists");
    }

    dfa.set_initial(0).expect("state exists");
    debug!("generated {}", dfa.summary());
    dfa
}

/// Builds a member of a family of automata over `{a, b}` whose states collapse pairwise. The
/// automaton has `2 * n + 1` states. For each `k < n`, the states `2k` and `2k + 1` swap on
/// `a` and both move to `2k + 2` on `b`. The last state is the only accepting state and loops
/// on both symbols. Thus the minimal automaton has `n + 1` states.
pub fn double_state_family(n: usize) -> DFA {
    let sink = 2 * n;
    let edges = (0..n).flat_map(|k| {
        let (even, odd) = (2 * k, 2 * k + 1);
        [
            (even, 'a', odd),
            (odd, 'a', even),
            (even, 'b', even + 2),
            (odd, 'b', even + 2),
        ]
    });
    DFABuilder::default()
        .with_alphabet_symbols(['a', 'b'])
        .with_accepting([sink])
        .with_edges(edges.chain([(sink, 'a', sink), (sink, 'b', sink)]))
        .into_dfa(0)
        .expect("the family is deterministic")
}

/// Builds the automaton with `n` states over `{0, 1}` that accepts the binary representations
/// (most significant bit first) of the multiples of `n`. State `i` corresponds to the remainder
/// `i` modulo `n`, the empty word is read as zero. Panics if `n` is zero.
pub fn binary_multiple_family(n: usize) -> DFA {
    assert!(n > 0, "there are no multiples of zero besides zero");
    DFABuilder::default()
        .with_alphabet_symbols(['0', '1'])
        .with_accepting([0])
        .with_edges((0..n).flat_map(|i| [(i, '0', (2 * i) % n), (i, '1', (2 * i + 1) % n)]))
        .into_dfa(0)
        .expect("the family is deterministic")
}

/// Generates a random word over the `alphabet` as a sequence of symbol positions. The length of
/// the word is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word(
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
) -> Vec<SymbolIndex> {
    generate_random_word_with_rng(&mut Rng::new(), alphabet, min_len, max_len)
}

/// Works as [`generate_random_word`] with the given random number generator.
pub fn generate_random_word_with_rng(
    rng: &mut Rng,
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
) -> Vec<SymbolIndex> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = rng.usize(min_len..=max_len);
    (0..length).map(|_| rng.usize(..alphabet.size())).collect()
}

/// Generates `number` random words, see [`generate_random_word`]. The words need not be distinct.
pub fn generate_random_words(
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<SymbolIndex>> {
    generate_random_words_with_rng(&mut Rng::new(), alphabet, min_len, max_len, number)
}

/// Works as [`generate_random_words`] with the given random number generator.
pub fn generate_random_words_with_rng(
    rng: &mut Rng,
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<SymbolIndex>> {
    (0..number)
        .map(|_| generate_random_word_with_rng(rng, alphabet, min_len, max_len))
        .collect()
}
