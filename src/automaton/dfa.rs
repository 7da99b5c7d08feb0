use bit_set::BitSet;
use itertools::Itertools;

use crate::prelude::*;

/// The index of a state, states of an automaton with `n` states are identified by `0..n`.
pub type StateIndex = usize;

/// A deterministic finite automaton (DFA) over an [`Alphabet`] of string symbols. It accepts a
/// finite word if reading it from the initial state leads to an accepting state.
///
/// The transition function may be partial, meaning that a state can lack a transition for some
/// symbol. Reading such a symbol in that state leads nowhere and the word is rejected. Transitions
/// are stored in a dense table with one optional target per state and symbol, so a missing
/// transition is explicit and is never confused with some actual state.
///
/// An automaton is created with a fixed number of states and without any transitions, initial
/// state or accepting states. Transitions are added one by one and determinism is enforced upon
/// insertion: a second transition on the same symbol from the same state is rejected.
///
/// # Example
/// ```
/// use dfamin::prelude::*;
///
/// let mut dfa = DFA::new(2, Alphabet::from_iter(["a", "b"]));
/// dfa.add_transition(0, "a", 1).unwrap();
/// dfa.add_transition(1, "a", 0).unwrap();
/// dfa.set_initial(0).unwrap();
/// dfa.set_accepting(1, true).unwrap();
///
/// assert!(dfa.accepts(["a", "a", "a"]));
/// assert!(!dfa.accepts(["a", "b"]));
/// assert!(dfa.add_transition(0, "a", 0).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct DFA {
    alphabet: Alphabet,
    size: usize,
    transitions: Vec<Option<StateIndex>>,
    initial: Option<StateIndex>,
    accepting: BitSet,
}

/// Two automata are equal if they coincide in their alphabets, their transition tables, their
/// initial states and their accepting states. This is equality of the concrete structure, not
/// of the accepted languages.
impl PartialEq for DFA {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.initial == other.initial
            && self.alphabet == other.alphabet
            && self.transitions == other.transitions
            && self.accepting.iter().eq(other.accepting.iter())
    }
}
impl Eq for DFA {}

impl DFA {
    /// Creates a new automaton with `size` states over the given alphabet. It has no transitions,
    /// no accepting states and the initial state is not yet set.
    pub fn new(size: usize, alphabet: Alphabet) -> Self {
        Self {
            transitions: vec![None; size * alphabet.size()],
            alphabet,
            size,
            initial: None,
            accepting: BitSet::with_capacity(size),
        }
    }

    /// Creates a new automaton over the given alphabet which has no states at all.
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        Self::new(0, alphabet)
    }

    /// Adds a new state without outgoing transitions and returns its index.
    pub fn add_state(&mut self, accepting: bool) -> StateIndex {
        let state = self.size;
        self.size += 1;
        self.transitions
            .extend(std::iter::repeat(None).take(self.alphabet.size()));
        if accepting {
            self.accepting.insert(state);
        }
        state
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if and only if the automaton has no states.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Gives a reference to the alphabet of the automaton.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Iterates over the indices of all states.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size
    }

    /// Verifies that `state` exists.
    pub fn check_state(&self, state: StateIndex) -> Result<StateIndex, DfaError> {
        if state < self.size {
            Ok(state)
        } else {
            Err(DfaError::OutOfRangeState {
                state,
                size: self.size,
            })
        }
    }

    fn slot(&self, state: StateIndex, symbol: SymbolIndex) -> usize {
        state * self.alphabet.size() + symbol
    }

    /// Adds a transition from `from` to `to` on the given `symbol`. Fails if one of the states
    /// does not exist, if the symbol is not part of the alphabet or if `from` already has a
    /// transition on `symbol`. In the latter case the existing transition is kept.
    pub fn add_transition(
        &mut self,
        from: StateIndex,
        symbol: &str,
        to: StateIndex,
    ) -> Result<(), DfaError> {
        let symbol = self
            .alphabet
            .position(symbol)
            .ok_or_else(|| DfaError::UnknownSymbol(symbol.to_string()))?;
        self.add_transition_index(from, symbol, to)
    }

    /// Works like [`DFA::add_transition`], but the symbol is given by its position in the alphabet.
    pub fn add_transition_index(
        &mut self,
        from: StateIndex,
        symbol: SymbolIndex,
        to: StateIndex,
    ) -> Result<(), DfaError> {
        self.check_state(from)?;
        self.check_state(to)?;
        if symbol >= self.alphabet.size() {
            return Err(DfaError::UnknownSymbol(format!("#{symbol}")));
        }
        let slot = self.slot(from, symbol);
        if let Some(existing) = self.transitions[slot] {
            return Err(DfaError::DuplicateTransition {
                state: from,
                symbol: self.symbol_name(symbol),
                existing,
            });
        }
        self.transitions[slot] = Some(to);
        Ok(())
    }

    fn symbol_name(&self, symbol: SymbolIndex) -> String {
        self.alphabet
            .symbol(symbol)
            .map_or_else(|| format!("#{symbol}"), str::to_string)
    }

    /// Sets the initial state.
    pub fn set_initial(&mut self, state: StateIndex) -> Result<(), DfaError> {
        self.initial = Some(self.check_state(state)?);
        Ok(())
    }

    /// Returns the initial state or [`DfaError::UninitializedAutomaton`] if it has not been set.
    pub fn initial(&self) -> Result<StateIndex, DfaError> {
        self.initial.ok_or(DfaError::UninitializedAutomaton)
    }

    /// Returns true if the initial state has been set.
    pub fn has_initial(&self) -> bool {
        self.initial.is_some()
    }

    /// Marks the given state as accepting if `accepting` is true and as rejecting otherwise.
    pub fn set_accepting(&mut self, state: StateIndex, accepting: bool) -> Result<(), DfaError> {
        self.check_state(state)?;
        if accepting {
            self.accepting.insert(state);
        } else {
            self.accepting.remove(state);
        }
        Ok(())
    }

    /// Returns true if and only if the state exists and is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the indices of all states that are accepting, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter()
    }

    /// Returns the indices of all states that are rejecting, in ascending order.
    pub fn rejecting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.state_indices().filter(move |q| !self.is_accepting(*q))
    }

    /// Returns the state that is reached from `state` on the symbol at position `symbol`, or `None`
    /// if there is no such transition.
    pub fn successor_index(&self, state: StateIndex, symbol: SymbolIndex) -> Option<StateIndex> {
        if state >= self.size || symbol >= self.alphabet.size() {
            return None;
        }
        self.transitions[self.slot(state, symbol)]
    }

    /// Returns the state that is reached from `state` when reading `symbol`, or `None` if
    /// there is no such transition or the symbol does not belong to the alphabet.
    pub fn successor(&self, state: StateIndex, symbol: &str) -> Option<StateIndex> {
        self.successor_index(state, self.alphabet.position(symbol)?)
    }

    /// Iterates over the transitions leaving `state` as pairs of symbol position and target,
    /// ordered by the position of the symbol. Missing transitions are skipped.
    pub fn edges_from(
        &self,
        state: StateIndex,
    ) -> impl Iterator<Item = (SymbolIndex, StateIndex)> + '_ {
        self.alphabet
            .indices()
            .filter_map(move |a| self.successor_index(state, a).map(|p| (a, p)))
    }

    /// Iterates over all transitions as triples of source, symbol position and target.
    pub fn edges(&self) -> impl Iterator<Item = (StateIndex, SymbolIndex, StateIndex)> + '_ {
        self.state_indices()
            .flat_map(move |q| self.edges_from(q).map(move |(a, p)| (q, a, p)))
    }

    /// Returns the number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.iter().flatten().count()
    }

    /// Returns true if and only if every state has a transition on every symbol.
    pub fn is_complete(&self) -> bool {
        self.transitions.iter().all(|t| t.is_some())
    }

    /// Runs the given word, which consists of symbol positions, from `origin`. Returns the state
    /// that is reached or `None` if the run encounters a missing transition.
    pub fn reached_state_index_from<W>(&self, origin: StateIndex, word: W) -> Option<StateIndex>
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.check_state(origin).ok()?;
        word.into_iter()
            .try_fold(origin, |q, a| self.successor_index(q, a))
    }

    /// Runs the given word of symbol positions from the initial state and returns the state that
    /// is reached. If the initial state is not set or the run encounters a missing transition,
    /// `None` is returned.
    pub fn reached_state_index<W>(&self, word: W) -> Option<StateIndex>
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.reached_state_index_from(self.initial?, word)
    }

    /// Runs the given word of symbols from the initial state and returns the state that is
    /// reached, if any. Symbols outside the alphabet have no transitions.
    pub fn reached_state<W, S>(&self, word: W) -> Option<StateIndex>
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut q = self.initial?;
        for sym in word {
            q = self.successor(q, sym.as_ref())?;
        }
        Some(q)
    }

    /// Decides whether the word of symbol positions is accepted. A word is accepted if its run
    /// from the initial state exists and ends in an accepting state. An automaton without initial
    /// state accepts nothing.
    pub fn accepts_indices<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.reached_state_index(word)
            .is_some_and(|q| self.is_accepting(q))
    }

    /// Decides whether the given word of symbols is accepted, see [`DFA::accepts_indices`].
    pub fn accepts<W, S>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reached_state(word).is_some_and(|q| self.is_accepting(q))
    }

    /// Convenience variant of [`DFA::accepts`] for automata whose symbols are single characters,
    /// each character of `word` is read as one symbol.
    pub fn accepts_chars(&self, word: &str) -> bool {
        self.accepts(word.chars().map(|c| c.to_string()))
    }

    /// Returns a compact, single line description which is mainly used for logging.
    pub fn summary(&self) -> String {
        format!(
            "DFA with {} states over {}, {} transitions, initial {}, accepting {}",
            self.size,
            self.alphabet.show(),
            self.transition_count(),
            self.initial.show(),
            self.accepting_states().collect_vec().show()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn construction_contract() {
        let mut dfa = DFA::new(3, Alphabet::from_iter(["x", "y"]));
        assert_eq!(dfa.transition_count(), 0);
        assert!(dfa.initial().is_err());
        assert_eq!(dfa.accepting_states().count(), 0);

        assert_eq!(dfa.add_transition(0, "x", 1), Ok(()));
        assert_eq!(
            dfa.add_transition(0, "x", 2),
            Err(DfaError::DuplicateTransition {
                state: 0,
                symbol: "x".into(),
                existing: 1
            })
        );
        assert_eq!(dfa.successor(0, "x"), Some(1));
        assert_eq!(
            dfa.add_transition(3, "x", 0),
            Err(DfaError::OutOfRangeState { state: 3, size: 3 })
        );
        assert_eq!(
            dfa.add_transition(0, "y", 7),
            Err(DfaError::OutOfRangeState { state: 7, size: 3 })
        );
        assert_eq!(
            dfa.add_transition(0, "z", 1),
            Err(DfaError::UnknownSymbol("z".into()))
        );
        assert_eq!(dfa.successor(0, "y"), None);
        assert_eq!(dfa.transition_count(), 1);

        assert!(dfa.set_initial(5).is_err());
        assert!(dfa.set_accepting(3, true).is_err());
    }

    #[test]
    fn clone_is_deep() {
        let original = crate::tests::wiki_dfa();
        let mut copy = original.clone();
        assert_eq!(original, copy);

        let q = copy.add_state(true);
        copy.add_transition(q, "a", 0).unwrap();
        assert_ne!(original, copy);
        assert_eq!(original.size(), 6);
        assert_eq!(original.successor(0, "a"), Some(1));
    }

    #[test]
    fn running_words() {
        let dfa = crate::tests::wiki_dfa();
        assert!(!dfa.accepts_chars(""));
        assert!(dfa.accepts_chars("b"));
        assert!(dfa.accepts_chars("aab"));
        assert!(dfa.accepts_chars("abaaa"));
        assert!(!dfa.accepts_chars("bb"));
        assert!(!dfa.accepts_chars("c"));
        assert_eq!(dfa.reached_state(["a", "b"]), Some(3));
        assert_eq!(dfa.reached_state_index([1, 1]), Some(5));
        assert!(dfa.accepts_indices([0, 1]));
    }

    #[test]
    fn partial_transitions() {
        let dfa = crate::tests::partial_dfa();
        assert!(!dfa.is_complete());
        assert!(crate::tests::wiki_dfa().is_complete());
        assert_eq!(dfa.successor(3, "b"), None);
        assert!(dfa.accepts_chars("ba"));
        assert!(!dfa.accepts_chars("bb"));
        assert_eq!(dfa.edges_from(0).collect::<Vec<_>>(), vec![(0, 2), (1, 3)]);
        assert_eq!(dfa.edges().count(), 6);
    }

    #[test]
    fn growing_state_by_state() {
        let mut dfa = DFA::for_alphabet(Alphabet::of_size(1));
        assert!(dfa.is_empty());
        let q0 = dfa.add_state(false);
        let q1 = dfa.add_state(true);
        dfa.add_transition(q0, "a", q1).unwrap();
        dfa.add_transition(q1, "a", q1).unwrap();
        dfa.set_initial(q0).unwrap();
        assert!(dfa.accepts_chars("aaa"));
        assert!(!dfa.accepts_chars(""));
        assert_eq!(dfa.rejecting_states().collect::<Vec<_>>(), vec![q0]);
    }

    #[test]
    fn uninitialized_accepts_nothing() {
        let mut dfa = DFA::new(1, Alphabet::of_size(1));
        dfa.set_accepting(0, true).unwrap();
        assert!(!dfa.accepts_chars(""));
        assert_eq!(dfa.reached_state_index([]), None);
    }
}
