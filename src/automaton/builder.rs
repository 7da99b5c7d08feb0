use crate::prelude::*;

/// Helper struct for the construction of deterministic finite automata. It stores a list of edges,
/// a list of state colors (whether a state is accepting) and a default color for states that
/// are not explicitly colored.
///
/// The alphabet is inferred from the edges, symbols are taken in the order in which they first
/// appear. Additional symbols may be forced with [`DFABuilder::with_alphabet_symbols`]. The
/// number of states is one more than the largest state index that is mentioned anywhere,
/// unless a larger size is given with [`DFABuilder::with_size`].
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']`. The symbol `a`
/// loops on both states while `b` switches between them. State 0 should be initial and accepting.
/// ```
/// use dfamin::prelude::*;
///
/// let dfa = DFABuilder::default()
///     .with_state_colors([true, false]) // colors given in the order of the states
///     .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts_chars("abab"));
/// assert!(!dfa.accepts_chars("ab"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DFABuilder {
    symbols: Vec<String>,
    edges: Vec<(StateIndex, String, StateIndex)>,
    colors: Vec<(StateIndex, bool)>,
    default: bool,
    size: Option<usize>,
}

impl DFABuilder {
    /// Sets the color for states that have no color specified. By default states are rejecting.
    pub fn default_color(mut self, accepting: bool) -> Self {
        self.default = accepting;
        self
    }

    /// By default, the only alphabet symbols of the automaton that is built are the ones that
    /// appear on at least one transition. This method can be used to force additional symbols to
    /// appear, these are placed before all symbols that only appear on edges.
    pub fn with_alphabet_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.symbols
            .extend(symbols.into_iter().map(|s| s.to_string()));
        self
    }

    /// Forces the automaton to have at least `size` states.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds a list of colors to `self`. The colors are assigned to the states in the order in which they are given.
    /// This means if we give the colors `[true, false]`, then state `0` is accepting and state `1` is rejecting.
    pub fn with_state_colors<I: IntoIterator<Item = bool>>(self, iter: I) -> Self {
        iter.into_iter()
            .enumerate()
            .fold(self, |acc, (i, x)| acc.color(i, x))
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateIndex>>(self, iter: I) -> Self {
        iter.into_iter().fold(self, |acc, q| acc.color(q, true))
    }

    /// Sets the color of a single state.
    pub fn color(mut self, state: StateIndex, accepting: bool) -> Self {
        self.colors.push((state, accepting));
        self
    }

    /// Adds the given edges, which are triples of source state, symbol and target state.
    pub fn with_edges<I, S>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (StateIndex, S, StateIndex)>,
        S: ToString,
    {
        self.edges
            .extend(edges.into_iter().map(|(q, a, p)| (q, a.to_string(), p)));
        self
    }

    fn num_states(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|(q, _, p)| [*q, *p])
            .chain(self.colors.iter().map(|(q, _)| *q))
            .map(|q| q + 1)
            .chain(self.size)
            .max()
            .unwrap_or(0)
    }

    /// Builds the automaton without setting an initial state.
    pub fn into_uninitialized_dfa(self) -> Result<DFA, DfaError> {
        let alphabet = Alphabet::from_iter(
            self.symbols
                .iter()
                .cloned()
                .chain(self.edges.iter().map(|(_, a, _)| a.clone())),
        );
        let mut dfa = DFA::new(self.num_states(), alphabet);
        for q in dfa.state_indices() {
            dfa.set_accepting(q, self.default)?;
        }
        for (q, accepting) in self.colors {
            dfa.set_accepting(q, accepting)?;
        }
        for (q, a, p) in self.edges {
            dfa.add_transition(q, &a, p)?;
        }
        Ok(dfa)
    }

    /// Builds the automaton with the given initial state. Fails if the edges are not deterministic
    /// or the initial state does not exist.
    pub fn into_dfa(self, initial: StateIndex) -> Result<DFA, DfaError> {
        let mut dfa = self.into_uninitialized_dfa()?;
        dfa.set_initial(initial)?;
        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn infers_alphabet_and_size() {
        let dfa = DFABuilder::default()
            .with_edges([(0, "one", 1), (1, "zero", 3)])
            .with_alphabet_symbols(["two"])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.size(), 4);
        assert_eq!(
            dfa.alphabet().universe().collect::<Vec<_>>(),
            vec!["two", "one", "zero"]
        );
        assert_eq!(dfa.accepting_states().count(), 0);
    }

    #[test]
    fn colors_and_default() {
        let dfa = DFABuilder::default()
            .default_color(true)
            .with_size(3)
            .color(1, false)
            .into_dfa(2)
            .unwrap();
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(dfa.initial(), Ok(2));
    }

    #[test]
    fn rejects_nondeterminism() {
        let result = DFABuilder::default()
            .with_edges([(0, 'a', 1), (0, 'a', 0)])
            .into_dfa(0);
        assert!(matches!(
            result,
            Err(DfaError::DuplicateTransition { state: 0, .. })
        ));
    }

    #[test]
    fn rejects_missing_initial() {
        let result = DFABuilder::default().with_edges([(0, 'a', 1)]).into_dfa(2);
        assert_eq!(result, Err(DfaError::OutOfRangeState { state: 2, size: 2 }));
    }
}
