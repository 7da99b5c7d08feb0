use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::prelude::*;

mod partition_refinement;
pub use partition_refinement::{moore_partition, partition_refinement};

mod table_filling;
pub use table_filling::{distinguishability_table, table_filling, DistinguishabilityTable};

/// Selects which algorithm is used for computing a minimal automaton. Both produce automata with
/// the same number of states, they only differ in how the equivalence of states is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MinimizationAlgorithm {
    /// Moore style partition refinement, see [`partition_refinement`].
    #[default]
    PartitionRefinement,
    /// Myhill-Nerode style table filling, see [`table_filling`].
    TableFilling,
}

/// Raised when parsing a [`MinimizationAlgorithm`] from an unknown name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown minimization algorithm \"{0}\", expected one of moore, partition, table or myhill-nerode")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for MinimizationAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moore" | "partition" => Ok(Self::PartitionRefinement),
            "table" | "myhill-nerode" => Ok(Self::TableFilling),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl Display for MinimizationAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::PartitionRefinement => "moore",
                Self::TableFilling => "table",
            }
        )
    }
}

impl MinimizationAlgorithm {
    /// Runs the algorithm on the given automaton, see [`DFA::minimize_with`].
    pub fn run(&self, dfa: &DFA) -> Result<DFA, DfaError> {
        match self {
            Self::PartitionRefinement => partition_refinement(dfa),
            Self::TableFilling => table_filling(dfa),
        }
    }
}

impl DFA {
    /// Returns the minimal automaton that accepts the same language as `self`, computed with
    /// partition refinement. The result has no unreachable states. Fails if no initial state
    /// is set.
    ///
    /// # Example
    /// ```
    /// use dfamin::prelude::*;
    ///
    /// // accepts all words over {a, b} that contain at least one b
    /// let dfa = DFABuilder::default()
    ///     .with_accepting([1, 2])
    ///     .with_edges([
    ///         (0, 'a', 0),
    ///         (0, 'b', 1),
    ///         (1, 'a', 2),
    ///         (1, 'b', 2),
    ///         (2, 'a', 1),
    ///         (2, 'b', 1),
    ///     ])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let minimal = dfa.minimize().unwrap();
    /// assert_eq!(minimal.size(), 2);
    /// assert!(minimal.accepts_chars("aab"));
    /// assert!(!minimal.accepts_chars("aa"));
    /// ```
    pub fn minimize(&self) -> Result<DFA, DfaError> {
        self.minimize_with(MinimizationAlgorithm::default())
    }

    /// Minimizes `self` with the given [`MinimizationAlgorithm`].
    pub fn minimize_with(&self, algorithm: MinimizationAlgorithm) -> Result<DFA, DfaError> {
        algorithm.run(self)
    }
}

/// Creates an automaton with a single state that loops on every symbol.
fn single_state(alphabet: &Alphabet, accepting: bool) -> Result<DFA, DfaError> {
    let mut dfa = DFA::new(1, alphabet.clone());
    for a in alphabet.indices() {
        dfa.add_transition_index(0, a, 0)?;
    }
    dfa.set_accepting(0, accepting)?;
    dfa.set_initial(0)?;
    Ok(dfa)
}

/// Handles the automata whose minimal automaton is known without any computation. Only the
/// states reachable from the initial state are considered. If none of them accepts, the language
/// is empty. If all of them accept and none lacks a transition, every word is accepted. In both
/// cases the result is a single state with a loop on every symbol. An automaton in which every
/// reachable state accepts but some reachable transition is missing does not accept every word,
/// so it is left to the general procedure.
pub(crate) fn trivial_minimum(dfa: &DFA) -> Result<Option<DFA>, DfaError> {
    dfa.initial()?;
    let reachable = dfa.reachable_state_indices().collect_vec();
    if !reachable.iter().any(|&q| dfa.is_accepting(q)) {
        debug!("no reachable state is accepting, the language is empty");
        return single_state(dfa.alphabet(), false).map(Some);
    }
    if reachable.iter().all(|&q| {
        dfa.is_accepting(q) && dfa.edges_from(q).count() == dfa.alphabet().size()
    }) {
        debug!("every reachable state is accepting, the language is universal");
        return single_state(dfa.alphabet(), true).map(Some);
    }
    Ok(None)
}

/// Builds the quotient of `dfa` with respect to a partition into equivalence classes and removes
/// the classes that are not reachable.
pub(crate) fn collapse(dfa: &DFA, partition: Partition) -> Result<DFA, DfaError> {
    let quotient = Quotient::new(dfa, partition)?;
    debug_assert!(
        quotient.is_congruence(),
        "equivalence classes must form a congruence"
    );
    let minimal = quotient.collect_dfa()?.trim()?;
    debug!(
        "collapsed {} states into {} classes, {} of which are reachable",
        dfa.size(),
        quotient.size(),
        minimal.size()
    );
    Ok(minimal)
}
