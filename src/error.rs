use thiserror::Error;

use crate::automaton::StateIndex;

/// Errors that are raised when an automaton is constructed or when an operation is invoked on an
/// automaton that does not satisfy its preconditions. Construction errors are reported by the very
/// call that would have introduced the violation, so an automaton is never left in an invalid state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DfaError {
    /// A transition or state property refers to a state that does not exist.
    #[error("state {state} is out of range, the automaton has {size} states")]
    OutOfRangeState {
        /// The offending state index.
        state: StateIndex,
        /// The number of states of the automaton.
        size: usize,
    },
    /// A second transition was added for a state and symbol that already has one.
    #[error("state {state} already has a transition on \"{symbol}\" (leading to {existing})")]
    DuplicateTransition {
        /// The source state of the transition.
        state: StateIndex,
        /// The symbol on which the transition is taken.
        symbol: String,
        /// The target of the transition that already exists.
        existing: StateIndex,
    },
    /// A transition was added on a symbol that does not belong to the alphabet.
    #[error("symbol \"{0}\" is not part of the alphabet")]
    UnknownSymbol(String),
    /// An operation that needs the initial state was invoked before it was set.
    #[error("the automaton has no initial state")]
    UninitializedAutomaton,
    /// Two automata over different alphabets were compared.
    #[error("the alphabets {left} and {right} differ")]
    AlphabetMismatch {
        /// The alphabet of the left automaton.
        left: String,
        /// The alphabet of the right automaton.
        right: String,
    },
    /// A partition does not assign exactly one class to every state.
    #[error("state {0} is not covered by exactly one class of the partition")]
    InvalidPartition(StateIndex),
}

#[cfg(test)]
mod tests {
    use super::DfaError;

    #[test]
    fn error_messages() {
        assert_eq!(
            DfaError::OutOfRangeState { state: 4, size: 2 }.to_string(),
            "state 4 is out of range, the automaton has 2 states"
        );
        assert_eq!(
            DfaError::DuplicateTransition {
                state: 0,
                symbol: "a".into(),
                existing: 1
            }
            .to_string(),
            "state 0 already has a transition on \"a\" (leading to 1)"
        );
    }
}
