/// Deals with analysing reachability in automata.
pub mod reachable;
pub use reachable::{MinimalRepresentative, MinimalRepresentatives, ReachableStateIndices};

/// Pairwise exploration of two automata, used for separating states and checking equivalence.
pub mod product;

mod trim;

/// Defines the quotient of an automaton with respect to a partition of its states.
pub mod quotient;
pub use quotient::Quotient;

mod table;

/// Export of automata in the DOT format of graphviz.
pub mod dot;
