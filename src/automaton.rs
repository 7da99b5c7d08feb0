mod dfa;
pub use dfa::{StateIndex, DFA};

mod builder;
pub use builder::DFABuilder;
