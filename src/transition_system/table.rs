use owo_colors::OwoColorize;

use crate::prelude::*;

impl DFA {
    /// Returns a string representation of the transition table of the automaton. The first
    /// column contains the states, decorated by `state_decorator`, followed by one column per
    /// symbol. Missing transitions are shown as `-`.
    pub fn build_transition_table<SD>(&self, state_decorator: SD) -> String
    where
        SD: Fn(StateIndex, bool, bool) -> String,
    {
        let initial = self.initial().ok();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet().universe().map(String::from)),
        );
        for q in self.state_indices() {
            let mut row = vec![state_decorator(
                q,
                Some(q) == initial,
                self.is_accepting(q),
            )];
            for a in self.alphabet().indices() {
                row.push(self.successor_index(q, a).show());
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    /// Renders the transition table with the initial state marked by an arrow and accepting
    /// states highlighted in color, for printing on a terminal.
    pub fn colored_transition_table(&self) -> String {
        self.build_transition_table(|q, initial, accepting| {
            let name = plain_state_name(q, initial, accepting);
            if accepting {
                name.green().bold().to_string()
            } else {
                name
            }
        })
    }
}

fn plain_state_name(q: StateIndex, initial: bool, accepting: bool) -> String {
    format!(
        "{}{}{}",
        if initial { "→ " } else { "" },
        q.show(),
        if accepting { " *" } else { "" }
    )
}

/// Displays the transition table, the initial state is marked with an arrow and accepting
/// states with an asterisk.
impl std::fmt::Display for DFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_transition_table(plain_state_name))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn transition_table() {
        let table = crate::tests::partial_dfa().to_string();
        let lines: Vec<_> = table.lines().collect();
        assert!(lines[1].contains("State"));
        for q in 0..4usize {
            assert!(table.contains(&q.show()));
        }
        assert!(table.contains("→ q0"));
        assert!(table.contains("q3 *"));
        // the missing transitions of states 1 and 3 on b
        assert_eq!(table.matches(" - ").count(), 2);
    }

    #[test]
    fn colored_table_keeps_structure() {
        let dfa = crate::tests::wiki_dfa();
        let colored = dfa.colored_transition_table();
        assert!(colored.contains("→ q0"));
        assert!(colored.contains("\u{1b}["));
        assert_eq!(colored.lines().count(), dfa.to_string().lines().count());
    }
}
