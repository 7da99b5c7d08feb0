use itertools::Itertools;

use crate::prelude::*;

/// Escapes a label so that it can be placed inside double quotes in a DOT file.
fn sanitize_dot_label(label: &str) -> String {
    label
        .chars()
        .flat_map(|chr| match chr {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            w if w.is_whitespace() => vec![' '],
            c => vec![c],
        })
        .collect()
}

impl DFA {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// Accepting states are drawn as double circles and an invisible node points to the initial
    /// state. Parallel transitions between the same pair of states are merged into a single edge
    /// whose label lists the symbols separated by commas.
    pub fn dot_representation(&self) -> String {
        let mut lines = vec!["digraph A {".to_string(), "rankdir=LR".to_string()];

        if let Ok(initial) = self.initial() {
            lines.push("init [label=\"\", shape=none, width=0, height=0]".to_string());
            lines.push(format!("init -> {}", initial.show()));
        }

        lines.extend(self.state_indices().map(|q| {
            format!(
                "{} [label=\"{}\", shape={}]",
                q.show(),
                q.show(),
                if self.is_accepting(q) {
                    "doublecircle"
                } else {
                    "circle"
                }
            )
        }));

        lines.extend(self.state_indices().flat_map(|q| {
            self.edges_from(q)
                .into_group_map_by(|(_, p)| *p)
                .into_iter()
                .sorted_by_key(|(p, _)| *p)
                .map(move |(p, symbols)| {
                    format!(
                        "{} -> {} [label=\"{}\"]",
                        q.show(),
                        p.show(),
                        symbols
                            .into_iter()
                            .filter_map(|(a, _)| self.alphabet().symbol(a))
                            .map(sanitize_dot_label)
                            .join(", ")
                    )
                })
        }));

        lines.push("}".to_string());
        lines.join("\n")
    }
}
