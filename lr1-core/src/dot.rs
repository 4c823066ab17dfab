// Copyright 2026 the lr1-studio authors

use crate::collection::CanonicalCollection;
use crate::grammar::Grammar;
use crate::symbol::Lookahead;
use crate::table::{Action, Tables};

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Serializes the canonical collection and its transitions into a
/// directed-graph textual description, plus a synthetic accept node fed
/// by every accepting state.
pub fn export_dot(grammar: &Grammar, collection: &CanonicalCollection, tables: &Tables) -> String {
    let mut out = String::new();
    out.push_str("digraph LR1 {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fillcolor=\"#ffffff\"];\n");

    for (id, state) in collection.states().iter().enumerate() {
        let items_txt = state
            .iter()
            .map(|item| escape(&item.render(grammar)))
            .collect::<Vec<_>>()
            .join("\\n");
        out.push_str(&format!(
            "  I{} [label=\"I{}\\n{}\"];\n",
            id, id, items_txt
        ));
    }

    for (from, symbol, to) in collection.transitions() {
        out.push_str(&format!(
            "  I{} -> I{} [label=\"{}\"];\n",
            from,
            to,
            escape(symbol.name())
        ));
    }

    let accepts: Vec<u32> = tables
        .action_entries()
        .filter(|(_, lookahead, cell)| {
            **lookahead == Lookahead::EndOfInput
                && matches!(cell.first_action(), Action::Accept)
        })
        .map(|(state, _, _)| state)
        .collect();
    if !accepts.is_empty() {
        out.push_str("  Accept [shape=doublecircle];\n");
        for state in accepts {
            out.push_str(&format!("  I{} -> Accept [label=\"$\"];\n", state));
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::build_canonical_collection;
    use crate::first::FirstSets;
    use crate::grammar::read_grammar;
    use crate::table::synthesize_tables;

    #[test]
    fn dot_export_contains_one_node_per_state_and_an_accept_edge() {
        let grammar = read_grammar("S -> ( S ) S | ε").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        let tables = synthesize_tables(&grammar, &collection);
        let dot = export_dot(&grammar, &collection, &tables);
        assert!(dot.starts_with("digraph LR1 {"));
        for id in 0..collection.states().len() {
            assert!(dot.contains(&format!("I{} [label=", id)));
        }
        assert!(dot.contains("Accept [shape=doublecircle]"));
    }

    #[test]
    fn quotes_and_backslashes_in_symbol_names_are_escaped() {
        let grammar = read_grammar("S -> 'a\"b'").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        let tables = synthesize_tables(&grammar, &collection);
        let dot = export_dot(&grammar, &collection, &tables);
        assert!(dot.contains("a\\\"b"));
    }
}
