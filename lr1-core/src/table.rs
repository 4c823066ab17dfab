// Copyright 2026 the lr1-studio authors
//
// Conflicts are recorded as data rather than resolved by precedence: there
// is no precedence/associativity mechanism here, so every alternative
// written to a cell is kept verbatim.

use crate::grammar::Grammar;
use crate::item::Item;
use crate::symbol::{Lookahead, SymName, Symbol};
use crate::collection::CanonicalCollection;
use std::collections::BTreeMap;

/// One non-conflicting decision for an ACTION cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(u32),
    Reduce(u32),
    Accept,
}

/// An ACTION cell: a single decision, or — when the grammar is not LR(1) —
/// every decision that was written to it, in the order discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCell {
    Single(Action),
    Conflict(Vec<Action>),
}

impl ActionCell {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ActionCell::Conflict(_))
    }

    /// The driver's fallback on a conflict cell: take the first alternative
    /// discovered.
    pub fn first_action(&self) -> &Action {
        match self {
            ActionCell::Single(action) => action,
            ActionCell::Conflict(actions) => &actions[0],
        }
    }

    fn write(self_opt: &mut Option<ActionCell>, action: Action) {
        *self_opt = Some(match self_opt.take() {
            None => ActionCell::Single(action),
            Some(ActionCell::Single(existing)) => {
                if existing == action {
                    ActionCell::Single(existing)
                } else {
                    ActionCell::Conflict(vec![existing, action])
                }
            }
            Some(ActionCell::Conflict(mut existing)) => {
                if !existing.contains(&action) {
                    existing.push(action);
                }
                ActionCell::Conflict(existing)
            }
        });
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    action: BTreeMap<(u32, Lookahead), ActionCell>,
    goto: BTreeMap<(u32, SymName), u32>,
}

impl Tables {
    pub fn action(&self, state: u32, lookahead: &Lookahead) -> Option<&ActionCell> {
        self.action.get(&(state, lookahead.clone()))
    }

    pub fn goto_state(&self, state: u32, non_terminal: &SymName) -> Option<u32> {
        self.goto.get(&(state, non_terminal.clone())).copied()
    }

    pub fn action_entries(&self) -> impl Iterator<Item = (u32, &Lookahead, &ActionCell)> {
        self.action.iter().map(|((s, la), cell)| (*s, la, cell))
    }

    pub fn goto_entries(&self) -> impl Iterator<Item = (u32, &SymName, u32)> {
        self.goto.iter().map(|((s, nt), t)| (*s, nt, *t))
    }

    /// True iff any ACTION cell is a conflict: the grammar is not LR(1).
    pub fn has_conflicts(&self) -> bool {
        self.action.values().any(ActionCell::is_conflict)
    }
}

/// Emits ACTION and GOTO from the canonical collection.
pub fn synthesize_tables(grammar: &Grammar, collection: &CanonicalCollection) -> Tables {
    let mut tables = Tables::default();
    let mut action_slots: BTreeMap<(u32, Lookahead), Option<ActionCell>> = BTreeMap::new();

    for (state_id, state) in collection.states().iter().enumerate() {
        let state_id = state_id as u32;
        for item in state.iter() {
            write_item_action(
                grammar,
                collection,
                state_id,
                item,
                &mut action_slots,
            );
        }
    }
    for ((state_id, lookahead), cell) in action_slots {
        if let Some(cell) = cell {
            tables.action.insert((state_id, lookahead), cell);
        }
    }

    for (state_id, symbol, target) in collection.transitions() {
        if let Symbol::NonTerminal(name) = symbol {
            tables.goto.insert((state_id, name.clone()), target);
        }
    }

    tables
}

fn write_item_action(
    grammar: &Grammar,
    collection: &CanonicalCollection,
    state_id: u32,
    item: &Item,
    action_slots: &mut BTreeMap<(u32, Lookahead), Option<ActionCell>>,
) {
    match item.next_symbol(grammar) {
        Some(Symbol::Terminal(terminal)) => {
            if let Some(target) = collection.transition(state_id, &Symbol::Terminal(terminal.clone())) {
                let lookahead = Lookahead::Terminal(terminal.clone());
                let slot = action_slots.entry((state_id, lookahead)).or_insert(None);
                ActionCell::write(slot, Action::Shift(target));
            }
        }
        Some(Symbol::NonTerminal(_)) => {}
        None => {
            let production = grammar.production(item.production);
            let is_accept = production.lhs() == grammar.augmented_start()
                && item.lookahead == Lookahead::EndOfInput;
            let slot = action_slots
                .entry((state_id, item.lookahead.clone()))
                .or_insert(None);
            if is_accept {
                ActionCell::write(slot, Action::Accept);
            } else {
                ActionCell::write(slot, Action::Reduce(item.production));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first::FirstSets;
    use crate::grammar::read_grammar;
    use crate::collection::build_canonical_collection;

    fn build(text: &str) -> (Grammar, CanonicalCollection, Tables) {
        let grammar = read_grammar(text).unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        let tables = synthesize_tables(&grammar, &collection);
        (grammar, collection, tables)
    }

    #[test]
    fn accept_appears_exactly_once() {
        let (_, _, tables) = build("S -> ( S ) S | ε");
        let accepts: Vec<_> = tables
            .action_entries()
            .filter(|(_, _, cell)| matches!(cell, ActionCell::Single(Action::Accept)))
            .collect();
        assert_eq!(accepts.len(), 1);
    }

    #[test]
    fn dangling_else_grammar_has_a_shift_reduce_conflict() {
        let (_, _, tables) = build("S -> i S e S | i S | a");
        let has_sr_conflict = tables.action_entries().any(|(_, _, cell)| {
            if let ActionCell::Conflict(actions) = cell {
                actions.iter().any(|a| matches!(a, Action::Shift(_)))
                    && actions.iter().any(|a| matches!(a, Action::Reduce(_)))
            } else {
                false
            }
        });
        assert!(has_sr_conflict);
        assert!(tables.has_conflicts());
    }

    #[test]
    fn expression_grammar_has_no_conflicts() {
        let (_, _, tables) = build("E -> E '+' T | T\nT -> T '*' F | F\nF -> ( E ) | id");
        assert!(!tables.has_conflicts());
    }

    #[test]
    fn shift_target_matches_goto_relation() {
        let (_, collection, tables) = build("E -> E '+' T | T\nT -> T '*' F | F\nF -> ( E ) | id");
        for (state, lookahead, cell) in tables.action_entries() {
            if let ActionCell::Single(Action::Shift(target)) = cell {
                if let Some(terminal) = lookahead.as_terminal() {
                    let via_transition =
                        collection.transition(state, &Symbol::Terminal(terminal.clone()));
                    assert_eq!(via_transition, Some(*target));
                }
            }
        }
    }
}
