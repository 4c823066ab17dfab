// Copyright 2026 the lr1-studio authors

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::item::{closure, goto, Item, ItemSet};
use crate::symbol::{Lookahead, Symbol};
use std::collections::BTreeMap;

/// The canonical collection: every LR(1) state reachable from state 0 under
/// CLOSURE/GOTO, plus the transition relation between them. States are
/// append-only once built; IDs are discovery order and never change.
#[derive(Debug)]
pub struct CanonicalCollection {
    states: Vec<ItemSet>,
    transitions: BTreeMap<(u32, Symbol), u32>,
}

impl CanonicalCollection {
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn state(&self, id: u32) -> &ItemSet {
        &self.states[id as usize]
    }

    pub fn transition(&self, from: u32, symbol: &Symbol) -> Option<u32> {
        self.transitions.get(&(from, symbol.clone())).copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (u32, &Symbol, u32)> {
        self.transitions.iter().map(|((s, sym), t)| (*s, sym, *t))
    }
}

/// Builds the canonical collection. State 0 is `CLOSURE({[S' -> •S, $]})`.
/// No two states in the result are set-equal.
pub fn build_canonical_collection(grammar: &Grammar, first_sets: &FirstSets) -> CanonicalCollection {
    let mut seed = ItemSet::new();
    seed.insert(Item::new(0, 0, Lookahead::EndOfInput));
    let start_state = closure(grammar, first_sets, seed);

    let mut states = vec![start_state];
    let mut transitions = BTreeMap::new();
    let mut worklist = std::collections::VecDeque::new();
    worklist.push_back(0u32);

    while let Some(state_id) = worklist.pop_front() {
        let current = states[state_id as usize].clone();
        for symbol in current.symbols_after_dot(grammar) {
            let target_items = goto(grammar, first_sets, &current, &symbol);
            if target_items.is_empty() {
                continue;
            }
            let existing = states.iter().position(|s| *s == target_items);
            let target_id = match existing {
                Some(id) => id as u32,
                None => {
                    let id = states.len() as u32;
                    states.push(target_items);
                    worklist.push_back(id);
                    id
                }
            };
            transitions.insert((state_id, symbol), target_id);
        }
    }

    CanonicalCollection { states, transitions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::read_grammar;
    use std::collections::BTreeSet;

    #[test]
    fn balanced_parens_grammar_has_four_states() {
        let grammar = read_grammar("S -> ( S ) S | ε").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        assert_eq!(collection.states().len(), 4);
    }

    #[test]
    fn no_two_states_are_set_equal() {
        let grammar =
            read_grammar("E -> E '+' T | T\nT -> T '*' F | F\nF -> ( E ) | id").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        for i in 0..collection.states().len() {
            for j in (i + 1)..collection.states().len() {
                assert_ne!(collection.state(i as u32), collection.state(j as u32));
            }
        }
    }

    #[test]
    fn expression_grammar_has_at_least_twelve_states() {
        let grammar =
            read_grammar("E -> E '+' T | T\nT -> T '*' F | F\nF -> ( E ) | id").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        assert!(collection.states().len() >= 12);
    }

    #[test]
    fn every_transition_target_is_a_valid_state_id() {
        let grammar = read_grammar("S -> i S e S | i S | a").unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        let valid: BTreeSet<u32> = (0..collection.states().len() as u32).collect();
        for (_, _, target) in collection.transitions() {
            assert!(valid.contains(&target));
        }
    }
}
