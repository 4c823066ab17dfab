// Copyright 2026 the lr1-studio authors

use crate::grammar::Grammar;
use crate::symbol::{Lookahead, SymName, Symbol};
use std::collections::{BTreeMap, BTreeSet};

/// FIRST(X) for every symbol, computed to a fixed point.
#[derive(Debug, Default)]
pub struct FirstSets {
    terminals: BTreeMap<SymName, BTreeSet<SymName>>,
    non_terminals: BTreeMap<SymName, (BTreeSet<SymName>, bool)>,
}

impl FirstSets {
    pub fn compute(grammar: &Grammar) -> Self {
        let mut non_terminals: BTreeMap<SymName, (BTreeSet<SymName>, bool)> = grammar
            .non_terminals()
            .map(|nt| (nt.clone(), (BTreeSet::new(), false)))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let lhs = production.lhs().clone();
                if production.is_epsilon() {
                    let entry = non_terminals.get_mut(&lhs).unwrap();
                    if !entry.1 {
                        entry.1 = true;
                        changed = true;
                    }
                    continue;
                }
                let mut additions: BTreeSet<SymName> = BTreeSet::new();
                let mut all_nullable = true;
                for symbol in production.rhs() {
                    let (terms, nullable) = match symbol {
                        Symbol::Terminal(name) => {
                            let mut set = BTreeSet::new();
                            set.insert(name.clone());
                            (set, false)
                        }
                        Symbol::NonTerminal(name) => {
                            let (terms, nullable) = non_terminals
                                .get(name)
                                .cloned()
                                .unwrap_or_default();
                            (terms, nullable)
                        }
                    };
                    additions.extend(terms);
                    if !nullable {
                        all_nullable = false;
                        break;
                    }
                }
                let entry = non_terminals.get_mut(&lhs).unwrap();
                let before = entry.0.len();
                entry.0.extend(additions);
                if entry.0.len() != before {
                    changed = true;
                }
                if all_nullable && !entry.1 {
                    entry.1 = true;
                    changed = true;
                }
            }
        }

        let terminals = grammar
            .terminals()
            .map(|t| {
                let mut set = BTreeSet::new();
                set.insert(t.clone());
                (t.clone(), set)
            })
            .collect();

        Self {
            terminals,
            non_terminals,
        }
    }

    fn first_of_symbol(&self, symbol: &Symbol) -> (BTreeSet<SymName>, bool) {
        match symbol {
            Symbol::Terminal(name) => {
                let mut set = BTreeSet::new();
                set.insert(name.clone());
                (set, false)
            }
            Symbol::NonTerminal(name) => self
                .non_terminals
                .get(name)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// FIRST(β) for an arbitrary symbol string; the empty string's FIRST is
    /// `{ε}`. This is CLOSURE's hot inner call.
    pub fn first_of_string(&self, symbols: &[Symbol]) -> (BTreeSet<SymName>, bool) {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            let (terms, nullable) = self.first_of_symbol(symbol);
            result.extend(terms);
            if !nullable {
                return (result, false);
            }
        }
        (result, true)
    }

    /// FIRST(β·a): the tail `β` of an item's right-hand side followed by its
    /// current lookahead `a`, used directly by CLOSURE.
    pub fn first_of_tail_with_lookahead(
        &self,
        tail: &[Symbol],
        trailing: &Lookahead,
    ) -> BTreeSet<Lookahead> {
        let (terms, nullable) = self.first_of_string(tail);
        let mut result: BTreeSet<Lookahead> =
            terms.into_iter().map(|t| Lookahead::Terminal(t)).collect();
        if nullable {
            result.insert(trailing.clone());
        }
        result
    }

    /// Per-non-terminal FIRST table, sorted, for display.
    pub fn table(&self) -> Vec<(SymName, Vec<SymName>)> {
        self.non_terminals
            .iter()
            .map(|(nt, (terms, nullable))| {
                let mut entries: Vec<SymName> = terms.iter().cloned().collect();
                if *nullable {
                    entries.push(SymName::from("ε"));
                }
                (nt.clone(), entries)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::read_grammar;

    #[test]
    fn first_of_nullable_chain_includes_epsilon_only_when_all_nullable() {
        let grammar = read_grammar("S -> A B\nA -> a | ε\nB -> b | ε").unwrap();
        let first = FirstSets::compute(&grammar);
        let table: std::collections::BTreeMap<_, _> = first
            .table()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let s_first: BTreeSet<String> = table["S"].iter().map(|s| s.to_string()).collect();
        assert!(s_first.contains("a"));
        assert!(s_first.contains("b"));
        assert!(s_first.contains("ε"));
    }

    #[test]
    fn first_is_monotone_under_production_growth() {
        let small = read_grammar("S -> a").unwrap();
        let small_first = FirstSets::compute(&small);
        let small_set: BTreeSet<String> = small_first
            .table()
            .into_iter()
            .find(|(k, _)| k.as_ref() == "S")
            .unwrap()
            .1
            .iter()
            .map(|s| s.to_string())
            .collect();

        let grown = read_grammar("S -> a\nS -> b").unwrap();
        let grown_first = FirstSets::compute(&grown);
        let grown_set: BTreeSet<String> = grown_first
            .table()
            .into_iter()
            .find(|(k, _)| k.as_ref() == "S")
            .unwrap()
            .1
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(small_set.is_subset(&grown_set));
    }
}
