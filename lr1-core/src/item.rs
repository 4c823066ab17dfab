// Copyright 2026 the lr1-studio authors
//
// Items carry their lookahead directly rather than being split into a
// kernel key plus a separately-merged lookahead set: there is no LALR-style
// state merging here, so canonical states are compared by full item-set
// equality (see CanonicalCollection and the note on `ItemSet`'s `PartialEq`).

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::symbol::{Lookahead, Symbol};
use std::collections::BTreeSet;
use std::fmt;

/// A single LR(1) item `(lhs, rhs, dot_position, lookahead)`. `production`
/// is an index into `Grammar::productions`, not an owned copy, so items
/// stay cheap to clone into and out of item sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: u32,
    pub dot: usize,
    pub lookahead: Lookahead,
}

impl Item {
    pub fn new(production: u32, dot: usize, lookahead: Lookahead) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    /// The symbol immediately after the dot, if any. An item whose
    /// right-hand side is `[ε]` is always complete regardless of `dot`.
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        let production = grammar.production(self.production);
        if production.is_epsilon() {
            None
        } else {
            production.rhs().get(self.dot)
        }
    }

    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.next_symbol(grammar).is_none()
    }

    /// The symbols after the advanced-over one, i.e. `β` in `A -> α•Xβ`,
    /// used to compute `FIRST(βa)` during CLOSURE.
    pub fn tail_after_dot<'g>(&self, grammar: &'g Grammar) -> &'g [Symbol] {
        let production = grammar.production(self.production);
        let rhs = production.rhs();
        if self.dot + 1 >= rhs.len() {
            &[]
        } else {
            &rhs[self.dot + 1..]
        }
    }

    pub fn shifted(&self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }

    pub fn render(&self, grammar: &Grammar) -> String {
        let production = grammar.production(self.production);
        let rhs = production.rhs();
        let body = if rhs.is_empty() {
            "ε • ".to_string()
        } else {
            let mut parts: Vec<String> = rhs[..self.dot].iter().map(|s| s.to_string()).collect();
            parts.push("•".to_string());
            parts.extend(rhs[self.dot..].iter().map(|s| s.to_string()));
            parts.join(" ")
        };
        format!("[{} -> {}, {}]", production.lhs(), body, self.lookahead)
    }
}

/// A closed set of LR(1) items: an automaton state. Equality is full set
/// equality over `(lhs, rhs, dot, lookahead)`, which is how duplicate
/// states are detected during canonical-collection construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet(BTreeSet<Item>);

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self(items.into_iter().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, item: Item) -> bool {
        self.0.insert(item)
    }

    /// Every symbol immediately after a dot across all items in the set;
    /// these are exactly the symbols GOTO can be computed for.
    pub fn symbols_after_dot(&self, grammar: &Grammar) -> BTreeSet<Symbol> {
        self.0
            .iter()
            .filter_map(|item| item.next_symbol(grammar).cloned())
            .collect()
    }
}

/// `CLOSURE(I)`: repeatedly add `[B -> •γ, b]` for every item
/// `[A -> α•Bβ, a]` with `B` a non-terminal and `b ∈ FIRST(βa)\{ε}`, until a
/// fixed point. Terminates because the universe of items drawn from a
/// fixed grammar is finite.
pub fn closure(grammar: &Grammar, first_sets: &FirstSets, seed: ItemSet) -> ItemSet {
    let mut items = seed;
    let mut additions_made = true;
    while additions_made {
        additions_made = false;
        let current: Vec<Item> = items.iter().cloned().collect();
        for item in &current {
            let Some(Symbol::NonTerminal(non_terminal)) = item.next_symbol(grammar) else {
                continue;
            };
            let tail = item.tail_after_dot(grammar);
            let lookaheads = first_sets.first_of_tail_with_lookahead(tail, &item.lookahead);
            for production in grammar.productions() {
                if production.lhs() != non_terminal {
                    continue;
                }
                for lookahead in &lookaheads {
                    let candidate = Item::new(production.index(), 0, lookahead.clone());
                    if items.insert(candidate) {
                        additions_made = true;
                    }
                }
            }
        }
    }
    items
}

/// `GOTO(I, X)`: advance the dot over `X` in every item of `I` that admits
/// it, then close the result. An empty advance yields an empty (no
/// transition) set.
pub fn goto(grammar: &Grammar, first_sets: &FirstSets, items: &ItemSet, symbol: &Symbol) -> ItemSet {
    let advanced: ItemSet = ItemSet::from_items(items.iter().filter_map(|item| {
        if item.next_symbol(grammar) == Some(symbol) {
            Some(item.shifted())
        } else {
            None
        }
    }));
    if advanced.is_empty() {
        advanced
    } else {
        closure(grammar, first_sets, advanced)
    }
}
