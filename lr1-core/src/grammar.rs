// Copyright 2026 the lr1-studio authors

use crate::symbol::{sym_name, SymName, Symbol};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

lazy_static! {
    static ref ARROW_RE: Regex = Regex::new(r"->|→").unwrap();
    static ref RHS_TOKEN_RE: Regex = Regex::new(r"'([^']*)'|([()])|([^\s()']+)").unwrap();
}

#[derive(Debug)]
struct ProductionData {
    index: u32,
    lhs: SymName,
    rhs: Vec<Symbol>,
}

/// `(lhs, rhs)` plus the insertion-order index that doubles as the reduce
/// identifier. Cheaply cloneable, since every item in every state holds one.
#[derive(Debug, Clone)]
pub struct Production(Rc<ProductionData>);

impl Production {
    fn new(index: u32, lhs: SymName, rhs: Vec<Symbol>) -> Self {
        Self(Rc::new(ProductionData { index, lhs, rhs }))
    }

    pub fn index(&self) -> u32 {
        self.0.index
    }

    pub fn lhs(&self) -> &SymName {
        &self.0.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.0.rhs
    }

    /// An empty right-hand side *is* the ε production: ε marks an empty
    /// right-hand side and is never pushed on the stack.
    pub fn is_epsilon(&self) -> bool {
        self.0.rhs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.rhs.len()
    }
}

impl PartialEq for Production {
    fn eq(&self, other: &Self) -> bool {
        self.0.index == other.0.index
    }
}
impl Eq for Production {}

impl PartialOrd for Production {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Production {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.index.cmp(&other.0.index)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "{} -> ε", self.lhs())
        } else {
            write!(f, "{} ->", self.lhs())?;
            for symbol in self.rhs() {
                write!(f, " {}", symbol)?;
            }
            Ok(())
        }
    }
}

/// One row of the augmented-grammar listing: every dot position of a
/// production rendered out.
#[derive(Debug, Clone)]
pub struct AugmentedRow {
    pub lhs: String,
    pub rhs: String,
    pub production: String,
}

#[derive(Debug)]
pub struct Grammar {
    productions: Vec<Production>,
    start_symbol: SymName,
    augmented_start: SymName,
    non_terminals: BTreeSet<SymName>,
    terminals: BTreeSet<SymName>,
}

impl Grammar {
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: u32) -> &Production {
        &self.productions[index as usize]
    }

    pub fn start_symbol(&self) -> &SymName {
        &self.start_symbol
    }

    pub fn augmented_start(&self) -> &SymName {
        &self.augmented_start
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &SymName> {
        self.non_terminals.iter()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &SymName> {
        self.terminals.iter()
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.non_terminals.iter().any(|n| n.as_ref() == name)
    }

    /// Production 0, `S' -> S`.
    pub fn augmented_production(&self) -> &Production {
        &self.productions[0]
    }

    /// Every dot position of every production, for the assembled report's
    /// `augmented_grammar` field.
    pub fn augmented_listing(&self) -> Vec<AugmentedRow> {
        let mut rows = Vec::new();
        for production in &self.productions {
            let rhs = production.rhs();
            if rhs.is_empty() {
                // ε production: only dot position is past the (absent) ε.
                let rhs_str = "ε •".to_string();
                rows.push(AugmentedRow {
                    lhs: production.lhs().to_string(),
                    rhs: rhs_str.clone(),
                    production: format!("{} -> {}", production.lhs(), rhs_str),
                });
                continue;
            }
            for dot in 0..=rhs.len() {
                let mut parts: Vec<String> = rhs[..dot].iter().map(|s| s.to_string()).collect();
                parts.push("•".to_string());
                parts.extend(rhs[dot..].iter().map(|s| s.to_string()));
                let rhs_str = parts.join(" ");
                rows.push(AugmentedRow {
                    lhs: production.lhs().to_string(),
                    rhs: rhs_str.clone(),
                    production: format!("{} -> {}", production.lhs(), rhs_str),
                });
            }
        }
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyGrammarError;

impl fmt::Display for EmptyGrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "empty grammar")
    }
}

/// Tokenizes one alternative's right-hand side text: whitespace separates
/// symbols, `'...'` is a literal terminal with quotes stripped, `(` and `)`
/// are always standalone, ε/epsilon/empty yields the ε production.
fn tokenize_rhs(rhs: &str) -> Vec<String> {
    let trimmed = rhs.trim();
    if trimmed.is_empty() || trimmed == "ε" || trimmed == "epsilon" {
        return Vec::new();
    }
    RHS_TOKEN_RE
        .captures_iter(trimmed)
        .map(|caps| {
            if let Some(literal) = caps.get(1) {
                literal.as_str().to_string()
            } else if let Some(paren) = caps.get(2) {
                paren.as_str().to_string()
            } else {
                caps.get(3).unwrap().as_str().to_string()
            }
        })
        .collect()
}

/// Splits a grammar-reader line on `->`/`→`. Malformed lines (no arrow, or
/// more than one) are skipped silently.
fn split_arrow(line: &str) -> Option<(String, String)> {
    let normalized = line.replace('\u{00a0}', " ");
    let mut arrows = ARROW_RE.find_iter(&normalized);
    let first = arrows.next()?;
    if arrows.next().is_some() {
        return None;
    }
    let lhs = normalized[..first.start()].trim().to_string();
    let rhs = normalized[first.end()..].trim().to_string();
    if lhs.is_empty() {
        return None;
    }
    Some((lhs, rhs))
}

/// Reads a textual grammar into a fully classified [`Grammar`]. Lines
/// beginning with `|` continue the previous left-hand side.
pub fn read_grammar(text: &str) -> Result<Grammar, EmptyGrammarError> {
    let mut raw_productions: Vec<(SymName, Vec<String>)> = Vec::new();
    let mut current_lhs: Option<SymName> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('|') {
            if let Some(lhs) = current_lhs.clone() {
                raw_productions.push((lhs, tokenize_rhs(rest)));
            }
            continue;
        }
        let Some((lhs_text, rhs_full)) = split_arrow(line) else {
            continue;
        };
        let lhs = sym_name(&lhs_text);
        for alt in rhs_full.split('|') {
            raw_productions.push((lhs.clone(), tokenize_rhs(alt)));
        }
        current_lhs = Some(lhs);
    }

    if raw_productions.is_empty() {
        return Err(EmptyGrammarError);
    }

    let mut non_terminals: BTreeSet<SymName> = BTreeSet::new();
    for (lhs, _) in &raw_productions {
        non_terminals.insert(lhs.clone());
    }

    // If a primed non-terminal already exists, reuse it as the augmented
    // start and recover the real start symbol from its right-hand side
    // rather than minting a fresh `S' -> S'` production.
    let (augmented_start, start_symbol) = match non_terminals.iter().find(|n| n.ends_with('\'')) {
        Some(existing) => {
            let existing = existing.clone();
            let base = raw_productions
                .iter()
                .find(|(lhs, rhs)| *lhs == existing && rhs.len() == 1)
                .map(|(_, rhs)| sym_name(&rhs[0]))
                .unwrap_or_else(|| sym_name(existing.trim_end_matches('\'')));
            (existing, base)
        }
        None => {
            let start_symbol = raw_productions[0].0.clone();
            let mut candidate = format!("{}'", start_symbol);
            while non_terminals.iter().any(|n| n.as_ref() == candidate.as_str()) {
                candidate.push('\'');
            }
            (sym_name(&candidate), start_symbol)
        }
    };
    non_terminals.insert(augmented_start.clone());

    let mut terminals: BTreeSet<SymName> = BTreeSet::new();
    for (_, rhs) in &raw_productions {
        for token in rhs {
            if !non_terminals.iter().any(|n| n.as_ref() == token.as_str()) {
                terminals.insert(sym_name(token));
            }
        }
    }

    let to_symbol = |token: &str, non_terminals: &BTreeSet<SymName>| -> Symbol {
        if let Some(nt) = non_terminals.iter().find(|n| n.as_ref() == token) {
            Symbol::NonTerminal(nt.clone())
        } else {
            Symbol::Terminal(sym_name(token))
        }
    };

    // Production 0 must be `S' -> S`: reuse an existing production of that
    // exact shape in place rather than inserting a duplicate.
    let existing_augmented_position = raw_productions.iter().position(|(lhs, rhs)| {
        *lhs == augmented_start && rhs.len() == 1 && rhs[0] == start_symbol.as_ref()
    });

    let mut productions = Vec::with_capacity(raw_productions.len() + 1);
    if let Some(pos) = existing_augmented_position {
        let (lhs, _) = raw_productions.remove(pos);
        productions.push(Production::new(
            0,
            lhs,
            vec![Symbol::NonTerminal(start_symbol.clone())],
        ));
    } else {
        productions.push(Production::new(
            0,
            augmented_start.clone(),
            vec![Symbol::NonTerminal(start_symbol.clone())],
        ));
    }
    for (lhs, rhs_tokens) in raw_productions {
        let index = productions.len() as u32;
        let rhs: Vec<Symbol> = rhs_tokens
            .iter()
            .map(|t| to_symbol(t, &non_terminals))
            .collect();
        productions.push(Production::new(index, lhs, rhs));
    }

    Ok(Grammar {
        productions,
        start_symbol,
        augmented_start,
        non_terminals,
        terminals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grammar_is_rejected() {
        assert_eq!(read_grammar("   \n\n"), Err(EmptyGrammarError));
    }

    #[test]
    fn arrow_variants_and_alternatives() {
        let grammar = read_grammar("S -> ( S ) S | ε").unwrap();
        // production 0 is the augmented start; 1 and 2 are the user alternatives.
        assert_eq!(grammar.productions().len(), 3);
        assert!(grammar.production(2).is_epsilon());
    }

    #[test]
    fn continuation_lines_reuse_lhs() {
        let grammar = read_grammar("S -> a S\n| b").unwrap();
        assert_eq!(grammar.productions().len(), 3);
        assert_eq!(grammar.production(2).rhs().len(), 1);
    }

    #[test]
    fn quoted_literals_are_terminals_with_quotes_stripped() {
        let grammar = read_grammar("E -> 'if' E").unwrap();
        let rhs = grammar.production(1).rhs();
        assert_eq!(rhs[0].name(), "if");
        assert!(rhs[0].is_terminal());
    }

    #[test]
    fn parens_are_always_standalone_terminals() {
        let grammar = read_grammar("F -> ( E )").unwrap();
        let names: Vec<&str> = grammar.production(1).rhs().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["(", "E", ")"]);
    }

    #[test]
    fn malformed_lines_are_silently_skipped() {
        let grammar = read_grammar("S -> a\nthis has no arrow\nS -> 'x' -> 'y'\n").unwrap();
        // second line skipped (no arrow); third skipped (two arrows)
        assert_eq!(grammar.productions().len(), 2);
    }

    #[test]
    fn augmented_start_is_reused_if_already_primed() {
        let grammar = read_grammar("S' -> S\nS -> a").unwrap();
        assert_eq!(grammar.augmented_start().as_ref(), "S'");
        assert_eq!(grammar.start_symbol().as_ref(), "S");
        // The existing `S' -> S` production is reused in place, not
        // shadowed by a synthesized `S' -> S'` self-loop.
        assert_eq!(grammar.productions().len(), 2);
        assert_eq!(
            grammar.production(0).rhs(),
            &[Symbol::NonTerminal(sym_name("S"))]
        );
        assert_eq!(
            grammar.production(1).rhs(),
            &[Symbol::Terminal(sym_name("a"))]
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        let grammar = read_grammar("stmt -> ID '=' expr\nexpr -> ID").unwrap();
        assert!(grammar.is_non_terminal("expr"));
        assert!(grammar.terminals().any(|t| t.as_ref() == "ID"));
    }
}
