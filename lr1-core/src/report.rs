// Copyright 2026 the lr1-studio authors

use crate::collection::{build_canonical_collection, CanonicalCollection};
use crate::dot::export_dot;
use crate::error::CoreError;
use crate::first::FirstSets;
use crate::grammar::{read_grammar, AugmentedRow, Grammar};
use crate::parser::{run_parser, tokenize_input, ParseStep, TreeNode, DEFAULT_STEP_LIMIT};
use crate::symbol::{Lookahead, SymName};
use crate::table::{synthesize_tables, Action, ActionCell, Tables};

/// One row of the FIRST table, per non-terminal.
#[derive(Debug, Clone)]
pub struct FirstRow {
    pub nonterminal: String,
    pub first: Vec<String>,
}

/// One row of the canonical collection, rendered for display.
#[derive(Debug, Clone)]
pub struct StateRow {
    pub id: u32,
    pub items: Vec<String>,
}

/// An ACTION cell's shape for reporting: `Shift(n)`, `Reduce(k)`, `Accept`,
/// or `Conflict([...])` when more than one alternative was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRepr {
    Shift(u32),
    Reduce(u32),
    Accept,
    Conflict(Vec<ActionRepr>),
}

impl From<&Action> for ActionRepr {
    fn from(action: &Action) -> Self {
        match action {
            Action::Shift(n) => ActionRepr::Shift(*n),
            Action::Reduce(k) => ActionRepr::Reduce(*k),
            Action::Accept => ActionRepr::Accept,
        }
    }
}

impl From<&ActionCell> for ActionRepr {
    fn from(cell: &ActionCell) -> Self {
        match cell {
            ActionCell::Single(action) => ActionRepr::from(action),
            ActionCell::Conflict(actions) => {
                ActionRepr::Conflict(actions.iter().map(ActionRepr::from).collect())
            }
        }
    }
}

/// The full artifact bundle an adapter hands back on success.
#[derive(Debug)]
pub struct Report {
    pub accepted: bool,
    pub augmented_grammar: Vec<AugmentedRow>,
    pub first_sets: Vec<(String, Vec<String>)>,
    pub first_table: Vec<FirstRow>,
    pub canonical_collection: Vec<StateRow>,
    /// `(state, terminal-or-"$") -> action`.
    pub parsing_table_action: Vec<(u32, String, ActionRepr)>,
    /// Keyed `"<state>,<symbol>"`.
    pub parsing_table_goto: Vec<(String, u32)>,
    pub parsing_steps: Vec<ParseStep>,
    pub parse_tree: Option<TreeNode>,
    pub lr1_dot: String,
    /// True iff any ACTION cell was a conflict, i.e. the grammar is not
    /// LR(1). Kept alongside `parsing_table_action` so a caller doesn't
    /// have to re-scan it to learn the same fact.
    pub is_lr1: bool,
}

/// Builds every artifact from a grammar and an optional input sentence.
/// `input_string: None` synthesizes a single informational step rather
/// than running the driver; an explicit empty string `Some("")` IS run
/// through the driver (the ε-only case).
pub fn build_report(grammar_text: &str, input_string: Option<&str>) -> Result<Report, CoreError> {
    build_report_with_step_limit(grammar_text, input_string, DEFAULT_STEP_LIMIT)
}

/// As [`build_report`], but with an explicit ceiling on parse-driver steps
/// instead of [`DEFAULT_STEP_LIMIT`].
pub fn build_report_with_step_limit(
    grammar_text: &str,
    input_string: Option<&str>,
    step_limit: usize,
) -> Result<Report, CoreError> {
    let grammar = read_grammar(grammar_text)?;
    let first_sets = FirstSets::compute(&grammar);
    let collection = build_canonical_collection(&grammar, &first_sets);
    let tables = synthesize_tables(&grammar, &collection);

    let (accepted, steps, tree) = match input_string {
        None => (
            true,
            vec![ParseStep {
                step: 1,
                stack: vec![],
                input: vec![],
                action: "no input".to_string(),
            }],
            None,
        ),
        Some(text) => {
            let tokens = tokenize_input(text);
            let outcome = run_parser(&grammar, &tables, &tokens, step_limit);
            if outcome
                .steps
                .last()
                .is_some_and(|s| s.action.starts_with("INTERNAL ERROR"))
            {
                return Err(CoreError::StepLimitExceeded { limit: step_limit });
            }
            (outcome.accepted, outcome.steps, outcome.tree)
        }
    };

    Ok(assemble(&grammar, &first_sets, &collection, &tables, accepted, steps, tree))
}

fn assemble(
    grammar: &Grammar,
    first_sets: &FirstSets,
    collection: &CanonicalCollection,
    tables: &Tables,
    accepted: bool,
    parsing_steps: Vec<ParseStep>,
    parse_tree: Option<TreeNode>,
) -> Report {
    let augmented_grammar = grammar.augmented_listing();

    let mut first_table_raw: Vec<(SymName, Vec<SymName>)> = first_sets.table();
    first_table_raw.sort_by(|a, b| a.0.cmp(&b.0));
    let first_sets_out: Vec<(String, Vec<String>)> = first_table_raw
        .iter()
        .map(|(nt, set)| (nt.to_string(), set.iter().map(|s| s.to_string()).collect()))
        .collect();
    let first_table = first_table_raw
        .into_iter()
        .map(|(nt, set)| FirstRow {
            nonterminal: nt.to_string(),
            first: set.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    let canonical_collection = collection
        .states()
        .iter()
        .enumerate()
        .map(|(id, state)| StateRow {
            id: id as u32,
            items: state.iter().map(|item| item.render(grammar)).collect(),
        })
        .collect();

    let parsing_table_action = tables
        .action_entries()
        .map(|(state, lookahead, cell)| {
            let symbol = match lookahead {
                Lookahead::Terminal(name) => name.to_string(),
                Lookahead::EndOfInput => "$".to_string(),
            };
            (state, symbol, ActionRepr::from(cell))
        })
        .collect();

    let parsing_table_goto = tables
        .goto_entries()
        .map(|(state, nt, target)| (format!("{},{}", state, nt), target))
        .collect();

    let lr1_dot = export_dot(grammar, collection, tables);
    let is_lr1 = !tables.has_conflicts();

    Report {
        accepted,
        augmented_grammar,
        first_sets: first_sets_out,
        first_table,
        canonical_collection,
        parsing_table_action,
        parsing_table_goto,
        parsing_steps,
        parse_tree,
        lr1_dot,
        is_lr1,
    }
}
