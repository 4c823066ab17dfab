// Copyright 2026 the lr1-studio authors

use crate::grammar::Grammar;
use crate::symbol::Lookahead;
use crate::table::{Action, Tables};

pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// A concrete syntax tree node. Terminal nodes have no children; ε
/// reductions produce a single synthetic `ε` leaf child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub symbol: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            children: Vec::new(),
        }
    }
}

/// One row of the parse trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    pub step: u32,
    pub stack: Vec<String>,
    pub input: Vec<String>,
    pub action: String,
}

#[derive(Debug)]
pub struct ParseOutcome {
    pub accepted: bool,
    pub steps: Vec<ParseStep>,
    pub tree: Option<TreeNode>,
}

/// Whitespace-split tokenization of the input sentence, with `(`/`)` always
/// standalone and a trailing `$` appended.
pub fn tokenize_input(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' || c == ')' {
            tokens.push(c.to_string());
            i += 1;
        } else {
            let mut token = String::new();
            while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '(' && chars[i] != ')' {
                token.push(chars[i]);
                i += 1;
            }
            tokens.push(token);
        }
    }
    tokens.push("$".to_string());
    tokens
}

/// Drives ACTION/GOTO over a tokenized input, recording a step-by-step
/// trace and materializing a concrete syntax tree from reductions.
pub fn run_parser(
    grammar: &Grammar,
    tables: &Tables,
    tokens: &[String],
    step_limit: usize,
) -> ParseOutcome {
    let mut state_stack: Vec<u32> = vec![0];
    let mut symbol_stack: Vec<String> = Vec::new();
    let mut tree_stack: Vec<TreeNode> = Vec::new();
    let mut steps = Vec::new();
    let mut pos = 0usize;
    let mut step_count = 0u32;

    loop {
        step_count += 1;
        if step_count as usize > step_limit {
            steps.push(ParseStep {
                step: step_count,
                stack: symbol_stack.clone(),
                input: tokens[pos..].to_vec(),
                action: "INTERNAL ERROR: step limit exceeded".to_string(),
            });
            return ParseOutcome {
                accepted: false,
                steps,
                tree: None,
            };
        }

        let current_state = *state_stack.last().unwrap();
        let token_text = &tokens[pos];
        let lookahead = if token_text == "$" {
            Lookahead::EndOfInput
        } else {
            Lookahead::Terminal(crate::symbol::sym_name(token_text))
        };

        let Some(cell) = tables.action(current_state, &lookahead) else {
            steps.push(ParseStep {
                step: step_count,
                stack: symbol_stack.clone(),
                input: tokens[pos..].to_vec(),
                action: "ERROR".to_string(),
            });
            return ParseOutcome {
                accepted: false,
                steps,
                tree: None,
            };
        };

        match cell.first_action().clone() {
            Action::Shift(next_state) => {
                symbol_stack.push(token_text.clone());
                state_stack.push(next_state);
                tree_stack.push(TreeNode::leaf(token_text.clone()));
                steps.push(ParseStep {
                    step: step_count,
                    stack: symbol_stack.clone(),
                    input: tokens[pos..].to_vec(),
                    action: format!("s{}", next_state),
                });
                pos += 1;
            }
            Action::Reduce(production_index) => {
                let production = grammar.production(production_index);
                let lhs = production.lhs().to_string();
                let children = if production.is_epsilon() {
                    vec![TreeNode::leaf("ε")]
                } else {
                    let n = production.len();
                    let start = symbol_stack.len() - n;
                    symbol_stack.truncate(start);
                    state_stack.truncate(state_stack.len() - n);
                    tree_stack.split_off(start)
                };
                symbol_stack.push(lhs.clone());
                let Some(goto_state) = tables.goto_state(*state_stack.last().unwrap(), production.lhs()) else {
                    steps.push(ParseStep {
                        step: step_count,
                        stack: symbol_stack.clone(),
                        input: tokens[pos..].to_vec(),
                        action: "ERROR".to_string(),
                    });
                    return ParseOutcome {
                        accepted: false,
                        steps,
                        tree: None,
                    };
                };
                state_stack.push(goto_state);
                tree_stack.push(TreeNode {
                    symbol: lhs,
                    children,
                });
                steps.push(ParseStep {
                    step: step_count,
                    stack: symbol_stack.clone(),
                    input: tokens[pos..].to_vec(),
                    action: format!("r{}", production_index + 1),
                });
            }
            Action::Accept => {
                steps.push(ParseStep {
                    step: step_count,
                    stack: symbol_stack.clone(),
                    input: vec!["$".to_string()],
                    action: "acc".to_string(),
                });
                return ParseOutcome {
                    accepted: true,
                    steps,
                    tree: tree_stack.pop(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::build_canonical_collection;
    use crate::first::FirstSets;
    use crate::grammar::read_grammar;
    use crate::table::synthesize_tables;

    fn parse(grammar_text: &str, input: &str) -> ParseOutcome {
        let grammar = read_grammar(grammar_text).unwrap();
        let first = FirstSets::compute(&grammar);
        let collection = build_canonical_collection(&grammar, &first);
        let tables = synthesize_tables(&grammar, &collection);
        let tokens = tokenize_input(input);
        run_parser(&grammar, &tables, &tokens, DEFAULT_STEP_LIMIT)
    }

    #[test]
    fn tokenizer_splits_parens_and_words() {
        let tokens = tokenize_input("( ( ) )");
        assert_eq!(tokens, vec!["(", "(", ")", ")", "$"]);
    }

    #[test]
    fn balanced_parens_input_is_accepted_with_a_tree() {
        let outcome = parse("S -> ( S ) S | ε", "( ( ) )");
        assert!(outcome.accepted);
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.symbol, "S");
        assert_eq!(outcome.steps.last().unwrap().action, "acc");
    }

    #[test]
    fn epsilon_only_grammar_reduces_once_with_an_epsilon_leaf() {
        let outcome = parse("S -> ε", "");
        assert!(outcome.accepted);
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.symbol, "S");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].symbol, "ε");
    }

    #[test]
    fn unbalanced_input_is_rejected_with_no_tree() {
        let outcome = parse("S -> ( S ) S | ε", "( (");
        assert!(!outcome.accepted);
        assert!(outcome.tree.is_none());
        assert_eq!(outcome.steps.last().unwrap().action, "ERROR");
    }

    #[test]
    fn expression_grammar_builds_precedence_correct_tree() {
        let outcome = parse(
            "E -> E '+' T | T\nT -> T '*' F | F\nF -> ( E ) | id",
            "id + id * id",
        );
        assert!(outcome.accepted);
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.symbol, "E");
        // E -> E + T, so the '+' binds the whole right side as a single T
        // built from T * F (i.e. '*' is applied before '+' is reduced).
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.children[2].symbol, "T");
        assert_eq!(tree.children[2].children.len(), 3);
    }

    #[test]
    fn left_recursive_grammar_accepts_and_rejects_as_expected() {
        let grammar_text = "S -> A 'a' | 'b' A 'c' | 'd' 'c' | 'b' 'd' 'a'\nA -> 'd'";
        assert!(parse(grammar_text, "d c").accepted);
        assert!(parse(grammar_text, "b d c").accepted);
        assert!(!parse(grammar_text, "b d a").accepted);
    }
}
