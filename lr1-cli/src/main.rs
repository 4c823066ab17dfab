// Copyright 2026 the lr1-studio authors
//
// A thin demo front end over `lr1_core::report::build_report_with_step_limit`:
// reads a grammar file, optionally parses a sentence against it, and prints
// every artifact of the resulting report. Not a network-facing front end.

use lr1_core::report::ActionRepr;
use lr1_core::Report;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lr1-cli",
    about = "Build and print an LR(1) construction report for a grammar file"
)]
struct CliOptions {
    /// Path to a file containing the grammar (one `LHS -> RHS1 | RHS2` per line).
    #[structopt(parse(from_os_str))]
    grammar_path: PathBuf,

    /// Sentence to parse against the built tables. Omit to only report the
    /// construction artifacts.
    input_string: Option<String>,

    /// Override the parse driver's step ceiling.
    #[structopt(long, default_value = "10000")]
    step_limit: usize,
}

fn main() -> ExitCode {
    let options = CliOptions::from_args();

    let grammar_text = match fs::read_to_string(&options.grammar_path) {
        Ok(text) => text,
        Err(err) => {
            report_error(&format!(
                "could not read {}: {}",
                options.grammar_path.display(),
                err
            ));
            return ExitCode::from(2);
        }
    };

    match lr1_core::report::build_report_with_step_limit(
        &grammar_text,
        options.input_string.as_deref(),
        options.step_limit,
    ) {
        Ok(report) => {
            print_report(&report);
            if report.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            report_error(&err.to_string());
            ExitCode::from(5)
        }
    }
}

fn report_error(what: &str) {
    writeln!(io::stderr(), "lr1-cli: error: {}.", what).expect("stderr should be writable");
}

fn print_report(report: &Report) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "accepted: {}", report.accepted).ok();
    writeln!(out, "LR(1): {}", report.is_lr1).ok();

    writeln!(out, "\naugmented grammar:").ok();
    for row in &report.augmented_grammar {
        writeln!(out, "  {}", row.production).ok();
    }

    writeln!(out, "\nFIRST sets:").ok();
    for row in &report.first_table {
        writeln!(out, "  FIRST({}) = {{{}}}", row.nonterminal, row.first.join(", ")).ok();
    }

    writeln!(out, "\ncanonical collection ({} states):", report.canonical_collection.len()).ok();
    for state in &report.canonical_collection {
        writeln!(out, "  I{}:", state.id).ok();
        for item in &state.items {
            writeln!(out, "    {}", item).ok();
        }
    }

    writeln!(out, "\nACTION table:").ok();
    for (state, symbol, action) in &report.parsing_table_action {
        writeln!(out, "  ({}, {}) -> {}", state, symbol, describe_action(action)).ok();
    }

    writeln!(out, "\nGOTO table:").ok();
    for (key, target) in &report.parsing_table_goto {
        writeln!(out, "  {} -> {}", key, target).ok();
    }

    writeln!(out, "\nparse trace:").ok();
    for step in &report.parsing_steps {
        writeln!(
            out,
            "  {:>3}: [{}] [{}] {}",
            step.step,
            step.stack.join(" "),
            step.input.join(" "),
            step.action
        )
        .ok();
    }

    if let Some(tree) = &report.parse_tree {
        writeln!(out, "\nparse tree:").ok();
        print_tree(&mut out, tree, 0);
    }

    writeln!(out, "\n{}", report.lr1_dot).ok();
}

fn describe_action(action: &ActionRepr) -> String {
    match action {
        ActionRepr::Shift(n) => format!("shift {}", n),
        ActionRepr::Reduce(k) => format!("reduce {}", k),
        ActionRepr::Accept => "accept".to_string(),
        ActionRepr::Conflict(alts) => {
            let rendered: Vec<String> = alts.iter().map(describe_action).collect();
            format!("conflict[{}]", rendered.join(", "))
        }
    }
}

fn print_tree(out: &mut impl Write, node: &lr1_core::parser::TreeNode, depth: usize) {
    writeln!(out, "{}{}", "  ".repeat(depth), node.symbol).ok();
    for child in &node.children {
        print_tree(out, child, depth + 1);
    }
}
