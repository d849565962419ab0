//! Command builders for the CLI.
//!
//! `protoget PATTERNS...` and `protoget check PATTERNS...` are the same
//! command; the top level carries the check args so the common case needs no
//! subcommand.

use clap::Command;

use super::args::*;

/// Add the check args to a command.
fn with_check_args(cmd: Command) -> Command {
    cmd.arg(patterns_arg())
        .arg(source_text_arg().conflicts_with("patterns"))
        .arg(fix_arg())
        .arg(json_arg().conflicts_with_all(["fix", "short"]))
        .arg(short_arg())
        .arg(tests_arg())
        .arg(include_generated_arg())
        .arg(color_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    let cmd = Command::new("protoget")
        .about("Rewrite direct protobuf field reads in Go to getter calls")
        .version(env!("CARGO_PKG_VERSION"))
        .args_conflicts_with_subcommands(true)
        .after_help(
            r#"EXAMPLES:
  protoget ./...                      # analyze every package of the module
  protoget ./server --fix             # rewrite reads in place
  protoget . --json                   # findings as JSON
  protoget -s 'package main ...'      # inline source"#,
        )
        .subcommand(check_command())
        .subcommand(ast_command());

    with_check_args(cmd)
}

/// Analyze packages (the default command).
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Report protobuf field reads that should use getters")
        .override_usage(
            "\
  protoget check [PATTERNS]...
  protoget check -s <TEXT>",
        )
        .after_help(
            r#"EXIT STATUS:
  0  no findings (or all findings fixed)
  1  load error, I/O error or Go syntax error
  3  findings reported"#,
        );

    with_check_args(cmd)
}

/// Show the tree-sitter tree of a Go file.
pub fn ast_command() -> Command {
    Command::new("ast")
        .about("Show the syntax tree of a Go source file")
        .override_usage(
            "\
  protoget ast <SOURCE>
  protoget ast -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  protoget ast main.go                # named nodes only
  protoget ast main.go --raw          # include keywords and punctuation
  protoget ast -s 'package p'         # inline source"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg().conflicts_with("source_path"))
        .arg(raw_arg())
}
