//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the top-level command and the
//! `check` subcommand can share definitions.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Files, directories or `dir/...` patterns (positional, repeatable).
pub fn patterns_arg() -> Arg {
    Arg::new("patterns")
        .value_name("PATTERNS")
        .num_args(0..)
        .action(ArgAction::Append)
        .help("Go files, package directories or `dir/...` trees [default: .]")
}

/// Inline Go source (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .help("Inline Go source")
}

/// Go source file to dump (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Go source file")
}

/// Apply suggested fixes (--fix).
pub fn fix_arg() -> Arg {
    Arg::new("fix")
        .long("fix")
        .action(ArgAction::SetTrue)
        .help("Rewrite files in place with the suggested getter calls")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print findings as JSON, grouped by package and analyzer")
}

/// One line per finding (--short).
pub fn short_arg() -> Arg {
    Arg::new("short")
        .long("short")
        .action(ArgAction::SetTrue)
        .help("Print one `file:line:col: message` line per finding")
}

/// Analyze test files (--tests).
pub fn tests_arg() -> Arg {
    Arg::new("tests")
        .long("tests")
        .action(ArgAction::SetTrue)
        .help("Also analyze _test.go files")
}

/// Analyze generated files (--include-generated).
pub fn include_generated_arg() -> Arg {
    Arg::new("include_generated")
        .long("include-generated")
        .action(ArgAction::SetTrue)
        .help("Also analyze files marked `Code generated ... DO NOT EDIT.`")
}

/// Include anonymous nodes (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include anonymous nodes (keywords, punctuation)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
