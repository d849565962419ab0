//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the unresolved
//! `ColorChoice`; the `Into<*Args>` impls bridge dispatch and the handlers.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::ast::AstArgs;
use crate::commands::check::CheckArgs;

pub struct CheckParams {
    pub patterns: Vec<String>,
    pub source_text: Option<String>,
    pub fix: bool,
    pub json: bool,
    pub short: bool,
    pub tests: bool,
    pub include_generated: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let source_text = m.get_one::<String>("source_text").cloned();
        let mut patterns: Vec<String> = m
            .get_many::<String>("patterns")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if patterns.is_empty() && source_text.is_none() {
            patterns.push(".".to_owned());
        }

        Self {
            patterns,
            source_text,
            fix: m.get_flag("fix"),
            json: m.get_flag("json"),
            short: m.get_flag("short"),
            tests: m.get_flag("tests"),
            include_generated: m.get_flag("include_generated"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            patterns: p.patterns,
            source_text: p.source_text,
            fix: p.fix,
            json: p.json,
            short: p.short,
            tests: p.tests,
            include_generated: p.include_generated,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AstParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub raw: bool,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            raw: m.get_flag("raw"),
        }
    }
}

impl From<AstParams> for AstArgs {
    fn from(p: AstParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            raw: p.raw,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
