#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

use cli::{AstParams, CheckParams, build_cli};

fn main() {
    init_logging();

    let matches = build_cli().get_matches();

    let code = match matches.subcommand() {
        Some(("ast", m)) => {
            let params = AstParams::from_matches(m);
            commands::ast::run(params.into())
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into())
        }
        None => {
            let params = CheckParams::from_matches(&matches);
            commands::check::run(params.into())
        }
        _ => unreachable!("clap should have caught this"),
    };

    std::process::exit(code);
}

/// Logs go to stderr, filtered by `PROTOGET_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("PROTOGET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
