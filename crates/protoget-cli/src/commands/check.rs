//! Analyze packages and report, fix, or export findings.

use std::fmt::Write as _;
use std::path::PathBuf;

use protoget_lib::{ANALYZER_NAME, FileReport, JsonReport, LoadOptions, Program, apply_edits};

/// Display name of the file analyzed with `-s`.
pub const INLINE_FILE: &str = "<source>";

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_FINDINGS: i32 = 3;

pub struct CheckArgs {
    pub patterns: Vec<String>,
    pub source_text: Option<String>,
    pub fix: bool,
    pub json: bool,
    pub short: bool,
    pub tests: bool,
    pub include_generated: bool,
    pub color: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Load(#[from] protoget_lib::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a run prints, and its exit status.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

pub fn run(args: CheckArgs) -> i32 {
    match execute(&args) {
        Ok(output) => {
            print!("{}", output.stdout);
            eprint!("{}", output.stderr);
            output.code
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

pub fn execute(args: &CheckArgs) -> Result<Output, CheckError> {
    let program = load_program(args)?;
    let reports = protoget_lib::lint(&program);

    if args.json {
        return json_output(&program, &reports);
    }
    if args.fix {
        return fix_output(&program, &reports, args);
    }
    Ok(text_output(&program, &reports, args))
}

fn load_program(args: &CheckArgs) -> protoget_lib::Result<Program> {
    if let Some(text) = &args.source_text {
        let mut program = Program::new();
        let id = program.add_file("main", INLINE_FILE, text.as_str())?;
        // Inline text is always analyzed, even when it carries a generated header.
        program.set_target(id, true);
        return Ok(program);
    }

    let options = LoadOptions {
        tests: args.tests,
        include_generated: args.include_generated,
    };
    protoget_lib::load(&args.patterns, &options)
}

fn text_output(program: &Program, reports: &[FileReport], args: &CheckArgs) -> Output {
    let mut output = Output::default();
    let mut has_errors = false;
    let mut has_findings = false;

    for report in reports.iter().filter(|r| !r.diagnostics.is_empty()) {
        has_errors |= report.diagnostics.has_errors();
        has_findings |= report.diagnostics.has_warnings();
        render(&mut output.stderr, program, report, args);
    }

    output.code = exit_code(has_errors, has_findings);
    output
}

fn fix_output(
    program: &Program,
    reports: &[FileReport],
    args: &CheckArgs,
) -> Result<Output, CheckError> {
    let mut output = Output::default();
    let mut has_errors = false;
    let mut remaining = 0;

    for report in reports {
        let file = program.file(report.file);
        let source = file.source().text();

        if report.diagnostics.has_errors() {
            has_errors = true;
            render(&mut output.stderr, program, report, args);
        }

        let edits = report.diagnostics.edits();
        if edits.is_empty() {
            if file.disk_path().is_none() {
                output.stdout.push_str(source);
            }
            continue;
        }

        let outcome = apply_edits(source, edits);
        remaining += outcome.skipped.len();
        tracing::debug!(
            file = file.name(),
            applied = outcome.applied,
            skipped = outcome.skipped.len(),
            "applied fixes"
        );

        match file.disk_path() {
            Some(path) => {
                std::fs::write(path, &outcome.text).map_err(|source| CheckError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            None => output.stdout.push_str(&outcome.text),
        }

        writeln!(
            output.stderr,
            "{}: applied {} {}",
            file.name(),
            outcome.applied,
            plural(outcome.applied, "fix", "fixes")
        )
        .expect("String write never fails");
        if !outcome.skipped.is_empty() {
            writeln!(
                output.stderr,
                "{}: skipped {} overlapping {}, run again to apply",
                file.name(),
                outcome.skipped.len(),
                plural(outcome.skipped.len(), "fix", "fixes")
            )
            .expect("String write never fails");
        }
    }

    output.code = exit_code(has_errors, remaining > 0);
    Ok(output)
}

fn json_output(program: &Program, reports: &[FileReport]) -> Result<Output, CheckError> {
    let mut json = JsonReport::new();
    let mut has_errors = false;

    for report in reports {
        let file = program.file(report.file);
        let package = program.package(file.package());
        has_errors |= report.diagnostics.has_errors();
        json.add(
            package.path(),
            ANALYZER_NAME,
            file.name(),
            file.source().text(),
            &report.diagnostics,
        );
    }

    let mut stdout = json.to_json()?;
    stdout.push('\n');
    // Findings in JSON mode are data, not a failure.
    Ok(Output {
        stdout,
        stderr: String::new(),
        code: if has_errors { EXIT_ERROR } else { EXIT_OK },
    })
}

fn render(out: &mut String, program: &Program, report: &FileReport, args: &CheckArgs) {
    let file = program.file(report.file);
    let printer = report
        .diagnostics
        .printer(file.source().text())
        .path(file.name())
        .colored(args.color)
        .short(args.short);
    out.push_str(&printer.render());
    if !args.short {
        out.push('\n');
    }
}

fn exit_code(has_errors: bool, has_findings: bool) -> i32 {
    if has_errors {
        EXIT_ERROR
    } else if has_findings {
        EXIT_FINDINGS
    } else {
        EXIT_OK
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
