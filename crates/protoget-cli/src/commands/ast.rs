//! Show the tree-sitter tree of a Go source file.

use std::fmt::Write as _;
use std::path::PathBuf;

use arborium_tree_sitter as tree_sitter;
use protoget_syntax::SourceFile;

use super::check::EXIT_ERROR;

pub struct AstArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub raw: bool,
}

pub fn run(args: AstArgs) -> i32 {
    let text = match (&args.source_text, &args.source_path) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("error: failed to read '{}': {}", path.display(), e);
                return EXIT_ERROR;
            }
        },
        (None, None) => {
            eprintln!("error: source file or -s <TEXT> required");
            return EXIT_ERROR;
        }
    };

    match SourceFile::parse(text) {
        Ok(file) => {
            print!("{}", dump(&file, args.raw));
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

/// S-expression dump, one node per line. Leaves show their text.
pub fn dump(file: &SourceFile, raw: bool) -> String {
    let mut out = String::new();
    write_node(&mut out, file.root().raw(), None, file.text(), 0, raw);
    out.push('\n');
    out
}

fn write_node(
    out: &mut String,
    node: tree_sitter::Node,
    field: Option<&str>,
    source: &str,
    depth: usize,
    raw: bool,
) {
    let indent = "  ".repeat(depth);
    let kind = node.kind();
    let prefix = field.map(|f| format!("{f}: ")).unwrap_or_default();

    let mut children = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if raw || child.is_named() {
                children.push((child, cursor.field_name()));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    let written = if children.is_empty() {
        let text = source.get(node.byte_range()).unwrap_or_default();
        if text == kind {
            write!(out, "{indent}{prefix}({:?})", kind)
        } else {
            write!(out, "{indent}{prefix}({kind} {:?})", text)
        }
    } else {
        write!(out, "{indent}{prefix}({kind}")
    };
    written.expect("String write never fails");

    if children.is_empty() {
        return;
    }
    for (child, child_field) in children {
        out.push('\n');
        write_node(out, child, child_field, source, depth + 1, raw);
    }
    out.push(')');
}
