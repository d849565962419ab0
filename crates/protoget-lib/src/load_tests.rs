use std::fs;
use std::path::Path;

use indoc::indoc;

use crate::load::{LoadOptions, Module, load, module_path};
use crate::test_utils::PB_SOURCE;
use crate::{Error, lint};

const APP: &str = indoc! {r#"
    package app

    import "example.com/m/pb"

    func run(t *pb.Test) bool {
    	return t.B
    }
"#};

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn module() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module example.com/m\n\ngo 1.22\n");
    write(dir.path(), "pb/test.pb.go", PB_SOURCE);
    write(dir.path(), "app/app.go", APP);
    write(
        dir.path(),
        "app/app_test.go",
        "package app\n\nimport \"example.com/m/pb\"\n\nfunc name(t *pb.Test) string { return t.S }\n",
    );
    write(dir.path(), "app/testdata/skip.go", "package skip\n");
    dir
}

fn pattern(root: &Path, rel: &str) -> String {
    root.join(rel).display().to_string()
}

fn target_packages(program: &crate::Program) -> Vec<String> {
    let mut paths: Vec<String> = program
        .targets()
        .map(|id| program.package(program.file(id).package()).path().to_owned())
        .collect();
    paths.dedup();
    paths
}

#[test]
fn module_directive() {
    assert_eq!(
        module_path("// comment\nmodule example.com/m // trailing\n\ngo 1.22\n"),
        Some("example.com/m".to_owned())
    );
    assert_eq!(module_path("module \"example.com/q\"\n"), Some("example.com/q".to_owned()));
    assert_eq!(module_path("modules x\n"), None);
    assert_eq!(module_path("go 1.22\n"), None);
}

#[test]
fn import_paths_follow_module_layout() {
    let dir = module();
    let module = Module::find(&dir.path().join("app")).unwrap();

    assert_eq!(module.path, "example.com/m");
    assert_eq!(
        module.import_path(&dir.path().join("app")).as_deref(),
        Some("example.com/m/app")
    );
    assert_eq!(module.dir_of("example.com/m/pb"), Some(module.root.join("pb")));
    assert_eq!(module.dir_of("example.com/other"), None);
}

#[test]
fn directory_loads_imported_packages() {
    let dir = module();
    let program = load(&[pattern(dir.path(), "app")], &LoadOptions::default()).unwrap();

    assert_eq!(target_packages(&program), vec!["example.com/m/app"]);
    assert!(program.package_by_path("example.com/m/pb").is_some());
    assert_eq!(program.len(), 2);

    let findings: usize = lint(&program).iter().map(|r| r.diagnostics.len()).sum();
    assert_eq!(findings, 1);
}

#[test]
fn test_files_on_request() {
    let dir = module();
    let options = LoadOptions {
        tests: true,
        ..LoadOptions::default()
    };
    let program = load(&[pattern(dir.path(), "app")], &options).unwrap();

    assert_eq!(program.targets().count(), 2);
    let findings: usize = lint(&program).iter().map(|r| r.diagnostics.len()).sum();
    assert_eq!(findings, 2);
}

#[test]
fn recursive_pattern_skips_generated_and_testdata() {
    let dir = module();
    let program = load(&[pattern(dir.path(), "...")], &LoadOptions::default()).unwrap();

    assert_eq!(target_packages(&program), vec!["example.com/m/app"]);
    assert!(program.package_by_path("example.com/m/app/testdata").is_none());
}

#[test]
fn generated_files_on_request() {
    let dir = module();
    let options = LoadOptions {
        include_generated: true,
        ..LoadOptions::default()
    };
    let program = load(&[pattern(dir.path(), "...")], &options).unwrap();

    assert_eq!(
        target_packages(&program),
        vec!["example.com/m/app", "example.com/m/pb"]
    );
}

#[test]
fn single_file_pattern() {
    let dir = module();
    let program = load(&[pattern(dir.path(), "app/app.go")], &LoadOptions::default()).unwrap();

    assert_eq!(program.targets().count(), 1);
}

#[test]
fn missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&[pattern(dir.path(), "nope")], &LoadOptions::default()).unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn directory_without_go_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&[dir.path().display().to_string()], &LoadOptions::default()).unwrap_err();

    assert!(matches!(err, Error::NoGoFiles(_)));
}
