use indoc::indoc;

use crate::SourceFile;

#[test]
fn package_name_and_imports() {
    let file = SourceFile::parse(indoc! {r#"
        package app

        import (
            "fmt"
            pb "example.com/internal/proto"
        )
    "#})
    .unwrap();

    assert_eq!(file.package_name(), Some("app"));

    let imports: Vec<_> = file
        .imports()
        .iter()
        .map(|spec| (spec.name(), spec.path()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (None, Some("fmt")),
            (Some("pb"), Some("example.com/internal/proto")),
        ]
    );
}

#[test]
fn generated_marker_before_package() {
    let file = SourceFile::parse(indoc! {r#"
        // Code generated by protoc-gen-go. DO NOT EDIT.
        // source: test.proto

        package pb
    "#})
    .unwrap();
    assert!(file.is_generated());
}

#[test]
fn generated_marker_after_package_is_ignored() {
    let file = SourceFile::parse(indoc! {r#"
        package pb

        // Code generated by protoc-gen-go. DO NOT EDIT.
    "#})
    .unwrap();
    assert!(!file.is_generated());
}

#[test]
fn clean_file_has_no_errors() {
    let file = SourceFile::parse("package p\n\nfunc f() {}\n").unwrap();
    assert!(!file.has_errors());
    assert!(file.error_ranges().is_empty());
}

#[test]
fn broken_file_reports_errors() {
    let file = SourceFile::parse("package p\n\nfunc f( {\n").unwrap();
    assert!(file.has_errors());
}
