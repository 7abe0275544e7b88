mod common;
use common::*;

use std::path::{Path, PathBuf};
use std::process::Output;

use collectsugar::syntax::{File, Stmt};
use collectsugar::tree_io;

fn well_formed() -> File {
    func_with_err(vec![collect(name("err", 3), vec![collect_call("f", 4), collect_call("g", 5)], 3, 6)])
}

fn two_mistakes() -> File {
    func_with_err(vec![collect_call("f", 3), collect_call("g", 4)])
}

fn write(dir: &Path, file_name: &str, tree: &File) -> PathBuf {
    let path = dir.join(file_name);
    tree_io::write_tree(&path, tree, None).unwrap();
    path
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn desugar_prints_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &well_formed());

    let output = collectsugar().arg("desugar").arg(&input).output().unwrap();
    assert!(output.status.success(), "desugar failed: {}", stderr(&output));

    let tree = tree_io::from_json(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let stmts = body(&tree, 0);
    assert!(matches!(stmts[1].node, Stmt::Block(_)));
    assert_eq!(end_label(&stmts[2]), Some("___collect_end_1"));
}

#[test]
fn desugar_writes_binary_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &well_formed());
    let out = dir.path().join("out.csg");

    let output = collectsugar().arg("desugar").arg(&input).arg("-o").arg(&out).output().unwrap();
    assert!(output.status.success(), "desugar failed: {}", stderr(&output));

    let bytes = std::fs::read(&out).unwrap();
    assert!(tree_io::is_binary_format(&bytes));
    let loaded = tree_io::decode_binary(&bytes).unwrap();
    let inner = block_stmts(&body(&loaded.file, 0)[1]);
    assert_eq!(inner.len(), 4);
}

#[test]
fn desugar_reports_every_diagnostic_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &two_mistakes());
    let out = dir.path().join("out.json");

    let output = collectsugar().arg("desugar").arg(&input).arg("-o").arg(&out).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("tree.json:3:1: cannot use _! outside of a collect block"), "stderr: {err}");
    assert!(err.contains("tree.json:4:1: cannot use _! outside of a collect block"), "stderr: {err}");
    assert!(err.contains("2 collect diagnostic(s)"), "stderr: {err}");
    assert!(!out.exists());
}

#[test]
fn fail_fast_stops_at_first_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &two_mistakes());

    let output = collectsugar().arg("desugar").arg(&input).arg("--fail-fast").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("tree.json:3:1"), "stderr: {err}");
    assert!(!err.contains("tree.json:4:1"), "stderr: {err}");
}

#[test]
fn config_keep_going_false_behaves_like_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &two_mistakes());
    std::fs::write(dir.path().join("collectsugar.toml"), "keep_going = false\n").unwrap();

    let output = collectsugar().arg("check").arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!stderr(&output).contains("tree.json:4:1"));
}

#[test]
fn source_text_renders_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &two_mistakes());
    let source = dir.path().join("main.go");
    std::fs::write(&source, "package main\nfunc f() {\n_! = f()\n_! = g()\n}\n").unwrap();

    let output = collectsugar().arg("check").arg(&input).arg("--source").arg(&source).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("collect error in"), "stderr: {err}");
    assert!(err.contains("_! = g()"), "stderr: {err}");
}

#[test]
fn check_counts_collect_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &well_formed());

    let output = collectsugar().arg("check").arg(&input).output().unwrap();
    assert!(output.status.success(), "check failed: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ok (1 collect block(s))"), "stdout: {stdout}");
}

#[test]
fn custom_label_prefix_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &well_formed());
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "label_prefix = \"end_of_collect_\"\n").unwrap();

    let output = collectsugar().arg("desugar").arg(&input).arg("--config").arg(&config).output().unwrap();
    assert!(output.status.success(), "desugar failed: {}", stderr(&output));
    let tree = tree_io::from_json(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(end_label(&body(&tree, 0)[2]), Some("end_of_collect_1"));
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "tree.json", &well_formed());
    std::fs::write(dir.path().join("collectsugar.toml"), "zero_value = \"not an ident\"\n").unwrap();

    let output = collectsugar().arg("desugar").arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("zero_value"));
}

#[test]
fn convert_round_trips_between_formats() {
    let dir = tempfile::tempdir().unwrap();
    let tree = well_formed();
    let input = write(dir.path(), "tree.json", &tree);
    let binary = dir.path().join("tree.csg");
    let back = dir.path().join("back.json");

    let output = collectsugar().arg("convert").arg(&input).arg("-o").arg(&binary).output().unwrap();
    assert!(output.status.success(), "convert failed: {}", stderr(&output));
    let output = collectsugar().arg("convert").arg(&binary).arg("-o").arg(&back).output().unwrap();
    assert!(output.status.success(), "convert failed: {}", stderr(&output));

    assert_eq!(tree_io::read_tree(&back).unwrap().file, tree);
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = collectsugar().arg("check").arg(dir.path().join("nope.json")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: failed to access"));
}
