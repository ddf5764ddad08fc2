use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const PROGRAM: &str = "\
Forms:
- Lst:
  - Sym: ns
  - Sym: my-app
- Lst:
  - Sym: defn
  - Sym: main
  - Vec: []
  - Lst:
    - Sym: prn
    - Str: hello
";

#[test]
fn transpiles_a_provisional_tree_to_a_file() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("app.yaml");
    fs::write(&input_path, PROGRAM).expect("write input");
    let output_path = dir.path().join("out.clj");

    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    let text = fs::read_to_string(&output_path).expect("read output");
    assert_eq!(
        text,
        "(ns my-app)\n(defn main [] (prn \"hello\"))\n(apply main ARGS)"
    );
}

#[test]
fn reads_stdin_and_writes_stdout() {
    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .write_stdin("Pairs:\n- Sym: say\n- Str: hi\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(say \"hi\")"));
}

#[test]
fn reports_unknown_node_tags() {
    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .write_stdin("Wat: 1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown node"));
}

#[test]
fn reports_broken_pairs_contract() {
    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .write_stdin("Pairs:\n- Sym: say\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("internal error"));
}

#[test]
fn lists_library_documents_on_the_search_root() {
    let dir = tempdir().expect("tempdir");
    let libs = dir.path().join("libs");
    fs::create_dir_all(&libs).expect("create libs");
    fs::write(libs.join("util.ysl"), "defn util").expect("write lib");

    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .env_remove("YSLPATH")
        .write_stdin("Nil\n")
        .arg("--list-libs")
        .arg("--load-path")
        .arg(&libs)
        .assert()
        .success()
        .stderr(predicate::str::contains("library: util.ysl"));
}

#[test]
fn missing_load_path_for_synthetic_source_is_fatal() {
    Command::cargo_bin("ysl-cli")
        .expect("binary exists")
        .env_remove("YSLPATH")
        .write_stdin("Nil\n")
        .arg("--list-libs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("load path not configured"));
}
