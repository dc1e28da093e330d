/// CLI smoke tests: drive the studyctl binary end to end over temp dirs.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_messages_subcommand_writes_csv() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    fs::write(
        input.path().join("p1.txt"),
        json!({"id": "p1", "messages": [
            {"timestamp": 2, "sender": "chatbot", "text": "hello"},
            {"timestamp": 1, "sender": "user", "text": "hi"},
        ]})
        .to_string(),
    )
    .unwrap();

    Command::cargo_bin("studyctl")
        .unwrap()
        .args(["messages", "--in"])
        .arg(input.path())
        .arg("--out")
        .arg(output.path())
        .assert()
        .success();

    let csv = fs::read_to_string(output.path().join("p1_messages.csv")).unwrap();
    assert_eq!(csv, "timestamp,sender,text\n1,user,hi\n2,chatbot,hello\n");
}

#[test]
fn test_texts_then_merge() {
    let input = tempdir().unwrap();
    let texts = tempdir().unwrap();
    let work = tempdir().unwrap();

    fs::write(
        input.path().join("p1.txt"),
        json!({"id": "p1", "editor": [{"t_ms": 1, "text": "<p>final&nbsp;answer</p>"}]})
            .to_string(),
    )
    .unwrap();

    Command::cargo_bin("studyctl")
        .unwrap()
        .args(["texts", "--in"])
        .arg(input.path())
        .arg("--out")
        .arg(texts.path())
        .assert()
        .success();

    let dataset = work.path().join("data.csv");
    fs::write(&dataset, "code,score\np1,10\np2,20\n").unwrap();
    let merged = work.path().join("merged.csv");

    Command::cargo_bin("studyctl")
        .unwrap()
        .args(["merge", "--dataset"])
        .arg(&dataset)
        .arg("--texts")
        .arg(texts.path())
        .arg("--out")
        .arg(&merged)
        .assert()
        .success();

    let content = fs::read_to_string(&merged).unwrap();
    assert!(content.starts_with("code,score,text\n"));
    assert!(content.contains("p1,10,final\u{a0}answer"));
    assert!(content.contains("p2,20,"));
}

#[test]
fn test_texts_refuses_same_directory() {
    let input = tempdir().unwrap();
    fs::write(input.path().join("p1.txt"), "{}").unwrap();

    Command::cargo_bin("studyctl")
        .unwrap()
        .args(["texts", "--in"])
        .arg(input.path())
        .arg("--out")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("output directory equals input directory"));
}
