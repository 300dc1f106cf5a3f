//! Integration tests for the od binary
//!
//! These drive the compiled CLI end-to-end against fixture files.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn od() -> Command {
    Command::cargo_bin("od").expect("binary builds")
}

#[test]
fn test_help() {
    od().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("yara"))
        .stdout(predicate::str::contains("strings"));
}

#[test]
fn test_yara_help() {
    od().args(["yara", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--infile"))
        .stdout(predicate::str::contains("datatype"));
}

#[test]
fn test_yara_lines_to_stdout() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("yes.txt");
    fs::write(&infile, "alpha\nbravo yes charlie\ndelta\n").unwrap();

    // "yes" sits at byte 12 of the input
    let yara_out = temp.path().join("yara-out.txt");
    fs::write(&yara_out, "user_yes yes.txt\n0xc:$user_yes01: yes\n").unwrap();

    od().args(["yara", "lines"])
        .arg("--offsetfile")
        .arg(&yara_out)
        .arg("--infile")
        .arg(&infile)
        .assert()
        .success()
        .stdout(predicate::eq(&b"bravo yes charlie"[..]));
}

#[test]
fn test_yara_lines_from_stdin() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("yes.txt");
    fs::write(&infile, "alpha\nbravo yes charlie\ndelta\n").unwrap();

    od().args(["yara", "lines"])
        .arg("--infile")
        .arg(&infile)
        .write_stdin("0xc:$user_yes01: yes\n")
        .assert()
        .success()
        .stdout(predicate::eq(&b"bravo yes charlie"[..]));
}

#[test]
fn test_strings_blocks_dec_to_outdir() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("image.dd");
    let data: Vec<u8> = (0..128).collect();
    fs::write(&infile, &data).unwrap();

    let strings_out = temp.path().join("strings-out.txt");
    fs::write(&strings_out, "   122 dirty bit\nnot an offset line\n").unwrap();

    let outdir = temp.path().join("blocks");
    od().args(["strings", "blocks", "--type", "dec", "--blocksize", "32"])
        .arg("--offsetfile")
        .arg(&strings_out)
        .arg("--infile")
        .arg(&infile)
        .arg("--outdir")
        .arg(&outdir)
        .assert()
        .success();

    // Offset 122 falls in the fourth 32-byte block
    assert_eq!(fs::read(outdir.join("block_122.bin")).unwrap(), &data[96..128]);
}

#[test]
fn test_yara_blocks_named_in_hex() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("image.dd");
    fs::write(&infile, vec![0xaau8; 256]).unwrap();

    let outdir = temp.path().join("blocks");
    od().args(["yara", "blocks", "--blocksize", "32"])
        .arg("--infile")
        .arg(&infile)
        .arg("--outdir")
        .arg(&outdir)
        .write_stdin("0x7a:$rule: hit\n")
        .assert()
        .success();

    assert!(outdir.join("block_0x7a.bin").exists());
}

#[test]
fn test_nodupes_emits_repeated_line_once() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("yes.txt");
    fs::write(&infile, "repeated line\nrepeated line\n").unwrap();

    // Both offsets hit identical content in different lines
    od().args(["yara", "lines", "--nodupes"])
        .arg("--infile")
        .arg(&infile)
        .write_stdin("0x2:$r: peat\n0x10:$r: peat\n")
        .assert()
        .success()
        .stdout(predicate::eq(&b"repeated line"[..]));
}

#[test]
fn test_existing_outdir_is_fatal() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("yes.txt");
    fs::write(&infile, "alpha\n").unwrap();

    od().args(["yara", "lines"])
        .arg("--infile")
        .arg(&infile)
        .arg("--outdir")
        .arg(temp.path())
        .write_stdin("0x2:$r: pha\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_infile_is_fatal() {
    od().args(["yara", "lines", "--infile", "/nonexistent/input.dd"])
        .write_stdin("0x2:$r: x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_context_flags() {
    let temp = TempDir::new().unwrap();
    let infile = temp.path().join("yes.txt");
    fs::write(&infile, "one\ntwo\nthree\nfour\nfive\n").unwrap();

    // Offset 0x9 is inside "three"; one line of context each way
    od().args(["yara", "lines", "-B", "1", "-A", "1"])
        .arg("--infile")
        .arg(&infile)
        .write_stdin("0x9:$r: ree\n")
        .assert()
        .success()
        .stdout(predicate::eq(&b"two\nthree\nfour"[..]));
}
