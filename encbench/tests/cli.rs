use std::path::PathBuf;
use std::process::{ Command, Output, Stdio };

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_encbench"))
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("run encbench")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|l| l.to_string())
        .collect()
}

/// Parse a `<name> <elapsed> ms` line.
fn parse_result(line: &str) -> (String, f64) {
    let parts: Vec<&str> = line.split(' ').collect();
    assert_eq!(parts.len(), 3, "malformed result line {:?}", line);
    assert_eq!(parts[2], "ms");
    let ms: f64 = parts[1].parse().expect("elapsed time");
    (parts[0].to_string(), ms)
}

#[test]
fn prints_one_line_per_backend() {
    let out = run_cli(&["--iters", "50"]);
    assert!(out.status.success(), "stderr: {}",
        String::from_utf8_lossy(&out.stderr));

    let lines = stdout_lines(&out);
    assert_eq!(lines.len(), 4, "{:?}", lines);
    let names: Vec<String> = lines.iter().map(|l| parse_result(l).0).collect();
    assert_eq!(names, ["Dynasm", "IcedAsm", "IcedEncoder", "IcedBlock"]);
    for line in lines.iter() {
        let (_, ms) = parse_result(line);
        assert!(ms >= 0.0 && ms.is_finite());
    }
}

#[test]
fn backend_subset() {
    let out = run_cli(&["-n", "10", "-b", "iced-encoder"]);
    assert!(out.status.success());
    let lines = stdout_lines(&out);
    assert_eq!(lines.len(), 1);
    assert_eq!(parse_result(&lines[0]).0, "IcedEncoder");
}

#[test]
fn repeated_runs_print_summary() {
    let out = run_cli(&["-n", "10", "-r", "3", "-b", "dynasm,iced-asm"]);
    assert!(out.status.success());
    let lines = stdout_lines(&out);
    assert_eq!(parse_result(&lines[0]).0, "Dynasm");
    assert_eq!(parse_result(&lines[1]).0, "IcedAsm");
    assert_eq!(lines[2], "");
    assert!(lines[3].contains("median"));
    assert!(lines[4].contains("Dynasm"));
    assert!(lines[5].contains("IcedAsm"));
}

#[test]
fn disassembly() {
    let out = run_cli(&["-n", "1", "-b", "iced-block", "--disas"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[*] IcedBlock (48 bytes)"));
    assert!(stdout.contains("pushfq"));
    assert!(stdout.contains("pop r15"));
    assert!(stdout.lines().last().unwrap().starts_with("IcedBlock "));
}

#[test]
fn hex_dump() {
    let out = run_cli(&["-n", "1", "-b", "dynasm", "--dump"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[*] Dynasm (48 bytes)"));
    // push rax; push rcx; push rdx
    assert!(stdout.contains("50 51 52"), "{}", stdout);
    assert!(stdout.lines().last().unwrap().starts_with("Dynasm "));
}

#[test]
fn disassembly_at_base() {
    let out = run_cli(&["-n", "1", "-b", "iced-asm", "--disas",
        "--base", "0x10000"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("0000000000010000: "), "{}", stdout);
}

#[test]
fn rejects_zero_iterations() {
    let out = run_cli(&["--iters", "0"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn rejects_unknown_backend() {
    let out = run_cli(&["-b", "asmjit"]);
    assert!(!out.status.success());
}
