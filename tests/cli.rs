mod common;

use common::{assert_success, run_memhex, write_file};
use tempfile::TempDir;

#[test]
fn test_cli_init_cleans_dump() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meminit.hex");
    let mut dump = "ffffffffffffffff\n".repeat(64);
    dump.push_str("0000000000000001\n");
    write_file(&path, &dump);

    let output = run_memhex(&["init", path.to_str().unwrap()]);
    assert_success(&output);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, ":04008000000000017b\n:00000001FF");
}

#[test]
fn test_cli_reference_cleans_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("add_spike.hex");
    write_file(&path, "0000000200000001\n");

    let output = run_memhex(&["-q", "reference", path.to_str().unwrap()]);
    assert_success(&output);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        ":04008000000000017b\n:040081000000000279\n:00000001FF"
    );
}

#[test]
fn test_cli_reports_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad_spike.hex");
    write_file(&path, "0000001\n");

    let output = run_memhex(&["reference", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad_spike.hex"), "{stderr}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0000001\n");
}

#[test]
fn test_cli_list() {
    let dir = TempDir::new().unwrap();
    let arch_dir = dir.path().join("verification/asm-tests/RV32I");
    write_file(&arch_dir.join("add.S"), "");
    write_file(&arch_dir.join("xor.S"), "");

    let output = run_memhex(&["list", "--root", dir.path().to_str().unwrap(), "x"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("xor_spike.hex"), "{stdout}");
}

#[test]
fn test_cli_list_unknown_test_kind() {
    let output = run_memhex(&["list", "--test", "rtl"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rtl is not a supported test type"), "{stderr}");
}

#[test]
fn test_cli_rejects_unknown_command() {
    let output = run_memhex(&["compare"]);
    assert!(!output.status.success());
}
