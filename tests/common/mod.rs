#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn write_file(path: &Path, data: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, data).unwrap();
}

pub fn run_memhex(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_memhex"))
        .args(args)
        .output()
        .unwrap()
}

pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("memhex failed: {stderr}");
    }
}

/// Split an encoded file into its data records and the trailing EOF record.
pub fn records(text: &str) -> (Vec<&str>, &str) {
    let (body, eof) = text.rsplit_once('\n').unwrap_or(("", text));
    let data = body.lines().filter(|l| !l.is_empty()).collect();
    (data, eof)
}

/// Word index carried in a record's address field.
pub fn record_index(record: &str) -> u32 {
    u32::from_str_radix(&record[3..7], 16).unwrap()
}

pub fn record_byte_sum(record: &str) -> u8 {
    let hex = &record[1..];
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .fold(0u8, |acc, b| acc.wrapping_add(b))
}
