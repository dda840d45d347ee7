#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use mergehex::{Block, Record, parse_blocks};
use tempfile::TempDir;

pub fn temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("mergehex_")
        .tempdir()
        .unwrap()
}

pub fn write_file(path: &Path, data: &[u8]) {
    std::fs::write(path, data).unwrap();
}

/// Build an image from `(address, data)` runs using 16-byte data records.
pub fn hex_image(runs: &[(u32, Vec<u8>)]) -> String {
    let mut out = String::new();
    let mut upper: Option<u16> = None;
    for (address, data) in runs {
        let address = *address;
        for (i, chunk) in data.chunks(16).enumerate() {
            let addr = address + (i * 16) as u32;
            let hi = (addr >> 16) as u16;
            if upper != Some(hi) {
                out += &Record::extended_linear_address(hi).encode().unwrap();
                upper = Some(hi);
            }
            out += &Record::data(addr as u16, chunk).encode().unwrap();
        }
    }
    out += &Record::end_of_file().encode().unwrap();
    out
}

pub fn write_hex(dir: &Path, name: &str, runs: &[(u32, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    write_file(&path, hex_image(runs).as_bytes());
    path
}

pub fn read_blocks(path: &Path) -> Vec<Block> {
    let data = std::fs::read(path).unwrap();
    parse_blocks(&data).unwrap()
}

pub fn run_mergehex(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mergehex"))
        .args(args)
        .output()
        .unwrap()
}

pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("mergehex failed: {stderr}");
    }
}

pub fn read_nonempty_lines(path: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(path).unwrap();
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
