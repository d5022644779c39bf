// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::writer::WalWriter;
use ebx_core::Operation;
use std::io::Write;

fn output(name: &str) -> Operation {
    Operation::OutputSet {
        name: name.to_string(),
        value: "v".to_string(),
    }
}

#[test]
fn missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let reader = WalReader::open_or_empty(&dir.path().join("state.wal"));
    assert_eq!(reader.entries().unwrap().count(), 0);
    assert_eq!(reader.last_sequence().unwrap(), None);
}

#[test]
fn reads_entries_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let mut writer = WalWriter::open(&path).unwrap();
    writer.append(output("a")).unwrap();
    writer.append(output("b")).unwrap();

    let entries: Vec<_> = WalReader::open_or_empty(&path)
        .entries()
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].sequence, 0);
    assert_eq!(entries[1].operation, output("b"));
}

#[test]
fn truncated_tail_is_reported_as_corrupted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let mut writer = WalWriter::open(&path).unwrap();
    writer.append(output("a")).unwrap();
    drop(writer);

    let valid_len = std::fs::metadata(&path).unwrap().len();
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(br#"{"sequence":1,"timest"#).unwrap();

    let reader = WalReader::open_or_empty(&path);
    let mut iter = reader.entries().unwrap();
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(
        iter.next(),
        Some(Err(WalReadError::Corrupted { line: 2, .. }))
    ));
    assert_eq!(iter.last_valid_position(), valid_len);
    assert!(iter.at_end());
}

#[test]
fn checksum_mismatch_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let mut writer = WalWriter::open(&path).unwrap();
    writer.append(output("a")).unwrap();
    drop(writer);

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, text.replace(r#""value":"v""#, r#""value":"w""#)).unwrap();

    let mut iter = WalReader::open_or_empty(&path).entries().unwrap();
    assert!(matches!(
        iter.next(),
        Some(Err(WalReadError::ChecksumMismatch { line: 1 }))
    ));
}

#[test]
fn blank_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.wal");
    let line = crate::WalEntry::new(0, output("a")).to_line().unwrap();
    std::fs::write(&path, format!("\n{}\n\n", line)).unwrap();

    let mut iter = WalReader::open_or_empty(&path).entries().unwrap();
    assert!(iter.next().unwrap().is_ok());
    assert!(iter.next().is_none());
}
