use custody_canonical::{BatchId, Canonicalizer, Timestamp};
use custody_core::{Block, EventType, UnsealedBlock};
use custody_journal::frame::{HEADER_SIZE, MAX_PAYLOAD_SIZE};
use custody_journal::{FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions};
use serde_json::json;
use std::fs;
use std::io::{Seek, Write};
use std::path::Path;
use tempfile::TempDir;

fn make_chain(count: u64) -> Vec<Block> {
    let canonicalizer = Canonicalizer::default_profile();
    let mut chain: Vec<Block> = Vec::new();
    for i in 0..count {
        let block = UnsealedBlock::after(
            chain.last(),
            Timestamp::new(format!("2024-06-10T12:00:{:02}.000Z", i)),
            BatchId::new(format!("B{}", i)),
            EventType::Rating,
            json!({"rating": 4}),
        )
        .seal(i + 1, &canonicalizer)
        .unwrap();
        chain.push(block);
    }
    chain
}

fn write_chain(path: &Path, chain: &[Block]) -> Vec<u64> {
    let mut ends = Vec::new();
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for block in chain {
        writer.append_block(block).unwrap();
        ends.push(writer.len());
    }
    writer.finish().unwrap();
    ends
}

fn cut(path: &Path, len: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len).unwrap();
}

#[test]
fn test_payload_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");

    let oversized_payload = vec![0u8; MAX_PAYLOAD_SIZE as usize + 1];
    let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
    match writer.append_raw(FrameKind::BlockJson, &oversized_payload) {
        Err(JournalError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as u64 + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
    assert!(writer.is_empty());
    writer.finish().unwrap();
    assert_eq!(fs::metadata(&journal_path).unwrap().len(), HEADER_SIZE as u64);
}

#[test]
fn test_reserved_bytes_must_be_zero() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    write_chain(&journal_path, &make_chain(1));

    let mut file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&journal_path)
        .unwrap();
    file.seek(std::io::SeekFrom::Start(HEADER_SIZE as u64 + 1))
        .unwrap();
    file.write_all(&[0x01]).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
    match reader.read_frame() {
        Err(JournalError::InvalidFrame { offset, .. }) => assert_eq!(offset, HEADER_SIZE as u64),
        other => panic!("expected InvalidFrame, got {other:?}"),
    }
}

#[test]
fn test_torn_tail_handling() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = make_chain(2);
    let ends = write_chain(&journal_path, &chain);

    // 10 bytes into the second frame
    cut(&journal_path, ends[0] + 10);

    {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
        assert_eq!(reader.read_block().unwrap().unwrap(), chain[0]);
        match reader.read_block() {
            Err(JournalError::TruncatedFrame { offset }) => assert_eq!(offset, ends[0]),
            other => panic!("expected TruncatedFrame, got {other:?}"),
        }
    }

    {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
        assert_eq!(reader.read_all().unwrap(), vec![chain[0].clone()]);
        assert!(reader.torn_tail());
        assert_eq!(reader.valid_len(), ends[0]);
    }
}

#[test]
fn test_torn_frame_header() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = make_chain(2);
    let ends = write_chain(&journal_path, &chain);

    cut(&journal_path, ends[0] + 3);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
    assert_eq!(reader.read_all().unwrap().len(), 1);
    assert!(reader.torn_tail());
    assert_eq!(reader.valid_len(), ends[0]);
}

#[test]
fn test_truncate_then_append_continues() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = make_chain(3);
    let ends = write_chain(&journal_path, &chain[..2]);

    cut(&journal_path, ends[1] - 4);

    let valid_len = {
        let mut reader = JournalReader::open(&journal_path, ReadMode::Permissive).unwrap();
        reader.read_all().unwrap();
        reader.valid_len()
    };
    assert_eq!(valid_len, ends[0]);

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.truncate(valid_len).unwrap();
        writer.append_block(&chain[1]).unwrap();
        writer.finish().unwrap();
    }

    let blocks = JournalReader::open(&journal_path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(blocks, chain[..2].to_vec());
}

#[test]
fn test_unknown_frame_kind_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = make_chain(1);
    write_chain(&journal_path, &chain);

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&journal_path)
        .unwrap();
    let mut frame_header = [0u8; 8];
    frame_header[0] = 0xFF;
    frame_header[4..8].copy_from_slice(&10u32.to_le_bytes());
    file.write_all(&frame_header).unwrap();
    file.write_all(b"unknown123").unwrap();
    drop(file);

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_block().unwrap().unwrap(), chain[0]);
    assert!(reader.read_block().unwrap().is_none());
}

#[test]
fn test_tampered_hash_still_loads() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let mut chain = make_chain(1);
    chain[0].hash = custody_canonical::Digest::new("not-a-hash".into());
    write_chain(&journal_path, &chain);

    let blocks = JournalReader::open(&journal_path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(blocks[0].hash.as_str(), "not-a-hash");
}
