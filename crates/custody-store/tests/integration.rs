use custody_canonical::{BatchId, Canonicalizer, Timestamp};
use custody_core::{Block, CertificateTier, EventType, ScoringMode, UnsealedBlock};
use custody_store::{
    events_for_batch, summarize_batches, AndFilter, BatchFilter, EventTypeFilter, FilteredReader,
    JournalBackendReader, JournalBackendWriter, MemoryReader, MemoryStore, OrFilter, ReadMode,
    StoreReader, StoreWriter, TimeRangeFilter, WriteOptions,
};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn make_chain(events: &[(&str, &str, Value)]) -> Vec<Block> {
    let canonicalizer = Canonicalizer::default_profile();
    let mut chain: Vec<Block> = Vec::new();
    for (i, (batch, event_type, data)) in events.iter().enumerate() {
        let block = UnsealedBlock::after(
            chain.last(),
            Timestamp::new(format!("2024-06-10T12:00:{:02}.000Z", i)),
            BatchId::new(batch.to_string()),
            EventType::from(*event_type),
            data.clone(),
        )
        .seal(i as u64 + 1, &canonicalizer)
        .unwrap();
        chain.push(block);
    }
    chain
}

fn sample_chain() -> Vec<Block> {
    make_chain(&[
        ("B1", "BATCH_CREATED", json!({})),
        ("B2", "BATCH_CREATED", json!({})),
        ("B1", "IOT_UPDATE", json!({"temperature": 20, "humidity": 50})),
        ("B1", "DISPATCHED", json!({"location": "Farm"})),
        ("B2", "RATING", json!({"rating": 1})),
        ("B1", "RECEIVED", json!({"location": "Port"})),
        ("B1", "RATING", json!({"rating": 5})),
        ("B1", "FINALIZED", json!({"finalizedBy": "Coop"})),
    ])
}

#[test]
fn test_journal_backend_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = sample_chain();

    {
        let mut writer =
            JournalBackendWriter::open(&journal_path, WriteOptions::default()).unwrap();
        for block in &chain {
            writer.append(block).unwrap();
        }
        writer.flush().unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalBackendReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_all().unwrap(), chain);
    assert!(!reader.torn_tail());
}

#[test]
fn test_journal_backend_strict_truncation() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.csj");
    let chain = sample_chain();

    {
        let mut writer =
            JournalBackendWriter::open(&journal_path, WriteOptions::default()).unwrap();
        for block in &chain[..2] {
            writer.append(block).unwrap();
        }
    }
    let len = fs::metadata(&journal_path).unwrap().len();
    fs::OpenOptions::new()
        .write(true)
        .open(&journal_path)
        .unwrap()
        .set_len(len - 5)
        .unwrap();

    let mut strict = JournalBackendReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert!(strict.read_all().is_err());

    let mut permissive = JournalBackendReader::open(&journal_path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_all().unwrap(), chain[..1].to_vec());
    assert!(permissive.torn_tail());
}

#[test]
fn test_memory_store_round_trip() {
    let chain = sample_chain();
    let mut store = MemoryStore::new();
    for block in &chain {
        store.append(block).unwrap();
    }
    assert_eq!(store.blocks(), chain.as_slice());
    assert_eq!(store.reader().read_all().unwrap(), chain);
}

#[test]
fn test_batch_filter() {
    let reader = MemoryReader::new(sample_chain());
    let mut filtered = FilteredReader::new(
        reader,
        BatchFilter {
            batch_id: BatchId::new("B2".into()),
        },
    );
    let blocks = filtered.read_all().unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b.batch_id.as_str() == "B2"));
    assert!(blocks[0].sequence_id < blocks[1].sequence_id);
}

#[test]
fn test_event_type_filter() {
    let reader = MemoryReader::new(sample_chain());
    let mut filtered = FilteredReader::new(
        reader,
        EventTypeFilter {
            event_type: EventType::Rating,
        },
    );
    let blocks = filtered.read_all().unwrap();
    assert_eq!(
        blocks.iter().map(|b| b.sequence_id).collect::<Vec<_>>(),
        vec![5, 7]
    );
}

#[test]
fn test_time_range_filter() {
    let reader = MemoryReader::new(sample_chain());
    let mut filtered = FilteredReader::new(
        reader,
        TimeRangeFilter {
            after: Some(Timestamp::new("2024-06-10T12:00:02.000Z".into())),
            before: Some(Timestamp::new("2024-06-10T12:00:04.000Z".into())),
        },
    );
    let blocks = filtered.read_all().unwrap();
    assert_eq!(
        blocks.iter().map(|b| b.index_number).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
}

#[test]
fn test_and_or_filters() {
    let b1_ratings = AndFilter {
        filters: vec![
            Box::new(BatchFilter {
                batch_id: BatchId::new("B1".into()),
            }),
            Box::new(EventTypeFilter {
                event_type: EventType::Rating,
            }),
        ],
    };
    let mut reader = FilteredReader::new(MemoryReader::new(sample_chain()), b1_ratings);
    assert_eq!(reader.read_all().unwrap().len(), 1);

    let handoffs = OrFilter {
        filters: vec![
            Box::new(EventTypeFilter {
                event_type: EventType::Dispatched,
            }),
            Box::new(EventTypeFilter {
                event_type: EventType::Received,
            }),
        ],
    };
    let mut reader = FilteredReader::new(MemoryReader::new(sample_chain()), handoffs);
    assert_eq!(reader.read_all().unwrap().len(), 2);
}

#[test]
fn test_events_for_batch_view() {
    let events = events_for_batch(
        MemoryReader::new(sample_chain()),
        &BatchId::new("B1".into()),
    )
    .unwrap();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0].event_type, EventType::BatchCreated);
    assert_eq!(events[5].event_type, EventType::Finalized);

    let none = events_for_batch(MemoryReader::new(sample_chain()), &BatchId::new("B9".into()))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_batch_summaries() {
    let rows = summarize_batches(&sample_chain(), ScoringMode::Inline);
    assert_eq!(rows.len(), 2);

    let b1 = &rows[0];
    assert_eq!(b1.batch_id.as_str(), "B1");
    assert_eq!(b1.event_count, 6);
    assert_eq!(b1.first_event.as_str(), "2024-06-10T12:00:00.000Z");
    assert_eq!(b1.last_event.as_str(), "2024-06-10T12:00:07.000Z");
    assert_eq!(b1.score, 20);
    assert_eq!(b1.certificate, CertificateTier::Bronze);

    let b2 = &rows[1];
    assert_eq!(b2.batch_id.as_str(), "B2");
    assert_eq!(b2.event_count, 2);
    assert_eq!(b2.score, 2 - 2);
    assert_eq!(b2.certificate, CertificateTier::None);

    assert_eq!(
        serde_json::to_value(b2).unwrap(),
        json!({
            "batchId": "B2",
            "firstEvent": "2024-06-10T12:00:01.000Z",
            "lastEvent": "2024-06-10T12:00:04.000Z",
            "eventCount": 2,
            "score": 0,
            "certificate": "None"
        })
    );
}

#[test]
fn test_batch_summaries_tie_on_last_event() {
    let mut chain = make_chain(&[
        ("B2", "BATCH_CREATED", json!({})),
        ("B1", "BATCH_CREATED", json!({})),
    ]);
    chain[1].timestamp = chain[0].timestamp.clone();
    let rows = summarize_batches(&chain, ScoringMode::Inline);
    assert_eq!(rows[0].batch_id.as_str(), "B1");
    assert_eq!(rows[1].batch_id.as_str(), "B2");
}
