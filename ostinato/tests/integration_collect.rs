//! Integration tests for the collect barrier and collection transforms.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use ostinato::error::Result;
use ostinato::{
    CollectError, DateTimeIndex, Frequency, OstinatoError, Sequential, SeriesCollection, Threaded,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn daily_index(periods: i64) -> Arc<DateTimeIndex> {
    DateTimeIndex::uniform(t0(), periods, Frequency::days(1).unwrap())
        .unwrap()
        .into_shared()
}

/// The end-to-end scenario: a 3-period daily index, two partitions, one
/// series each, collected into a local table.
#[test]
fn test_collect_scenario() -> Result<()> {
    let index = daily_index(3);
    let collection = SeriesCollection::new(
        Arc::clone(&index),
        vec![
            vec![("x".to_string(), vec![1.0, 2.0, 3.0])],
            vec![("y".to_string(), vec![4.0, 5.0, 6.0])],
        ],
    )?;

    let table = collection.collect()?;

    assert_eq!(table.len(), 2);
    let x = table.get("x").unwrap();
    let y = table.get("y").unwrap();
    assert_eq!(x.values(), &[1.0, 2.0, 3.0]);
    assert_eq!(y.values(), &[4.0, 5.0, 6.0]);

    // Every series shares the collection's index, no copies.
    assert!(Arc::ptr_eq(x.index(), &index));
    assert!(Arc::ptr_eq(y.index(), &index));
    assert_eq!(x.len(), index.len());

    Ok(())
}

#[test]
fn test_duplicate_key_aborts_with_no_partial_table() {
    let collection = SeriesCollection::new(
        daily_index(2),
        vec![
            vec![("a".to_string(), vec![1.0, 2.0])],
            vec![("b".to_string(), vec![3.0, 4.0])],
            vec![("a".to_string(), vec![5.0, 6.0])],
        ],
    )
    .unwrap();

    // All-or-nothing: the error is all a caller can observe.
    let err = collection.collect().expect_err("must fail");
    match err {
        OstinatoError::Collect(CollectError::DuplicateKey { key, partition }) => {
            assert_eq!(key, "a");
            assert_eq!(partition, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The collection itself is untouched and can be repaired by filtering.
    let repaired = collection.filter(|key| key != "a");
    assert_eq!(repaired.collect().unwrap().sorted_keys(), vec!["b"]);
}

#[test]
fn test_sequential_and_threaded_substrates_agree() -> Result<()> {
    // Enough partitions that threaded execution actually interleaves.
    let index = daily_index(8);
    let partitions: Vec<_> = (0..64)
        .map(|p| {
            vec![(
                format!("series-{p}"),
                (0..8).map(|i| (p * 8 + i) as f64).collect::<Vec<f64>>(),
            )]
        })
        .collect();
    let collection = SeriesCollection::new(index, partitions)?;

    let seq = collection.collect_with(&Sequential)?;
    let thr = collection.collect_with(&Threaded)?;

    assert_eq!(seq.len(), 64);
    assert_eq!(seq.sorted_keys(), thr.sorted_keys());
    for key in seq.sorted_keys() {
        assert_eq!(seq.get(key).unwrap().values(), thr.get(key).unwrap().values());
    }
    Ok(())
}

#[test]
fn test_filter_then_map_then_collect_pipeline() -> Result<()> {
    let collection = SeriesCollection::new(
        daily_index(2),
        vec![
            vec![
                ("cpu.web1".to_string(), vec![10.0, 20.0]),
                ("mem.web1".to_string(), vec![1.0, 2.0]),
            ],
            vec![("cpu.web2".to_string(), vec![30.0, 40.0])],
        ],
    )?;

    let table = collection
        .filter(|key| key.starts_with("cpu."))
        .map_series(|_, values| values.iter().map(|v| v / 10.0).collect())?
        .collect()?;

    assert_eq!(table.sorted_keys(), vec!["cpu.web1", "cpu.web2"]);
    assert_eq!(table.get("cpu.web1").unwrap().values(), &[1.0, 2.0]);
    assert_eq!(table.get("cpu.web2").unwrap().values(), &[3.0, 4.0]);

    // The source collection still holds all three entries.
    assert_eq!(collection.series_count(), 3);
    Ok(())
}

#[test]
fn test_map_series_failure_reports_first_in_partition_order() {
    let collection = SeriesCollection::new(
        daily_index(2),
        vec![
            vec![("ok".to_string(), vec![1.0, 2.0])],
            vec![("bad-1".to_string(), vec![1.0, 2.0])],
            vec![("bad-2".to_string(), vec![1.0, 2.0])],
        ],
    )
    .unwrap();

    // Both "bad" entries produce wrong-length output; the reported error
    // must be the first in partition order, deterministically.
    for _ in 0..10 {
        let err = collection
            .map_series(|key, values| {
                if key.starts_with("bad") {
                    vec![]
                } else {
                    values.to_vec()
                }
            })
            .expect_err("must fail");
        match err {
            OstinatoError::Collect(CollectError::LengthMismatch { key, partition, .. }) => {
                assert_eq!(key, "bad-1");
                assert_eq!(partition, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_collection_construction_rejects_misaligned_partition() {
    let err = SeriesCollection::new(
        daily_index(3),
        vec![
            vec![("good".to_string(), vec![1.0, 2.0, 3.0])],
            vec![("short".to_string(), vec![1.0])],
        ],
    )
    .expect_err("must fail");

    match err {
        OstinatoError::Collect(CollectError::LengthMismatch {
            key,
            partition,
            values,
            index,
        }) => {
            assert_eq!(key, "short");
            assert_eq!(partition, 1);
            assert_eq!(values, 1);
            assert_eq!(index, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}
