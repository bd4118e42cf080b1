//! Behavior tests for the persistence layer: snapshot upsert semantics and
//! fee cache restarts.

use std::fs;

use etfsignal_store::{FeeCache, FeeRecord, SnapshotRecord, SnapshotStore};
use tempfile::tempdir;

fn row(date: &str, code: &str) -> SnapshotRecord {
    SnapshotRecord {
        date: date.to_owned(),
        code: code.to_owned(),
        name: format!("fund {code}"),
        management_rate: Some(0.5),
        custody_rate: Some(0.1),
        latest_close: Some(3.52),
        ma60: Some(3.41),
        ma_relation: String::from("above"),
        ma_cross: String::new(),
        macd_dif: Some(0.021),
        macd_dea: Some(0.017),
        macd_histogram: Some(0.008),
        macd_flip: String::new(),
    }
}

#[test]
fn upsert_twice_equals_upsert_once() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("history.csv");
    let store = SnapshotStore::new(&path);
    let rows = vec![row("2025-06-02", "510300"), row("2025-06-02", "159915")];

    store.upsert("2025-06-02", &rows).expect("first");
    let after_first = fs::read_to_string(&path).expect("read");

    store.upsert("2025-06-02", &rows).expect("second");
    let after_second = fs::read_to_string(&path).expect("read");

    assert_eq!(after_first, after_second);
}

#[test]
fn upserting_one_date_leaves_other_dates_untouched() {
    let temp = tempdir().expect("tempdir");
    let store = SnapshotStore::new(temp.path().join("history.csv"));

    let first_day = vec![row("2025-06-02", "510300")];
    let second_day = vec![row("2025-06-03", "510300"), row("2025-06-03", "159915")];

    store.upsert("2025-06-02", &first_day).expect("day one");
    store.upsert("2025-06-03", &second_day).expect("day two");

    assert_eq!(store.read("2025-06-02").expect("read"), first_day);
    assert_eq!(store.read("2025-06-03").expect("read"), second_day);
    assert_eq!(
        store.all_dates().expect("dates"),
        vec!["2025-06-02", "2025-06-03"]
    );
}

#[test]
fn rerun_replaces_the_whole_date() {
    let temp = tempdir().expect("tempdir");
    let store = SnapshotStore::new(temp.path().join("history.csv"));

    store
        .upsert(
            "2025-06-02",
            &[row("2025-06-02", "510300"), row("2025-06-02", "159915")],
        )
        .expect("initial");

    // The rerun produced fewer rows; the stale one must not survive.
    let rerun = vec![row("2025-06-02", "510300")];
    store.upsert("2025-06-02", &rerun).expect("rerun");

    assert_eq!(store.read("2025-06-02").expect("read"), rerun);
}

#[test]
fn absent_date_reads_empty() {
    let temp = tempdir().expect("tempdir");
    let store = SnapshotStore::new(temp.path().join("history.csv"));
    store
        .upsert("2025-06-02", &[row("2025-06-02", "510300")])
        .expect("seed");

    assert!(store.read("2025-05-30").expect("read").is_empty());
}

#[test]
fn fee_cache_survives_a_restart() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("fees.json");

    let cache = FeeCache::load(&path);
    let fee = FeeRecord {
        management_rate: 0.15,
        custody_rate: 0.05,
    };
    cache.put("159915", fee.clone());
    cache.flush().expect("flush");
    drop(cache);

    let reloaded = FeeCache::load(&path);
    assert_eq!(reloaded.get("159915"), Some(fee));
}

#[test]
fn corrupt_fee_cache_degrades_to_empty() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("fees.json");
    fs::write(&path, "]]definitely not json[[").expect("write junk");

    let cache = FeeCache::load(&path);
    assert!(cache.is_empty());

    // And it can still be written back over the junk.
    cache.put("510300", FeeRecord { management_rate: 0.5, custody_rate: 0.1 });
    cache.flush().expect("flush over corrupt file");
    assert_eq!(FeeCache::load(&path).len(), 1);
}

#[test]
fn history_file_stays_parseable_by_line_tools() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("history.csv");
    let store = SnapshotStore::new(&path);

    let mut no_macd = row("2025-06-02", "159001");
    no_macd.macd_dif = None;
    no_macd.macd_dea = None;
    no_macd.macd_histogram = None;
    no_macd.ma_relation = String::from("unavailable");
    store
        .upsert("2025-06-02", &[row("2025-06-02", "510300"), no_macd])
        .expect("upsert");

    let raw = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one line per row");
    assert!(lines[0].starts_with("date,code,name,"));
    // Every data line has the full column count even with absent values.
    let columns = lines[0].split(',').count();
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), columns);
    }
}
