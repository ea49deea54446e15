//! Scope behaviour as observed through the tracing sink.

use std::panic::{self, AssertUnwindSafe};

use tracing::Level;

use notes_service::observability::mdc;
use notes_service::mdc_scope;

mod common;
use common::with_recording;

/// Target of records emitted by scopes opened in this file.
const TARGET: &str = module_path!();

#[test]
fn nested_scopes() {
    mdc::clear();
    let ((), logs) = with_recording(|| {
        let outer = mdc_scope!(
            info,
            "outer action",
            "outerKey" => "outerValue",
            "sharedKey" => "sharedValue",
        );
        assert_eq!(mdc::get("outerKey").as_deref(), Some("outerValue"));
        assert_eq!(mdc::get("sharedKey").as_deref(), Some("sharedValue"));
        tracing::info!("Message in outer wrapper");

        {
            let _inner = mdc_scope!(debug, "inner action", "innerKey" => "innerValue");
            assert_eq!(mdc::get("outerKey").as_deref(), Some("outerValue"));
            assert_eq!(mdc::get("sharedKey").as_deref(), Some("sharedValue"));
            assert_eq!(mdc::get("innerKey").as_deref(), Some("innerValue"));
            tracing::debug!("Message in inner wrapper");
        }

        assert!(mdc::get("innerKey").is_none());
        assert_eq!(mdc::get("outerKey").as_deref(), Some("outerValue"));
        assert_eq!(mdc::get("sharedKey").as_deref(), Some("sharedValue"));

        outer.close();

        assert!(mdc::get("outerKey").is_none());
        assert!(mdc::get("sharedKey").is_none());
        assert!(mdc::get("innerKey").is_none());
    });

    let records = logs.records();
    assert_eq!(
        logs.messages(),
        [
            "Started outer action",
            "Message in outer wrapper",
            "Started inner action",
            "Message in inner wrapper",
            "Finished inner action",
            "Finished outer action",
        ]
    );

    assert_eq!(records[0].level, Level::INFO);
    assert_eq!(records[0].mdc.get("outerKey").map(String::as_str), Some("outerValue"));
    assert_eq!(records[0].mdc.get("sharedKey").map(String::as_str), Some("sharedValue"));

    assert_eq!(records[1].mdc.get("outerKey").map(String::as_str), Some("outerValue"));

    assert_eq!(records[2].level, Level::DEBUG);
    assert_eq!(records[2].mdc.get("innerKey").map(String::as_str), Some("innerValue"));
    assert_eq!(records[2].mdc.get("outerKey").map(String::as_str), Some("outerValue"));

    assert_eq!(records[3].mdc.get("innerKey").map(String::as_str), Some("innerValue"));
    assert_eq!(records[3].mdc.get("outerKey").map(String::as_str), Some("outerValue"));

    assert_eq!(records[4].level, Level::DEBUG);
    assert_eq!(records[4].mdc.get("innerKey").map(String::as_str), Some("innerValue"));
    assert_eq!(records[4].mdc.get("outerKey").map(String::as_str), Some("outerValue"));

    assert_eq!(records[5].level, Level::INFO);
    assert_eq!(records[5].mdc.get("outerKey").map(String::as_str), Some("outerValue"));
    assert!(!records[5].mdc.contains_key("innerKey"));

    // Scope records are attributed to this file, not to the mdc module.
    assert!(records
        .iter()
        .filter(|r| r.message.starts_with("Started") || r.message.starts_with("Finished"))
        .all(|r| r.target == TARGET));
}

#[test]
fn finished_record_sees_keys_added_by_put() {
    mdc::clear();
    let ((), logs) = with_recording(|| {
        let mut scope = mdc_scope!(debug, "saving", "title" => "groceries");
        scope.put("id", "42").put("attempt", "1");
        scope.put("attempt", "2");
    });

    let records = logs.records();
    assert_eq!(records.len(), 2, "one Started and one Finished regardless of puts");
    assert_eq!(records[0].message, "Started saving");
    assert!(!records[0].mdc.contains_key("id"));
    assert_eq!(records[1].message, "Finished saving");
    assert_eq!(records[1].mdc.get("id").map(String::as_str), Some("42"));
    assert_eq!(records[1].mdc.get("attempt").map(String::as_str), Some("2"));
    assert_eq!(records[1].mdc.get("title").map(String::as_str), Some("groceries"));
    assert!(mdc::is_empty());
}

#[derive(Debug)]
struct Failed;

fn parse() -> Result<u32, Failed> {
    Err(Failed)
}

fn failing_operation() -> Result<u32, Failed> {
    let mut scope = mdc_scope!(info, "failing", "stage" => "load");
    scope.put("stage2", "parse");
    let parsed = parse()?;
    Ok(parsed + 1)
}

#[test]
fn early_return_still_closes() {
    mdc::clear();
    let (result, logs) = with_recording(failing_operation);

    assert!(result.is_err());
    assert!(mdc::is_empty());
    assert_eq!(logs.messages(), ["Started failing", "Finished failing"]);
    assert_eq!(logs.records()[1].mdc.len(), 2);
}

#[test]
fn panic_still_closes() {
    mdc::clear();
    let (result, logs) = with_recording(|| {
        panic::catch_unwind(AssertUnwindSafe(|| {
            let _outer = mdc_scope!(info, "outer", "a" => "1");
            let _inner = mdc_scope!(debug, "inner", "b" => "2");
            panic!("boom");
        }))
    });

    assert!(result.is_err());
    assert!(mdc::is_empty());
    assert_eq!(
        logs.messages(),
        ["Started outer", "Started inner", "Finished inner", "Finished outer"]
    );
}

#[test]
fn outer_keys_survive_inner_close() {
    mdc::clear();
    mdc::insert("preexisting", "yes");

    let outer = mdc_scope!(info, "outer", "o1" => "a", "o2" => "b");
    for depth in 0..5 {
        let key = format!("inner{depth}");
        let mut inner = mdc_scope!(debug, "inner", key.as_str() => "x");
        inner.put(format!("{key}-put"), "y");
        assert_eq!(mdc::snapshot().len(), 5);
        inner.close();
        assert_eq!(mdc::get("o1").as_deref(), Some("a"));
        assert_eq!(mdc::get("o2").as_deref(), Some("b"));
        assert!(mdc::get(&key).is_none());
    }
    drop(outer);

    assert_eq!(mdc::snapshot().len(), 1);
    assert_eq!(mdc::get("preexisting").as_deref(), Some("yes"));
    mdc::clear();
}

#[test]
fn deeply_nested_scopes_leave_nothing_behind() {
    mdc::clear();

    fn open(depth: usize) {
        if depth == 0 {
            return;
        }
        let key = format!("level{depth}");
        let mut scope = mdc_scope!(debug, format!("level {depth}"), key.as_str() => "v");
        scope.put(format!("{key}-extra"), "w");
        open(depth - 1);
        assert_eq!(mdc::get(&key).as_deref(), Some("v"));
    }

    let ((), logs) = with_recording(|| open(8));

    assert!(mdc::is_empty());
    assert_eq!(logs.records().len(), 16);
    assert_eq!(logs.messages().first().map(String::as_str), Some("Started level 8"));
    assert_eq!(logs.messages().last().map(String::as_str), Some("Finished level 8"));
}

#[test]
fn context_is_private_to_each_thread() {
    mdc::clear();
    let _scope = mdc_scope!(info, "main thread", "owner" => "main");

    std::thread::spawn(|| {
        assert!(mdc::get("owner").is_none());
        let _scope = mdc_scope!(info, "worker", "owner" => "worker");
        assert_eq!(mdc::get("owner").as_deref(), Some("worker"));
    })
    .join()
    .unwrap();

    assert_eq!(mdc::get("owner").as_deref(), Some("main"));
}
