//! Integration tests for the state store: load fallbacks, batching and
//! subscriber behaviour against a real SQLite backend.

use std::cell::RefCell;
use std::rc::Rc;

use blyx_core::state::{SettingsPatch, Theme, WeatherPatch, CHAT_CAPACITY};
use blyx_core::state::ChatMessage;
use blyx_core::{KeyValueStore, LoadOutcome, MemoryKv, SqliteKv, Store};
use chrono::Utc;
use tempfile::TempDir;

#[test]
fn test_corrupt_payload_falls_back_to_defaults() {
    let kv = MemoryKv::new();
    kv.insert_raw("k", "{not json");
    let (store, outcome) = Store::open(Box::new(kv.clone()), "k");
    assert_eq!(outcome, LoadOutcome::Corrupt);
    assert_eq!(store.snapshot().session.planned_minutes, 25);

    store.set_notes("fresh start");
    assert!(kv.raw("k").unwrap().contains("fresh start"));
}

#[test]
fn test_partial_payload_keeps_valid_slices() {
    let kv = MemoryKv::new();
    kv.insert_raw(
        "k",
        r#"{"notes":"keep me","settings":{"theme":"dawn"},"stats":{"coins":"many"}}"#,
    );
    let (store, outcome) = Store::open(Box::new(kv), "k");
    match outcome {
        LoadOutcome::Partial { dropped } => assert_eq!(dropped, vec!["stats"]),
        other => panic!("expected partial load, got {other:?}"),
    }
    let state = store.snapshot();
    assert_eq!(state.notes, "keep me");
    assert_eq!(state.settings.theme, Theme::Dawn);
    assert_eq!(state.stats.coins, 0);
}

#[test]
fn test_sqlite_round_trip_preserves_every_slice() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");
    {
        let (store, _) = Store::open(Box::new(SqliteKv::open_at(&path).unwrap()), "k");
        store.batch(|s| {
            s.update_settings(|_| SettingsPatch {
                theme: Some(Theme::Glacier),
                dyslexia_font: Some(true),
                ..Default::default()
            });
            s.set_notes("draft outline");
            s.set_weather(WeatherPatch {
                zip: Some("10001".into()),
                cached_at: Some(Utc::now().timestamp_millis()),
                temperature: Some(Some(72)),
                condition: Some(Some("Clear skies · New York".into())),
            });
            s.append_chat_message(ChatMessage::user("hi", Utc::now()));
        });
        assert_eq!(store.writes(), 1);
    }

    let kv = SqliteKv::open_at(&path).unwrap();
    assert!(kv.get("k").unwrap().is_some());
    let (store, outcome) = Store::open(Box::new(kv), "k");
    assert_eq!(outcome, LoadOutcome::Restored);
    let state = store.snapshot();
    assert_eq!(state.settings.theme, Theme::Glacier);
    assert!(state.settings.dyslexia_font);
    assert_eq!(state.notes, "draft outline");
    assert_eq!(state.weather.zip, "10001");
    assert_eq!(state.weather.temperature, Some(72));
    assert_eq!(state.chat.messages.len(), 1);
}

#[test]
fn test_chat_log_keeps_newest_messages() {
    let store = Store::in_memory();
    for i in 0..CHAT_CAPACITY + 5 {
        store.append_chat_message(ChatMessage::user(format!("m{i}"), Utc::now()));
    }
    let state = store.snapshot();
    assert_eq!(state.chat.messages.len(), CHAT_CAPACITY);
    assert_eq!(state.chat.messages[0].content, "m5");
}

#[test]
fn test_subscriber_sees_every_mutation_until_unsubscribed() {
    let store = Store::in_memory();
    let notes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notes);
    let sub = store.subscribe(move |state| {
        sink.borrow_mut().push(state.notes.clone());
        Ok(())
    });

    store.set_notes("one");
    store.set_notes("two");
    sub.unsubscribe();
    store.set_notes("three");

    assert_eq!(*notes.borrow(), vec!["one", "two"]);
    assert_eq!(store.listener_count(), 0);
}
