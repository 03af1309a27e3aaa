//! History and config store tests: the never-crash-on-bad-files policy

use std::fs;
use std::path::Path;

use speaknotes_app::config::{ConfigSnapshot, ConfigStore};
use speaknotes_app::history::{HistoryEntry, HistoryStore};
use speaknotes_app::session::TextSource;
use speaknotes_tts::TtsSettings;
use tempfile::TempDir;

fn entry(file: &str, text: &str) -> HistoryEntry {
    HistoryEntry::new(
        Path::new(file),
        &TtsSettings::default(),
        "export",
        &TextSource::Manual,
        text,
    )
}

#[test]
fn missing_history_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    assert!(store.load().is_empty());
}

#[test]
fn malformed_history_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "{ not json at all").unwrap();
    let store = HistoryStore::new(&path);
    assert!(store.load().is_empty());
}

#[test]
fn append_preserves_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    store.append(entry("/tmp/a.aiff", "first")).unwrap();
    store.append(entry("/tmp/b.aiff", "second")).unwrap();
    store.append(entry("/tmp/c.aiff", "third")).unwrap();

    let entries = store.load();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text_preview, "first");
    assert_eq!(entries[2].text_preview, "third");
}

#[test]
fn history_survives_a_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    HistoryStore::new(&path)
        .append(entry("/tmp/a.aiff", "note"))
        .unwrap();

    let reloaded = HistoryStore::new(&path).load();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].voice, "default");
}

#[test]
fn migrate_rewrites_only_existing_relative_paths() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("outputs");
    fs::create_dir_all(&outputs).unwrap();
    fs::write(outputs.join("kept.aiff"), b"x").unwrap();

    let path = dir.path().join("history.json");
    let mut old = entry("ignored", "a");
    old.file = "outputs/kept.aiff".to_string();
    let mut missing = entry("ignored", "b");
    missing.file = "outputs/gone.aiff".to_string();
    let absolute = entry("/tmp/already.aiff", "c");
    fs::write(
        &path,
        serde_json::to_string_pretty(&vec![old, missing, absolute.clone()]).unwrap(),
    )
    .unwrap();

    let store = HistoryStore::new(&path);
    let changed = store.migrate_paths(dir.path()).unwrap();
    assert_eq!(changed, 1);

    let entries = store.load();
    assert_eq!(
        entries[0].file,
        outputs.join("kept.aiff").display().to_string()
    );
    assert_eq!(entries[1].file, "outputs/gone.aiff");
    assert_eq!(entries[2].file, absolute.file);
}

#[test]
fn missing_config_loads_as_defaults() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.json"));
    let snapshot = store.load();
    assert_eq!(snapshot, ConfigSnapshot::default());
    assert_eq!(snapshot.preset, "study");
    assert_eq!(snapshot.mode, "export");
}

#[test]
fn malformed_config_loads_as_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "]]]").unwrap();
    assert_eq!(ConfigStore::new(&path).load(), ConfigSnapshot::default());
}

#[test]
fn partial_config_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"preset": "podcast"}"#).unwrap();
    let snapshot = ConfigStore::new(&path).load();
    assert_eq!(snapshot.preset, "podcast");
    assert_eq!(snapshot.rate, 175);
}

#[test]
fn config_save_is_a_full_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.json"));

    let first = ConfigSnapshot {
        preset: "relax".to_string(),
        voice: "Alex".to_string(),
        mode: "both".to_string(),
        rate: 155,
        volume: 0.9,
    };
    store.save(&first).unwrap();
    assert_eq!(store.load(), first);

    let second = ConfigSnapshot {
        preset: "custom".to_string(),
        voice: String::new(),
        mode: "preview".to_string(),
        rate: 240,
        volume: 0.4,
    };
    store.save(&second).unwrap();
    assert_eq!(store.load(), second);
}
