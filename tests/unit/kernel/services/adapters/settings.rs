use super::*;
use tempfile::tempdir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = load_settings_from(&dir.path().join("nope.json"));
    assert_eq!(settings, NotebookSettings::default());
    assert!(!settings.has_engine());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "default_nodejs_version": "18.20.0", "engine_command": ["node", "engine.js"] }"#,
    )
    .unwrap();

    let settings = load_settings_from(&path);

    assert_eq!(settings.default_nodejs_version, "18.20.0");
    assert_eq!(settings.engine_command, vec!["node", "engine.js"]);
    assert_eq!(settings.default_language, "javascript");
    assert!(settings.pretty_json);
}

#[test]
fn test_broken_file_falls_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(load_settings_from(&path), NotebookSettings::default());
}

#[test]
fn test_default_settings_written_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    write_default_settings(&path).unwrap();
    assert_eq!(load_settings_from(&path), NotebookSettings::default());

    std::fs::write(&path, r#"{ "pretty_json": false }"#).unwrap();
    write_default_settings(&path).unwrap();
    assert!(!load_settings_from(&path).pretty_json);
}
