//! Integration tests for Settings loading with layered merge semantics.
//!
//! These tests run without a global config (temp directories only), so they
//! test local config merging over compiled defaults.

use std::fs;

use tempfile::TempDir;

use markup_builder::builder::TreeBuilder;
use markup_builder::config::{DomSettings, MarkupSettings, Settings, SettingsError};
use markup_builder::content;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    // Act
    let settings = Settings::load(None).expect("load settings");

    // Assert
    assert_eq!(settings.markup, MarkupSettings::default());
    assert_eq!(settings.dom, DomSettings::default());
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_fields() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("markup-builder.toml");
    fs::write(
        &path,
        r#"
[markup]
self_close_empty = false
xml_declaration = true

[dom]
validate_names = false
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert!(!settings.markup.self_close_empty);
    assert!(settings.markup.xml_declaration);
    assert!(settings.markup.validate_names, "unspecified field keeps default");
    assert!(!settings.dom.validate_names);
    assert!(settings.dom.self_close_empty);
}

#[test]
fn given_missing_local_config_when_load_then_read_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    // Act
    let result = Settings::load(Some(&path));

    // Assert
    assert!(matches!(result, Err(SettingsError::Read { .. })));
}

#[test]
fn given_malformed_local_config_when_load_then_parse_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[markup\nself_close_empty = ").unwrap();

    // Act
    let result = Settings::load(Some(&path));

    // Assert
    match result {
        Err(SettingsError::Parse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn given_loaded_settings_when_creating_backend_then_settings_applied() {
    // Arrange
    let settings = Settings::from_toml("[markup]\nself_close_empty = false\n").unwrap();
    let builder = TreeBuilder::new(settings.markup_backend());

    // Act
    let node = builder.make("td").call(content![]).unwrap();

    // Assert
    assert_eq!(node.as_str(), "<td></td>");
}

#[test]
fn given_dom_settings_when_creating_backend_then_names_not_validated() {
    // Arrange
    let settings = Settings::from_toml("[dom]\nvalidate_names = false\n").unwrap();
    let builder = TreeBuilder::new(settings.dom_backend());

    // Act
    let result = builder.make("two words").empty();

    // Assert
    assert!(result.is_ok());
}
