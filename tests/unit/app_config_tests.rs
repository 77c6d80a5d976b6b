/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use multilogue::app_config::{Config, LogLevel, StorageBackend};
use multilogue::script::TrailingRecord;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.storage.key, "multilogue");
    assert!(config.storage.database_path.is_none());
    assert_eq!(config.script.trailing_record, TrailingRecord::Drop);
    assert_eq!(config.markup.dialogue_class, "dialogue");
    assert_eq!(config.markup.speaker_class, "speaker");
    assert_eq!(config.markup.dialogue_tag, "p");
    assert_eq!(config.markup.speaker_tag, "span");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.storage.key = "  ".to_string();
    assert!(config.validate().is_err());
    config.storage.key = "multilogue".to_string();

    config.markup.dialogue_class = "two words".to_string();
    assert!(config.validate().is_err());

    config.markup.dialogue_class = "\"><script".to_string();
    assert!(config.validate().is_err());

    config.markup.dialogue_class = "speaker".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("must differ"));

    config.markup.dialogue_class = "line-2".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_fromJson_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "storage": { "backend": "memory" }, "script": { "trailing_record": "keep" }, "log_level": "debug" }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.key, "multilogue");
    assert_eq!(config.script.trailing_record, TrailingRecord::Keep);
    assert_eq!(config.markup.dialogue_class, "dialogue");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, created);
    Ok(())
}

#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_storageBackend_fromStr_shouldParseCaseInsensitively() {
    assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
    assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
    assert!("redis".parse::<StorageBackend>().is_err());
    assert_eq!(StorageBackend::Memory.to_string(), "memory");
}

#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
