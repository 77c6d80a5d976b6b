/*!
 * Tests for the workspace display/edit cycle
 */

use std::sync::Arc;
use anyhow::Result;
use parking_lot::Mutex;
use multilogue::errors::WorkspaceError;
use multilogue::store::{ScriptStore, SqliteStore};
use multilogue::{Config, DisplayState, Workspace};
use crate::common;

#[test]
fn test_initialize_withEmptyStore_shouldCreateKeyAndShowPicker() -> Result<()> {
    let (store, workspace) = common::memory_workspace();

    let state = workspace.initialize()?;

    assert_eq!(state, DisplayState::FilePicker);
    assert_eq!(store.get("multilogue")?, Some(String::new()));
    Ok(())
}

#[test]
fn test_initialize_withStoredText_shouldKeepItAndRender() -> Result<()> {
    let (store, workspace) = common::memory_workspace();
    store.set("multilogue", common::SAMPLE_SCRIPT)?;

    let state = workspace.initialize()?;

    assert_eq!(state.markup(), Some(common::SAMPLE_MARKUP));
    assert_eq!(workspace.current_text()?, common::SAMPLE_SCRIPT);
    Ok(())
}

#[test]
fn test_commit_withWhitespaceOnly_shouldShowPicker() -> Result<()> {
    let (_store, workspace) = common::memory_workspace();

    assert!(workspace.commit("  \n  ")?.is_file_picker());
    assert!(!workspace.commit(common::SAMPLE_SCRIPT)?.is_file_picker());
    Ok(())
}

#[test]
fn test_loadFile_withScriptExtension_shouldStoreContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_script(temp_dir.path(), "act1.plato")?;
    let (store, workspace) = common::memory_workspace();

    let state = workspace.load_file(&path)?;

    assert_eq!(state.markup(), Some(common::SAMPLE_MARKUP));
    assert_eq!(store.get("multilogue")?.as_deref(), Some(common::SAMPLE_SCRIPT));
    Ok(())
}

#[test]
fn test_loadFile_withOtherExtension_shouldRefuse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "act1.pdf", common::SAMPLE_SCRIPT)?;
    let (store, workspace) = common::memory_workspace();

    let err = workspace.load_file(&path).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::UnsupportedFile(_))
    ));
    assert_eq!(store.get("multilogue")?, None);
    Ok(())
}

#[test]
fn test_saveToFile_withEmptyDialogue_shouldRefuse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.txt");
    let (_store, workspace) = common::memory_workspace();
    workspace.initialize()?;

    let err = workspace.save_to_file(&target).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::EmptyDialogue)
    ));
    assert!(!target.exists());
    Ok(())
}

#[test]
fn test_saveToFile_withDialogue_shouldWriteScriptText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.txt");
    let (_store, workspace) = common::memory_workspace();
    workspace.commit(common::SAMPLE_SCRIPT)?;

    workspace.save_to_file(&target)?;

    assert_eq!(std::fs::read_to_string(&target)?, common::SAMPLE_SCRIPT);
    Ok(())
}

#[test]
fn test_exportThenImport_shouldRestoreDialogue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let markup_path = temp_dir.path().join("dialogue.html");
    let (store, workspace) = common::memory_workspace();
    workspace.commit(common::SAMPLE_SCRIPT)?;

    workspace.export_markup(&markup_path)?;
    store.clear()?;
    let report = workspace.import_markup(&markup_path)?;

    assert_eq!(report.records, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(workspace.current_text()?, common::SAMPLE_SCRIPT);
    Ok(())
}

#[test]
fn test_watch_shouldRerenderOnKeyChangesOnly() -> Result<()> {
    let (store, workspace) = common::memory_workspace();
    let states: Arc<Mutex<Vec<DisplayState>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    let id = workspace.watch(move |state: &DisplayState| sink.lock().push(state.clone()));

    workspace.commit(common::SAMPLE_SCRIPT)?;
    store.set("unrelated", "Zed: ignored\n\n")?;
    store.remove("multilogue")?;
    store.set("multilogue", "Ann: back\n\n")?;
    store.clear()?;

    assert!(workspace.unwatch(id));
    workspace.commit(common::SAMPLE_SCRIPT)?;

    let states = states.lock();
    assert_eq!(states.len(), 4);
    assert_eq!(states[0].markup(), Some(common::SAMPLE_MARKUP));
    assert!(states[1].is_file_picker());
    assert!(states[2].markup().unwrap().contains(">Ann</span>: back"));
    assert!(states[3].is_file_picker());
    Ok(())
}

#[test]
fn test_workspace_withSqliteStoreAndCustomKey_shouldPersistAcrossInstances() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("multilogue.db");
    let mut config = Config::default();
    config.storage.key = "scene-2".to_string();

    {
        let store: Arc<dyn ScriptStore> = Arc::new(SqliteStore::open(&db_path)?);
        let workspace = Workspace::new(store, &config);
        assert_eq!(workspace.key(), "scene-2");
        workspace.commit(common::SAMPLE_SCRIPT)?;
    }

    let store: Arc<dyn ScriptStore> = Arc::new(SqliteStore::open(&db_path)?);
    let workspace = Workspace::new(store, &config);

    assert_eq!(workspace.display_state()?.markup(), Some(common::SAMPLE_MARKUP));
    assert_eq!(workspace.store().keys()?, vec!["scene-2"]);
    Ok(())
}
