use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::WorkspaceError;
use crate::file_utils::{FileManager, SCRIPT_EXTENSIONS};
use crate::store::{ChangeEvent, ChangeKind, ScriptStore, SubscriptionId};
use crate::transcoder::{DecodeReport, Transcoder};

// @module: Workspace controller for the current dialogue

/// What the dialogue view should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Rendered markup of the stored script text
    Dialogue { markup: String },
    /// Nothing stored yet; ask the user for a script file
    FilePicker,
}

impl DisplayState {
    /// Render script text: blank text shows the file picker
    pub fn render(transcoder: &Transcoder, text: &str) -> Self {
        if text.trim().is_empty() {
            DisplayState::FilePicker
        } else {
            DisplayState::Dialogue {
                markup: transcoder.encode(text),
            }
        }
    }

    pub fn is_file_picker(&self) -> bool {
        matches!(self, DisplayState::FilePicker)
    }

    /// Markup shown, if any
    pub fn markup(&self) -> Option<&str> {
        match self {
            DisplayState::Dialogue { markup } => Some(markup),
            DisplayState::FilePicker => None,
        }
    }
}

/// Controller binding a store key to the display/edit cycle
pub struct Workspace {
    // @field: Backing store
    store: Arc<dyn ScriptStore>,

    // @field: Key holding the current script text
    key: String,

    // @field: Converter used for rendering and import/export
    transcoder: Arc<Transcoder>,
}

impl Workspace {
    /// Create a workspace over a store using the configured key and codec options
    pub fn new(store: Arc<dyn ScriptStore>, config: &Config) -> Self {
        Self {
            store,
            key: config.storage.key.clone(),
            transcoder: Arc::new(Transcoder::from_config(config)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn transcoder(&self) -> &Transcoder {
        &self.transcoder
    }

    pub fn store(&self) -> &Arc<dyn ScriptStore> {
        &self.store
    }

    /// Make sure the workspace key exists, then return what to display
    pub fn initialize(&self) -> Result<DisplayState> {
        let existing = self.store.get(&self.key).map_err(WorkspaceError::from)?;
        if existing.is_none() {
            info!("Initializing empty dialogue under '{}'", self.key);
            self.store.set(&self.key, "").map_err(WorkspaceError::from)?;
        }
        self.display_state()
    }

    /// Stored script text; empty when nothing is stored
    pub fn current_text(&self) -> Result<String> {
        let text = self.store.get(&self.key).map_err(WorkspaceError::from)?;
        Ok(text.unwrap_or_default())
    }

    pub fn display_state(&self) -> Result<DisplayState> {
        let text = self.current_text()?;
        Ok(DisplayState::render(&self.transcoder, &text))
    }

    /// Store new script text and return the refreshed display state
    pub fn commit(&self, text: &str) -> Result<DisplayState> {
        self.store.set(&self.key, text).map_err(WorkspaceError::from)?;
        debug!("Committed {} bytes of script text", text.len());
        Ok(DisplayState::render(&self.transcoder, text))
    }

    /// Load a script file into the store
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<DisplayState> {
        let path = path.as_ref();
        if !FileManager::has_extension(path, &SCRIPT_EXTENSIONS) {
            return Err(WorkspaceError::UnsupportedFile(path.to_path_buf()).into());
        }

        let text = FileManager::read_to_string(path)?;
        info!("Loaded script file {:?} ({} bytes)", path, text.len());
        self.commit(&text)
    }

    /// Write the stored script text to a file; refuses a blank dialogue
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.current_text()?;
        if text.trim().is_empty() {
            warn!("Dialogue is empty. Nothing to save.");
            return Err(WorkspaceError::EmptyDialogue.into());
        }

        FileManager::write_to_file(path, &text)
            .with_context(|| format!("Failed to save dialogue to {:?}", path))?;
        info!("Saved dialogue to {:?}", path);
        Ok(())
    }

    /// Write the stored script text rendered as markup
    pub fn export_markup<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let markup = self.transcoder.encode(&self.current_text()?);
        FileManager::write_to_file(path, &markup)
            .with_context(|| format!("Failed to export markup to {:?}", path))?;
        info!("Exported markup to {:?}", path);
        Ok(())
    }

    /// Read a markup file, decode it and store the resulting script text
    pub fn import_markup<P: AsRef<Path>>(&self, path: P) -> Result<DecodeReport> {
        let path = path.as_ref();
        let markup = FileManager::read_to_string(path)?;
        let report = self.transcoder.decode_with_report(&markup);
        if report.skipped > 0 {
            warn!(
                "Skipped {} dialogue elements without a speaker in {:?}",
                report.skipped, path
            );
        }

        self.store.set(&self.key, &report.text).map_err(WorkspaceError::from)?;
        info!("Imported {} records from {:?}", report.records, path);
        Ok(report)
    }

    /// Call `callback` with a fresh display state whenever the workspace key
    /// changes or the store is cleared
    pub fn watch<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DisplayState) + Send + Sync + 'static,
    {
        let key = self.key.clone();
        let transcoder = Arc::clone(&self.transcoder);

        self.store.subscribe(Arc::new(move |event: &ChangeEvent| {
            if !event.affects(&key) {
                return;
            }
            let text = match event.kind {
                ChangeKind::Set => event.value.as_deref().unwrap_or_default(),
                ChangeKind::Remove | ChangeKind::Clear => "",
            };
            callback(&DisplayState::render(&transcoder, text));
        }))
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
