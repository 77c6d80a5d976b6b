use std::fmt;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::markup::{self, MarkupOptions, MarkupParse};
use crate::script::{self, ScriptOptions};

// @module: Dialogue records shared by the script and markup codecs

// @struct: One speaker + utterance pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    // @field: Trimmed speaker name
    pub speaker: String,

    // @field: Trimmed utterance text, may be empty
    pub content: String,
}

impl Utterance {
    /// Create a record, trimming both fields
    pub fn new(speaker: impl AsRef<str>, content: impl AsRef<str>) -> Self {
        Utterance {
            speaker: speaker.as_ref().trim().to_string(),
            content: content.as_ref().trim().to_string(),
        }
    }

    // @creates: Record whose speaker fits the script speaker alphabet
    pub fn new_validated(speaker: impl AsRef<str>, content: impl AsRef<str>) -> Result<Self> {
        let record = Self::new(speaker, content);

        if record.speaker.is_empty() {
            return Err(anyhow!("Empty speaker for utterance: {:?}", record.content));
        }
        if !record.is_well_formed() {
            return Err(anyhow!(
                "Invalid speaker {:?}: only letters, digits, '_', '-' and spaces are allowed",
                record.speaker
            ));
        }

        Ok(record)
    }

    /// Whether this record can be written as script text and read back unchanged
    pub fn is_well_formed(&self) -> bool {
        script::is_script_speaker(&self.speaker)
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.content)
    }
}

/// Ordered collection of utterances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Records in document order
    pub entries: Vec<Utterance>,
}

/// Summary counts for a dialogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogueStats {
    pub records: usize,
    pub unique_speakers: usize,
    pub empty_utterances: usize,
    pub characters: usize,
}

impl Dialogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Utterance>) -> Self {
        Dialogue { entries }
    }

    /// Read script text
    pub fn from_script(text: &str, options: &ScriptOptions) -> Self {
        Self::from_entries(script::parse_script(text, options))
    }

    /// Read markup; skipped elements are dropped silently
    pub fn from_markup(markup: &str, options: &MarkupOptions) -> Self {
        let MarkupParse { records, .. } = markup::parse_markup(markup, options);
        Self::from_entries(records)
    }

    pub fn to_script(&self) -> String {
        script::write_script(&self.entries)
    }

    pub fn to_markup(&self, options: &MarkupOptions) -> String {
        markup::write_markup(&self.entries, options)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct speakers in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.speaker.as_str()) {
                seen.push(&entry.speaker);
            }
        }
        seen
    }

    pub fn stats(&self) -> DialogueStats {
        DialogueStats {
            records: self.entries.len(),
            unique_speakers: self.speakers().len(),
            empty_utterances: self.entries.iter().filter(|e| e.content.is_empty()).count(),
            characters: self.entries.iter().map(|e| e.content.chars().count()).sum(),
        }
    }
}

impl fmt::Display for DialogueStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Records: {}", self.records)?;
        writeln!(f, "Speakers: {}", self.unique_speakers)?;
        writeln!(f, "Empty utterances: {}", self.empty_utterances)?;
        write!(f, "Characters: {}", self.characters)
    }
}
