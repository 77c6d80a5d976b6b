
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dialogue::Utterance;

// @module: Script text codec ("Speaker: utterance" blocks separated by blank lines)

// @const: One record: speaker token, colon, optional whitespace, lazy content, blank line
static RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)([\p{L}\p{Nd}_ -]+):\s*(.*?)\n\n").expect("Invalid script record regex")
});

// @const: Whole-string speaker alphabet check
static SPEAKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{Nd}_ -]+$").expect("Invalid speaker regex")
});

/// Record separator in script text
pub const RECORD_SEPARATOR: &str = "\n\n";

/// What to do with trailing text that is not followed by a blank line
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrailingRecord {
    /// Ignore it, like any other text that does not fit the record pattern
    #[default]
    Drop,
    /// Treat it as an implicitly terminated final record
    Keep,
}

/// Options for reading script text
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Handling of an unterminated final record
    #[serde(default)]
    pub trailing_record: TrailingRecord,
}

impl ScriptOptions {
    /// Options that keep an unterminated final record
    pub fn keep_trailing() -> Self {
        Self {
            trailing_record: TrailingRecord::Keep,
        }
    }
}

/// Check that a speaker name only uses the script speaker alphabet
/// (letters, digits, underscore, hyphen and space)
pub fn is_script_speaker(speaker: &str) -> bool {
    !speaker.trim().is_empty() && SPEAKER_REGEX.is_match(speaker)
}

/// Parse script text into utterance records.
///
/// The scan is global: every non-overlapping `speaker: content` block that is
/// terminated by a blank line becomes a record, in document order. Text that
/// does not fit the pattern is skipped without error.
pub fn parse_script(text: &str, options: &ScriptOptions) -> Vec<Utterance> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut normalized = text.replace("\r\n", "\n");
    if options.trailing_record == TrailingRecord::Keep && !normalized.ends_with(RECORD_SEPARATOR) {
        normalized.push_str(RECORD_SEPARATOR);
    }

    let mut records = Vec::new();
    let mut consumed = 0;

    for caps in RECORD_REGEX.captures_iter(&normalized) {
        if let Some(whole) = caps.get(0) {
            consumed = whole.end();
        }

        let speaker = caps[1].trim();
        if speaker.is_empty() {
            debug!("Skipping script block with a blank speaker");
            continue;
        }

        records.push(Utterance::new(speaker, &caps[2]));
    }

    let tail = &normalized[consumed..];
    if !tail.trim().is_empty() {
        debug!("Ignoring {} chars of unterminated trailing script text", tail.trim().chars().count());
    }

    debug!("Parsed {} script records", records.len());
    records
}

/// Serialize records as script text.
///
/// Every record is followed by a blank line, including the last one.
pub fn write_script(records: &[Utterance]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push_str(RECORD_SEPARATOR);
    }
    out
}
