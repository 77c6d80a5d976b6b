/*!
 * Markup codec for dialogue records.
 *
 * Each record is one element carrying the dialogue class. It holds a
 * descendant carrying the speaker class whose text is the speaker name,
 * followed by `": "` and the escaped utterance:
 *
 * ```text
 * <p class="dialogue"><span class="speaker">Alice</span>: Hello there.</p>
 * ```
 *
 * Reading goes through an HTML5 parser (see [`tree`]), so character
 * references, line endings and any other structure a caller puts inside a
 * dialogue element are handled the way a browser would handle them.
 */

pub mod entities;
pub mod tree;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dialogue::Utterance;

pub use entities::{escape_attribute, escape_text};
pub use tree::{Document, Element};

/// Record separator in markup output
pub const RECORD_SEPARATOR: &str = "\n";

/// Names used when writing and selecting dialogue markup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Class identifying a dialogue element
    #[serde(default = "default_dialogue_class")]
    pub dialogue_class: String,

    /// Class identifying the speaker element inside a dialogue element
    #[serde(default = "default_speaker_class")]
    pub speaker_class: String,

    /// Tag written for dialogue elements
    #[serde(default = "default_dialogue_tag")]
    pub dialogue_tag: String,

    /// Tag written for speaker elements
    #[serde(default = "default_speaker_tag")]
    pub speaker_tag: String,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            dialogue_class: default_dialogue_class(),
            speaker_class: default_speaker_class(),
            dialogue_tag: default_dialogue_tag(),
            speaker_tag: default_speaker_tag(),
        }
    }
}

fn default_dialogue_class() -> String {
    "dialogue".to_string()
}

fn default_speaker_class() -> String {
    "speaker".to_string()
}

fn default_dialogue_tag() -> String {
    "p".to_string()
}

fn default_speaker_tag() -> String {
    "span".to_string()
}

/// Records read from markup, plus how many dialogue elements were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupParse {
    pub records: Vec<Utterance>,
    pub skipped: usize,
}

/// Serialize one record as a single markup element
pub fn write_record(record: &Utterance, options: &MarkupOptions) -> String {
    format!(
        r#"<{tag} class="{class}"><{stag} class="{sclass}">{speaker}</{stag}>: {content}</{tag}>"#,
        tag = options.dialogue_tag,
        class = escape_attribute(&options.dialogue_class),
        stag = options.speaker_tag,
        sclass = escape_attribute(&options.speaker_class),
        speaker = escape_text(&record.speaker),
        content = escape_text(&record.content),
    )
}

/// Serialize records as markup, one element per line, no trailing line break
pub fn write_markup(records: &[Utterance], options: &MarkupOptions) -> String {
    records
        .iter()
        .map(|record| write_record(record, options))
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Read dialogue records out of markup.
///
/// Dialogue elements without a speaker element (or with a blank speaker)
/// are skipped and counted, never reported as errors.
pub fn parse_markup(markup: &str, options: &MarkupOptions) -> MarkupParse {
    let mut parsed = MarkupParse::default();
    if markup.trim().is_empty() {
        return parsed;
    }

    let document = Document::parse(markup);

    for node in document.elements_with_class(&options.dialogue_class) {
        let Some(speaker_element) = node.find_class(&options.speaker_class) else {
            debug!("Skipping <{}> dialogue element without a speaker", node.name());
            parsed.skipped += 1;
            continue;
        };

        let raw_speaker = speaker_element.text_content();
        let speaker = raw_speaker.trim();
        if speaker.is_empty() {
            debug!("Skipping <{}> dialogue element with a blank speaker", node.name());
            parsed.skipped += 1;
            continue;
        }

        let text = node.text_content().replacen(&raw_speaker, "", 1);
        parsed.records.push(Utterance::new(speaker, strip_label_separator(&text)));
    }

    debug!(
        "Parsed {} markup records ({} skipped)",
        parsed.records.len(),
        parsed.skipped
    );
    parsed
}

/// Drop one leading `:` (and the whitespace after it) left over once the
/// speaker name is removed from the element text
fn strip_label_separator(text: &str) -> &str {
    let text = text.trim_start();
    text.strip_prefix(':').unwrap_or(text).trim()
}
