/*!
 * Script text <-> markup transcoding.
 *
 * Both directions go through the record model in [`crate::dialogue`]:
 * script text is scanned into records and written as markup, markup is
 * parsed into records and written as script text.
 *
 * The `&str` entry points cannot receive non-text input; callers holding
 * dynamically typed values (JSON, raw bytes) go through the `*_value` and
 * `*_bytes` variants, which enforce the text contract with
 * [`InvalidInputError`].
 */

use log::debug;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::app_config::Config;
use crate::errors::InvalidInputError;
use crate::markup::{self, MarkupOptions};
use crate::script::{self, ScriptOptions};

static DEFAULT_TRANSCODER: Lazy<Transcoder> = Lazy::new(Transcoder::default);

/// Convert script text to markup with default options
pub fn encode(text: &str) -> String {
    DEFAULT_TRANSCODER.encode(text)
}

/// Convert markup to script text with default options
pub fn decode(markup: &str) -> String {
    DEFAULT_TRANSCODER.decode(markup)
}

/// Result of a decode together with record counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Script text, same as [`Transcoder::decode`]
    pub text: String,
    /// Dialogue elements that became records
    pub records: usize,
    /// Dialogue elements dropped for lack of a speaker
    pub skipped: usize,
}

/// Stateless converter between the two dialogue representations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcoder {
    script: ScriptOptions,
    markup: MarkupOptions,
}

impl Transcoder {
    pub fn new(script: ScriptOptions, markup: MarkupOptions) -> Self {
        Self { script, markup }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.script.clone(), config.markup.clone())
    }

    pub fn script_options(&self) -> &ScriptOptions {
        &self.script
    }

    pub fn markup_options(&self) -> &MarkupOptions {
        &self.markup
    }

    /// Script text to markup: one element per record, newline separated,
    /// no trailing line break. Blank input gives an empty string.
    pub fn encode(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let records = script::parse_script(text, &self.script);
        markup::write_markup(&records, &self.markup)
    }

    /// Markup to script text: `"speaker: utterance\n\n"` per record, the
    /// trailing blank line included. Blank input gives an empty string.
    pub fn decode(&self, markup: &str) -> String {
        self.decode_with_report(markup).text
    }

    /// Like [`Transcoder::decode`], also reporting how many dialogue
    /// elements were converted and how many were skipped
    pub fn decode_with_report(&self, markup: &str) -> DecodeReport {
        if markup.trim().is_empty() {
            return DecodeReport::default();
        }
        let parsed = markup::parse_markup(markup, &self.markup);
        DecodeReport {
            text: script::write_script(&parsed.records),
            records: parsed.records.len(),
            skipped: parsed.skipped,
        }
    }

    /// Encode a dynamically typed value; only JSON strings are accepted
    pub fn encode_value(&self, value: &Value) -> Result<String, InvalidInputError> {
        text_of("encode", value).map(|text| self.encode(text))
    }

    /// Decode a dynamically typed value; only JSON strings are accepted
    pub fn decode_value(&self, value: &Value) -> Result<String, InvalidInputError> {
        text_of("decode", value).map(|markup| self.decode(markup))
    }

    /// Encode raw bytes, which must be UTF-8
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<String, InvalidInputError> {
        utf8_of("encode", bytes).map(|text| self.encode(text))
    }

    /// Decode raw bytes, which must be UTF-8
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<String, InvalidInputError> {
        self.decode_bytes_with_report(bytes).map(|report| report.text)
    }

    pub fn decode_bytes_with_report(&self, bytes: &[u8]) -> Result<DecodeReport, InvalidInputError> {
        utf8_of("decode", bytes).map(|markup| self.decode_with_report(markup))
    }
}

fn text_of<'a>(operation: &'static str, value: &'a Value) -> Result<&'a str, InvalidInputError> {
    let found = match value {
        Value::String(text) => return Ok(text),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    debug!("Rejecting {} input for {}", found, operation);
    Err(InvalidInputError::new(operation, found))
}

fn utf8_of<'a>(operation: &'static str, bytes: &'a [u8]) -> Result<&'a str, InvalidInputError> {
    std::str::from_utf8(bytes).map_err(|e| {
        InvalidInputError::new(
            operation,
            format!("non-UTF-8 bytes (invalid sequence at byte {})", e.valid_up_to()),
        )
    })
}
