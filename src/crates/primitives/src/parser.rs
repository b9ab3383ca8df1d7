//! Tolerant recovery of JSON values from LLM output
//!
//! Models wrap structured answers in markdown fences, prepend a sentence of
//! prose, or trail off with commentary. [`ResponseParser`] strips the noise
//! and finds the first balanced JSON object or array.
//!
//! Parsing never fails from the caller's point of view: unusable input comes
//! back as the sentinel object `{"_parse_error": "<message>"}`, which
//! [`is_parse_failure`] recognizes. Use [`ResponseParser::try_parse_str`]
//! when a typed error is preferable.

use serde_json::{Map, Value};
use thiserror::Error;
use tooling::logging::{sanitize_for_logging, truncate_for_log};
use tracing::{debug, warn};

/// Key of the single-field object returned when parsing fails.
pub const PARSE_FAILURE_KEY: &str = "_parse_error";

const FENCE: &str = "```";
const LOGGED_INPUT_BYTES: usize = 500;

/// Why a response could not be turned into JSON
#[derive(Debug, Error)]
pub enum ParseError {
    /// Nothing left after stripping fences and whitespace
    #[error("Empty response")]
    Empty,

    /// Candidate text is not valid JSON
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Extracts JSON values from raw model responses
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    verbose: bool,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log failed input at warn level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Parse a response that may already be structured.
    ///
    /// Strings go through [`parse_str`](Self::parse_str); every other value
    /// is returned unchanged.
    pub fn parse(&self, response: &Value) -> Value {
        match response {
            Value::String(text) => self.parse_str(text),
            other => other.clone(),
        }
    }

    /// Parse a raw text response, returning the failure sentinel on error.
    pub fn parse_str(&self, response: &str) -> Value {
        match self.try_parse_str(response) {
            Ok(value) => value,
            Err(err) => {
                if self.verbose {
                    warn!(
                        error = %err,
                        input = %truncate_for_log(&sanitize_for_logging(response), LOGGED_INPUT_BYTES),
                        "Failed to parse LLM response"
                    );
                } else {
                    debug!(error = %err, "Failed to parse LLM response");
                }
                parse_failure(err.to_string())
            }
        }
    }

    /// Parse a raw text response.
    ///
    /// 1. Remove every code fence marker and its language tag, then trim.
    /// 2. If the text both starts and ends with matching brackets, parse it whole.
    /// 3. Otherwise locate the first `{` or `[` (whichever comes first) and
    ///    scan to its balancing closer, counting only that bracket kind.
    /// 4. With no closer, parse the whole text; with no bracket at all, parse
    ///    it as a scalar (`42`, `true`, `"quoted"`).
    ///
    /// The depth scan does not track string literals, so a bracket of the
    /// same kind inside a string can shift the candidate boundary.
    pub fn try_parse_str(&self, response: &str) -> Result<Value, ParseError> {
        let stripped = strip_code_fences(response);
        let cleaned = stripped.trim();

        if cleaned.is_empty() {
            return Err(ParseError::Empty);
        }

        let whole = (cleaned.starts_with('{') && cleaned.ends_with('}'))
            || (cleaned.starts_with('[') && cleaned.ends_with(']'));
        if whole {
            return Ok(serde_json::from_str(cleaned)?);
        }

        let candidate = match first_open_bracket(cleaned) {
            Some((start, open, close)) => match matching_close(cleaned, start, open, close) {
                Some(end) => &cleaned[start..=end],
                None => cleaned,
            },
            None => cleaned,
        };

        Ok(serde_json::from_str(candidate)?)
    }
}

/// Whether a parsed value is the parse-failure sentinel.
pub fn is_parse_failure(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.len() == 1 && map.contains_key(PARSE_FAILURE_KEY))
}

fn parse_failure(message: String) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(PARSE_FAILURE_KEY.to_string(), Value::String(message));
    Value::Object(map)
}

/// Remove all fence markers along with a language tag that opens a block.
///
/// A run of tag characters only counts as a tag when a line break or the
/// end of input follows it, so a fenced scalar such as `` ```42``` `` keeps
/// its value.
fn strip_code_fences(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(FENCE) {
        output.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
            .unwrap_or(rest.len());
        let after_tag = &rest[tag_len..];
        if after_tag.is_empty() || after_tag.starts_with('\n') || after_tag.starts_with("\r\n") {
            rest = after_tag;
        }
    }
    output.push_str(rest);

    output
}

fn first_open_bracket(text: &str) -> Option<(usize, u8, u8)> {
    match (text.find('{'), text.find('[')) {
        (Some(brace), Some(bracket)) if brace < bracket => Some((brace, b'{', b'}')),
        (_, Some(bracket)) => Some((bracket, b'[', b']')),
        (Some(brace), None) => Some((brace, b'{', b'}')),
        (None, None) => None,
    }
}

fn matching_close(text: &str, start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(start + offset);
            }
        }
    }
    None
}
