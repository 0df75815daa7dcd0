//! Request body parsing
//!
//! Bodies are parsed as JSON first. Front ends sometimes post code with
//! unescaped quotes or raw newlines inside the `code` string, which is not
//! valid JSON; for those a tolerant scanner recovers the fields instead.

use std::sync::LazyLock;

use polyrun::ExecutionRequest;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static CODE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""code"\s*:\s*""#).expect("valid regex"));
static FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""filename"\s*:\s*"([^"]*)""#).expect("valid regex"));
static LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""language"\s*:\s*"([^"]*)""#).expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Invalid request format")]
    InvalidFormat,

    #[error("Invalid request: {0}")]
    Schema(String),

    #[error("Invalid request: either 'filename' or 'language' is required")]
    MissingLanguage,
}

/// Wire shape of `POST /execute`
#[derive(Debug, Deserialize)]
struct RawRequest {
    code: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

impl RawRequest {
    fn into_request(self) -> Result<ExecutionRequest, RequestError> {
        match (self.filename, self.language) {
            (Some(filename), _) => Ok(ExecutionRequest::from_filename(self.code, filename)),
            (None, Some(language)) => Ok(ExecutionRequest::from_language(self.code, language)),
            (None, None) => Err(RequestError::MissingLanguage),
        }
    }
}

/// Parse a request body into an [`ExecutionRequest`]
pub fn parse_request(body: &str) -> Result<ExecutionRequest, RequestError> {
    match serde_json::from_str::<RawRequest>(body) {
        Ok(raw) => raw.into_request(),
        Err(e) if e.is_syntax() || e.is_eof() => {
            salvage(body).ok_or(RequestError::InvalidFormat)?.into_request()
        }
        Err(e) => Err(RequestError::Schema(e.to_string())),
    }
}

/// Recover fields from a body that is almost JSON
fn salvage(body: &str) -> Option<RawRequest> {
    let start = CODE_START.find(body)?.end();
    let rest = &body[start..];
    let raw_code = scan_string(rest, true).or_else(|| scan_string(rest, false))?;

    let filename = capture(&FILENAME, body);
    let language = capture(&LANGUAGE, body);
    if filename.is_none() && language.is_none() {
        return None;
    }

    Some(RawRequest {
        code: raw_code.replace("\\\"", "\""),
        filename,
        language,
    })
}

fn capture(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Contents of a string value up to its closing quote
///
/// The closing quote is the first `"` followed (after optional whitespace)
/// by `,` or `}`. With `skip_escaped`, a `\"` pair never closes the string.
fn scan_string(rest: &str, skip_escaped: bool) -> Option<&str> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if skip_escaped && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' if closes_value(&rest[i + 1..]) => return Some(&rest[..i]),
            _ => i += 1,
        }
    }
    None
}

fn closes_value(after: &str) -> bool {
    matches!(after.trim_start().chars().next(), Some(',' | '}'))
}
