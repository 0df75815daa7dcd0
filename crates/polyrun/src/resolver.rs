//! Language resolution
//!
//! Maps a file name extension or an explicit language tag onto a
//! [`SupportedLanguage`]. Resolution is pure and never touches the filesystem.

use thiserror::Error;

use crate::types::{LanguageTarget, SupportedLanguage};

/// Errors produced when a request names a language the engine cannot run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl ResolveError {
    /// The extension or tag that was rejected
    pub fn offending_value(&self) -> &str {
        match self {
            ResolveError::UnsupportedExtension(v) | ResolveError::UnsupportedLanguage(v) => v,
        }
    }
}

/// Resolve either form of language identification
pub fn resolve(target: &LanguageTarget) -> Result<SupportedLanguage, ResolveError> {
    match target {
        LanguageTarget::Filename(name) => resolve_filename(name),
        LanguageTarget::Tag(tag) => resolve_tag(tag),
    }
}

/// Resolve a language from a file name, ignoring case
pub fn resolve_filename(filename: &str) -> Result<SupportedLanguage, ResolveError> {
    let lowered = filename.to_lowercase();
    let ext = extension(&lowered);
    SupportedLanguage::ALL
        .into_iter()
        .find(|lang| lang.extension() == ext)
        .ok_or_else(|| ResolveError::UnsupportedExtension(ext.to_owned()))
}

/// Resolve a language from an explicit tag, ignoring case
pub fn resolve_tag(tag: &str) -> Result<SupportedLanguage, ResolveError> {
    let lowered = tag.to_lowercase();
    SupportedLanguage::ALL
        .into_iter()
        .find(|lang| lang.as_str() == lowered)
        .ok_or_else(|| ResolveError::UnsupportedLanguage(tag.to_owned()))
}

/// Extension of the final path component, including the dot.
///
/// Leading dots of the base name do not start an extension, so ".py" and
/// "..py" have none while "a.tar.py" has ".py".
fn extension(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &base[dot..],
        _ => "",
    }
}
