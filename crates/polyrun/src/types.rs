use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the engine knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Python,
    C,
    Cpp,
    Java,
}

impl SupportedLanguage {
    /// Every supported language, in display order
    pub const ALL: [SupportedLanguage; 4] = [
        SupportedLanguage::Python,
        SupportedLanguage::C,
        SupportedLanguage::Cpp,
        SupportedLanguage::Java,
    ];

    /// Lowercase identifier used on the wire (e.g. "cpp")
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::C => "c",
            SupportedLanguage::Cpp => "cpp",
            SupportedLanguage::Java => "java",
        }
    }

    /// File extension, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => ".py",
            SupportedLanguage::C => ".c",
            SupportedLanguage::Cpp => ".cpp",
            SupportedLanguage::Java => ".java",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request names its language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTarget {
    /// A file name whose extension implies the language
    Filename(String),

    /// An explicit language tag such as "python"
    Tag(String),
}

/// A single piece of code to compile and run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Source code, passed through verbatim
    pub code: String,

    /// Language identification
    pub target: LanguageTarget,
}

impl ExecutionRequest {
    pub fn from_filename(code: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: LanguageTarget::Filename(filename.into()),
        }
    }

    pub fn from_language(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: LanguageTarget::Tag(language.into()),
        }
    }
}

/// Outcome of a language runner, before the language is stamped on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Captured standard output
    pub output: String,

    /// Captured standard error, or a fixed diagnostic message
    pub error: String,

    /// True only if the run step exited with status 0 within the timeout
    pub success: bool,

    /// Coarse timing: 0 on completion, the timeout on expiry
    pub execution_time: u64,
}

impl RunOutput {
    /// In-band failure with no output and a zero execution time
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: error.into(),
            success: false,
            execution_time: 0,
        }
    }

    /// Attach the resolved language to produce the final result
    pub fn into_result(self, language: SupportedLanguage) -> ExecutionResult {
        ExecutionResult {
            language,
            output: self.output,
            error: self.error,
            execution_time: self.execution_time,
            success: self.success,
        }
    }
}

/// Result of an execution request
///
/// All five fields are always serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub language: SupportedLanguage,
    pub output: String,
    pub error: String,
    pub execution_time: u64,
    pub success: bool,
}

impl ExecutionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}
