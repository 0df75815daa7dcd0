use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::SupportedLanguage;

/// One toolchain per supported language.
///
/// The set is closed: unknown language tables are rejected at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Languages {
    pub python: Toolchain,
    pub c: Toolchain,
    pub cpp: Toolchain,
    pub java: Toolchain,
}

impl Languages {
    /// Toolchain for the given language
    pub fn get(&self, language: SupportedLanguage) -> &Toolchain {
        match language {
            SupportedLanguage::Python => &self.python,
            SupportedLanguage::C => &self.c,
            SupportedLanguage::Cpp => &self.cpp,
            SupportedLanguage::Java => &self.java,
        }
    }

    /// Iterate over every language with its toolchain
    pub fn iter(&self) -> impl Iterator<Item = (SupportedLanguage, &Toolchain)> {
        SupportedLanguage::ALL
            .into_iter()
            .map(move |lang| (lang, self.get(lang)))
    }
}

/// How to build and run programs of one language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toolchain {
    /// Source file name inside the workspace (may use `{class}`)
    pub source_name: String,

    /// Compilation configuration (None for interpreted languages)
    #[serde(default)]
    pub compile: Option<CompileConfig>,

    /// Execution configuration
    pub run: RunConfig,
}

impl Toolchain {
    /// Check if the language is compiled
    pub fn is_compiled(&self) -> bool {
        self.compile.is_some()
    }
}

/// Configuration for the compilation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Command and arguments with placeholders
    pub command: Vec<String>,

    /// Build artifact name inside the workspace (e.g., "program")
    pub output_name: String,

    /// Environment variables to set during compilation
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Configuration for the execution step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Command and arguments with placeholders
    pub command: Vec<String>,

    /// Environment variables to set
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Values substituted into toolchain commands and file names
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    /// Absolute path of the source file
    pub source: &'a Path,

    /// Absolute path of the build artifact
    pub output: &'a Path,

    /// Workspace directory
    pub workspace: &'a Path,

    /// Java entry class, empty for other languages
    pub class: &'a str,
}

impl Placeholders<'_> {
    /// Expand placeholders in a single argument or file name
    pub fn expand(&self, template: &str) -> String {
        let output = self.output.to_string_lossy();
        template
            .replace("{source}", &self.source.to_string_lossy())
            .replace("{output}", &output)
            .replace("{binary}", &output)
            .replace("{workspace}", &self.workspace.to_string_lossy())
            .replace("{class}", self.class)
    }

    /// Expand placeholders in the given command
    pub fn expand_command(&self, command: &[String]) -> Vec<String> {
        command.iter().map(|arg| self.expand(arg)).collect()
    }
}

/// Substitute the Java entry class into a file name template
pub fn expand_file_name(template: &str, class: &str) -> String {
    template.replace("{class}", class)
}
