//! Named pattern collections loaded from a patterns file.
//!
//! The file holds one pattern per line, optionally named:
//!
//! ```text
//! # comment
//! classic: {word}.{word}.{number(10,99)}
//! {pronounceable+propercase}{symbol}{number(99)}
//! ```

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::pattern::Pattern;
use crate::random::RandomSource;
use crate::utils::{PafwertError, Result};

/// Patterns used when no patterns file is given; they need only the default wordlist
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("dotted", "{word}.{word}.{word}"),
    ("shout", "{word+uppercase}{number(99)}"),
    ("proper", "{word+propercase}{symbol}{number(100,999)}"),
    ("made-up", "{pronounceable+propercase}{number(10,99)}{symbol}"),
    ("leet", "{word+obscure}{\"-\"|\".\"|\"_\"}{word+propercase}"),
    ("walk", "{sequence(4)}{word+propercase}{number(9)}"),
    ("echo", "{word}{symbol}{$W1+reverse}"),
    ("mixed", "{word+randomcase}{letter}{number(1000,9999)}"),
    ("dated", "{shortday}{ordinal}{shortmonth+uppercase[50]}{endpunctuation}"),
    ("coded", "{word+sentencecase}{numbercode}{smiley}"),
];

static NAMED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_ .-]*?)\s*:\s*(.+)$").expect("valid entry regex")
});

/// A pattern and the name it was listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub name: Option<String>,
    pub pattern: Pattern,
}

/// An ordered, non-empty set of compiled patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternLibrary {
    entries: Vec<PatternEntry>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        PatternLibrary::builtin()
    }
}

impl PatternLibrary {
    /// The built-in patterns
    pub fn builtin() -> Self {
        let entries = BUILTIN_PATTERNS
            .iter()
            .filter_map(|(name, text)| match Pattern::compile(text) {
                Ok(pattern) => Some(PatternEntry {
                    name: Some(name.to_string()),
                    pattern,
                }),
                Err(err) => {
                    tracing::error!("built-in pattern {} does not compile: {}", name, err);
                    None
                }
            })
            .collect();
        PatternLibrary { entries }
    }

    /// Load a patterns file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(PafwertError::Io)?;
        let library = PatternLibrary::from_reader(io::BufReader::new(file))?;
        tracing::debug!(
            patterns = library.len(),
            "loaded patterns from {}",
            path.as_ref().display()
        );
        Ok(library)
    }

    /// Parse patterns from any buffered reader
    ///
    /// Every entry is compiled; the first bad one fails the load with its
    /// 1-based line number.
    pub fn from_reader<B: BufRead>(reader: B) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (name, text) = match NAMED_ENTRY.captures(trimmed) {
                Some(caps) => (Some(caps[1].to_string()), caps.get(2).map_or("", |m| m.as_str())),
                None => (None, trimmed),
            };
            let pattern = Pattern::compile(text).map_err(|source| {
                PafwertError::InvalidPatternEntry {
                    line: index + 1,
                    source,
                }
            })?;
            entries.push(PatternEntry { name, pattern });
        }

        if entries.is_empty() {
            return Err(PafwertError::Config(
                "patterns file contains no patterns".to_string(),
            ));
        }
        Ok(PatternLibrary { entries })
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find a pattern by name
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
            .map(|entry| &entry.pattern)
    }

    /// Pick a pattern uniformly at random
    pub fn random<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&Pattern> {
        if self.entries.is_empty() {
            return None;
        }
        Some(&self.entries[rng.uniform_choice(self.entries.len())].pattern)
    }
}

impl FromStr for PatternLibrary {
    type Err = PafwertError;

    fn from_str(s: &str) -> Result<Self> {
        PatternLibrary::from_reader(s.as_bytes())
    }
}
