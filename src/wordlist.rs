//! Wordlists backing `{word}` placeholders.
//!
//! A provider maps a lowercase category name to a non-empty list of words.
//! [`Wordlists`] holds them in memory and can load a directory of
//! `<category>.txt` files.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead};
use std::path::Path;

use crate::utils::{GenerationError, Result};

/// Category served to `{word}` placeholders without an argument
pub const DEFAULT_CATEGORY: &str = "default";

/// Short, easy to type words used when no default wordlist is loaded
const BUILTIN_WORDS: &[&str] = &[
    "able", "acid", "aunt", "back", "bake", "barn", "bean", "bell", "bird", "boat", "bone",
    "book", "cake", "calm", "card", "cave", "coal", "coin", "cord", "crow", "dart", "dawn",
    "deer", "desk", "dove", "drum", "dusk", "echo", "edge", "fern", "fish", "flag", "fork",
    "frog", "gate", "gift", "glow", "goat", "gold", "harp", "hawk", "hill", "horn", "iron",
    "jade", "kite", "lake", "lamp", "leaf", "lime", "lion", "mint", "moon", "moss", "nest",
    "oven", "palm", "pear", "pine", "rain", "reed", "rope", "ruby", "sage", "sand", "ship",
    "silk", "snow", "star", "tide", "tree", "vase", "wave", "wind", "wolf", "yarn", "zinc",
];

/// Source of words for `{word}` placeholders
///
/// `category` is `None` for the default list. Implementations return
/// [`GenerationError::UnknownWordlist`] for categories they don't have and
/// must never return an empty list.
pub trait WordlistProvider {
    fn words(&self, category: Option<&str>) -> std::result::Result<&[String], GenerationError>;
}

/// In-memory wordlists keyed by lowercase category name
#[derive(Debug, Clone)]
pub struct Wordlists {
    lists: HashMap<String, Vec<String>>,
    default_category: String,
}

impl Default for Wordlists {
    fn default() -> Self {
        Wordlists::builtin()
    }
}

impl Wordlists {
    /// Create an empty provider
    pub fn new() -> Self {
        Wordlists {
            lists: HashMap::new(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Create a provider holding only the built-in default list
    pub fn builtin() -> Self {
        let mut wordlists = Wordlists::new();
        wordlists.insert(DEFAULT_CATEGORY, BUILTIN_WORDS.iter().copied());
        wordlists
    }

    /// Serve `{word}` from another category
    pub fn with_default_category(mut self, category: &str) -> Self {
        self.default_category = category.to_ascii_lowercase();
        self
    }

    /// Load every `<category>.txt` file in a directory
    ///
    /// Files are read one word per line; blank lines and `#` comments are
    /// skipped. Empty files are ignored. The built-in list stays available as
    /// the default unless the directory has its own `default.txt`.
    pub fn from_dir<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut wordlists = Wordlists::builtin();

        let mut paths: Vec<_> = fs::read_dir(path.as_ref())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<_>>()?;
        paths.sort();

        for file in paths {
            let is_txt = file
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
            if !is_txt || !file.is_file() {
                continue;
            }
            let Some(category) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let words = read_words(&file)?;
            if !wordlists.insert(category, words) {
                tracing::warn!("skipping empty wordlist {}", file.display());
            }
        }

        tracing::debug!(
            categories = wordlists.lists.len(),
            "loaded wordlists from {}",
            path.as_ref().display()
        );
        Ok(wordlists)
    }

    /// Add or replace a category
    ///
    /// Returns `false` and leaves the provider unchanged if `words` is empty.
    pub fn insert<I, S>(&mut self, category: &str, words: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return false;
        }
        self.lists.insert(category.to_ascii_lowercase(), words);
        true
    }

    /// Whether a category is available
    pub fn contains(&self, category: &str) -> bool {
        self.lists.contains_key(&category.to_ascii_lowercase())
    }

    /// Sorted names of all available categories
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }
}

impl WordlistProvider for Wordlists {
    fn words(&self, category: Option<&str>) -> std::result::Result<&[String], GenerationError> {
        let name = match category {
            Some(category) => category.to_ascii_lowercase(),
            None => self.default_category.clone(),
        };
        self.lists
            .get(&name)
            .map(Vec::as_slice)
            .ok_or(GenerationError::UnknownWordlist { category: name })
    }
}

/// Read one word per line, skipping blank lines and `#` comments
fn read_words(path: &Path) -> Result<Vec<String>> {
    let reader = io::BufReader::new(File::open(path)?);
    let mut words = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        words.push(trimmed.to_string());
    }

    Ok(words)
}
