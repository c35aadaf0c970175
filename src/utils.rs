use std::io;
use thiserror::Error;

/// Number of source characters shown around an error position
const SNIPPET_WIDTH: usize = 16;

/// Errors raised while splitting pattern text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated escape: `\\` at offset {position} has nothing to escape")]
    UnterminatedEscape { position: usize },
}

/// Errors raised while compiling a pattern
///
/// Every variant carries the byte offset in the pattern text where the
/// problem was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unbalanced braces at offset {position} near `{snippet}`")]
    UnbalancedBraces { position: usize, snippet: String },

    #[error("unknown placeholder `{name}` at offset {position}")]
    UnknownPlaceholder { name: String, position: usize },

    #[error("unknown modifier `{name}` at offset {position}")]
    UnknownModifier { name: String, position: usize },

    #[error("invalid arguments at offset {position}: {reason}")]
    InvalidArguments { reason: String, position: usize },

    #[error("invalid qualifier `{text}` at offset {position}: expected an integer from 0 to 100")]
    InvalidQualifier { text: String, position: usize },

    #[error("empty alternative at offset {position}")]
    EmptyAlternative { position: usize },

    #[error("backreference `${name}` at offset {position} does not name an earlier placeholder")]
    UndefinedBackreferenceTarget {
        name: String,
        index: usize,
        position: usize,
    },

    #[error("unterminated escape at offset {position}")]
    UnterminatedEscape { position: usize },

    #[error("unexpected `{found}` at offset {position} near `{snippet}`")]
    UnexpectedToken {
        found: String,
        position: usize,
        snippet: String,
    },
}

impl SyntaxError {
    /// Byte offset in the pattern text where the error was detected
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::UnbalancedBraces { position, .. }
            | SyntaxError::UnknownPlaceholder { position, .. }
            | SyntaxError::UnknownModifier { position, .. }
            | SyntaxError::InvalidArguments { position, .. }
            | SyntaxError::InvalidQualifier { position, .. }
            | SyntaxError::EmptyAlternative { position }
            | SyntaxError::UndefinedBackreferenceTarget { position, .. }
            | SyntaxError::UnterminatedEscape { position }
            | SyntaxError::UnexpectedToken { position, .. } => *position,
        }
    }
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::UnterminatedEscape { position } => {
                SyntaxError::UnterminatedEscape { position }
            }
        }
    }
}

/// Errors raised while generating a password from a compiled pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("unknown wordlist `{category}`")]
    UnknownWordlist { category: String },

    #[error("backreference to placeholder {index} which produced no value")]
    UndefinedBackreference { index: usize },

    #[error("modifier `{modifier}` expects digits, got `{input}`")]
    NotNumeric { modifier: String, input: String },

    #[error("number `{input}` is too large to spell out")]
    NumberTooLarge { input: String },

    #[error("cannot draw from empty range {lo}..={hi}")]
    ExhaustedRange { lo: i64, hi: i64 },
}

/// Crate-level error covering compilation, generation and loading
#[derive(Error, Debug)]
pub enum PafwertError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid pattern on line {line}: {source}")]
    InvalidPatternEntry {
        line: usize,
        #[source]
        source: SyntaxError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<LexError> for PafwertError {
    fn from(err: LexError) -> Self {
        PafwertError::Syntax(err.into())
    }
}

/// Result type for pafwert operations
pub type Result<T> = std::result::Result<T, PafwertError>;

/// Short excerpt of `source` starting at byte offset `position`
pub fn snippet(source: &str, position: usize) -> String {
    let start = position.min(source.len());
    let start = (0..=start)
        .rev()
        .find(|i| source.is_char_boundary(*i))
        .unwrap_or(0);
    source[start..].chars().take(SNIPPET_WIDTH).collect()
}
