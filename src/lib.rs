//! Pafwert is a pattern-based generator for strong, memorable passwords.
//!
//! A pattern is a short template describing the shape of a password, such as
//! `{word+propercase}{symbol}{number(100,999)}`. Patterns are compiled once
//! into an immutable [`Pattern`] and then evaluated any number of times
//! against a [`WordlistProvider`] and a [`RandomSource`].
//!
//! # Example
//!
//! ```rust
//! use pafwert::{compile, generate, RngSource, Wordlists};
//!
//! let pattern = compile("{word+uppercase}-{number(10,99)}-{$W1+reverse}").unwrap();
//! let mut words = Wordlists::new();
//! words.insert("default", ["kite"]);
//!
//! let password = generate(&pattern, &words, &mut RngSource::seeded(7)).unwrap();
//! assert!(password.starts_with("KITE-"));
//! assert!(password.ends_with("-ETIK"));
//! ```

pub mod generator;
pub mod lexer;
pub mod library;
pub mod modifiers;
pub mod parser;
pub mod pattern;
pub mod placeholders;
pub mod random;
pub mod utils;
pub mod wordlist;

pub use generator::{Generator, GeneratorConfig, generate};
pub use library::{PatternEntry, PatternLibrary};
pub use pattern::{
    Backreference, KeyboardRow, Modifier, ModifierStep, Node, Pattern, PhoneticAlphabet,
    Placeholder, PlaceholderKind, Qualifier, SelectionGroup, compile,
};
pub use random::{RandomSource, RngSource};
pub use utils::{GenerationError, LexError, PafwertError, Result, SyntaxError};
pub use wordlist::{WordlistProvider, Wordlists};
