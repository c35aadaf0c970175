//! Compiled pattern representation.
//!
//! A [`Pattern`] is the immutable result of compiling one template string.
//! It is cheap to share between threads and can be evaluated any number of
//! times by the [`Generator`](crate::generator::Generator).

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::utils::SyntaxError;

/// A compiled, immutable pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    /// The text the pattern was compiled from
    source: String,
    /// Top-level nodes in textual order
    nodes: Vec<Node>,
    /// Number of binding indices handed out by the parser
    bindings: usize,
}

impl Pattern {
    pub(crate) fn new(source: &str, nodes: Vec<Node>, bindings: usize) -> Self {
        Pattern {
            source: source.to_string(),
            nodes,
            bindings,
        }
    }

    /// Compile pattern text into a reusable pattern
    pub fn compile(text: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(text)?;
        let pattern = Parser::new(text, tokens).parse()?;
        tracing::debug!(
            nodes = pattern.nodes.len(),
            bindings = pattern.bindings,
            "compiled pattern {:?}",
            text
        );
        Ok(pattern)
    }

    /// The text this pattern was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level nodes in textual order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of placeholders and groups that can be backreferenced
    pub fn binding_count(&self) -> usize {
        self.bindings
    }
}

impl FromStr for Pattern {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile pattern text into a reusable [`Pattern`]
pub fn compile(text: &str) -> Result<Pattern, SyntaxError> {
    Pattern::compile(text)
}

/// One element of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Verbatim output text, already unescaped
    Literal(String),
    /// A single generative unit
    Placeholder(Placeholder),
    /// A choice of exactly one alternative
    Selection(SelectionGroup),
    /// The value an earlier placeholder or group produced
    Backreference(Backreference),
}

impl Node {
    /// The binding index assigned to this node, if any
    pub fn binding(&self) -> Option<usize> {
        match self {
            Node::Placeholder(p) => p.binding,
            Node::Selection(g) => g.binding,
            Node::Literal(_) | Node::Backreference(_) => None,
        }
    }

    /// The inclusion qualifier attached to this node, if any
    pub fn qualifier(&self) -> Option<Qualifier> {
        match self {
            Node::Placeholder(p) => p.qualifier,
            Node::Selection(g) => g.qualifier,
            Node::Backreference(b) => b.qualifier,
            Node::Literal(_) => None,
        }
    }
}

/// A placeholder such as `{number(100,999)+num2words}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub modifiers: Vec<ModifierStep>,
    pub qualifier: Option<Qualifier>,
    pub binding: Option<usize>,
}

/// The closed set of placeholder kinds, with their arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// A word from a wordlist; `None` selects the default list
    Word { category: Option<String> },
    /// An integer drawn uniformly from `min..=max`
    Number { min: i64, max: i64 },
    Symbol,
    Letter,
    Vowel,
    Consonant,
    /// A made-up word alternating vowel and consonant sounds
    Pronounceable,
    /// A walk of `length` adjacent keys on a keyboard
    Sequence { length: usize },
    Space,
    /// Any printable keyboard character
    Keyboard,
    EndPunctuation,
    SentencePunctuation,
    Smiley,
    /// One key from a keyboard row; `full` adds the row's punctuation keys
    Row { row: KeyboardRow, full: bool },
    /// A letter typed with the left hand
    LeftHand,
    RightHand,
    /// `1st`, `22nd`, ...; `None` draws a number from 1 to 99
    Ordinal { number: Option<i64> },
    /// Spelling alphabet words for `text`, or for one random letter
    Phonetic {
        text: Option<String>,
        alphabet: PhoneticAlphabet,
    },
    /// Digits that repeat, climb or fall like a human-picked PIN
    NumberPattern { length: usize },
    /// A short digit code with separators, like `12-2` or `4.44`
    NumberCode,
    /// Decimal character code of `character`, or a random code from 32 to 255
    Asc { character: Option<char> },
    /// The printable ASCII character with this code
    Chr { code: u8 },
    LongMonth,
    ShortMonth,
    LongDay,
    ShortDay,
}

impl PlaceholderKind {
    /// The name this kind is written with in patterns
    pub fn name(&self) -> &'static str {
        match self {
            PlaceholderKind::Word { .. } => "word",
            PlaceholderKind::Number { .. } => "number",
            PlaceholderKind::Symbol => "symbol",
            PlaceholderKind::Letter => "letter",
            PlaceholderKind::Vowel => "vowel",
            PlaceholderKind::Consonant => "consonant",
            PlaceholderKind::Pronounceable => "pronounceable",
            PlaceholderKind::Sequence { .. } => "sequence",
            PlaceholderKind::Space => "space",
            PlaceholderKind::Keyboard => "keyboard",
            PlaceholderKind::EndPunctuation => "endpunctuation",
            PlaceholderKind::SentencePunctuation => "sentencepunctuation",
            PlaceholderKind::Smiley => "smiley",
            PlaceholderKind::Row { row, full } => row.name(*full),
            PlaceholderKind::LeftHand => "lefthand",
            PlaceholderKind::RightHand => "righthand",
            PlaceholderKind::Ordinal { .. } => "ordinal",
            PlaceholderKind::Phonetic { .. } => "phonetic",
            PlaceholderKind::NumberPattern { .. } => "numberpattern",
            PlaceholderKind::NumberCode => "numbercode",
            PlaceholderKind::Asc { .. } => "asc",
            PlaceholderKind::Chr { .. } => "chr",
            PlaceholderKind::LongMonth => "longmonth",
            PlaceholderKind::ShortMonth => "shortmonth",
            PlaceholderKind::LongDay => "longday",
            PlaceholderKind::ShortDay => "shortday",
        }
    }
}

/// Rows of a US keyboard, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardRow {
    Number,
    Top,
    Home,
    Bottom,
}

impl KeyboardRow {
    fn name(&self, full: bool) -> &'static str {
        match (self, full) {
            (KeyboardRow::Number, false) => "numrow",
            (KeyboardRow::Number, true) => "numrowfull",
            (KeyboardRow::Top, false) => "row1",
            (KeyboardRow::Top, true) => "row1full",
            (KeyboardRow::Home, false) => "row2",
            (KeyboardRow::Home, true) => "row2full",
            (KeyboardRow::Bottom, false) => "row3",
            (KeyboardRow::Bottom, true) => "row3full",
        }
    }
}

/// Word sets for spelling out letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneticAlphabet {
    /// Alpha, Bravo, Charlie, ...
    Nato,
    /// Adam, Baker, Charles, ...
    Radio,
}

/// A selection group such as `{word|number|symbol}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionGroup {
    /// Never empty
    pub alternatives: Vec<Node>,
    pub qualifier: Option<Qualifier>,
    pub binding: Option<usize>,
}

/// A backreference such as `{$W1}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backreference {
    /// 1-based binding index of the referenced placeholder or group
    pub index: usize,
    pub modifiers: Vec<ModifierStep>,
    pub qualifier: Option<Qualifier>,
}

/// Percentage chance that a node or modifier takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Qualifier(u8);

impl Qualifier {
    pub const MAX: u8 = 100;

    /// Build a qualifier, rejecting percentages above 100
    pub fn new(percent: u8) -> Option<Self> {
        (percent <= Self::MAX).then_some(Qualifier(percent))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Whether the node is always included, which needs no random draw
    pub fn is_certain(&self) -> bool {
        self.0 >= Self::MAX
    }

    /// Inclusion probability in `0.0..=1.0`
    pub fn probability(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Largest count, length or width a modifier argument may ask for
pub const MAX_MODIFIER_COUNT: usize = 256;

/// One `+modifier` in a chain, with its own optional qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierStep {
    pub modifier: Modifier,
    pub qualifier: Option<Qualifier>,
}

impl From<Modifier> for ModifierStep {
    fn from(modifier: Modifier) -> Self {
        ModifierStep {
            modifier,
            qualifier: None,
        }
    }
}

impl fmt::Display for ModifierStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.modifier)?;
        if let Some(qualifier) = self.qualifier {
            write!(f, "{}", qualifier)?;
        }
        Ok(())
    }
}

/// A post-processing step applied to a resolved value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Uppercase,
    Lowercase,
    /// First character upper, rest lower
    Propercase,
    /// First letter upper, everything else lower
    Sentencecase,
    /// First letter of every word upper, rest lower
    Titlecase,
    Randomcase,
    Obscure,
    Reverse,
    /// Wrap in `[` and `]`
    Bracket,
    /// Wrap in one pair drawn from the list
    BracketWith(Vec<(String, String)>),
    Piglatin,
    Scramble,
    Num2Words,
    Article,
    Quote,
    /// Output nothing; the value stays bound for backreferences
    Hide,
    Swap,
    RomanNumeral,
    Trim,
    Stutter,
    /// Apply one modifier drawn from a fixed set
    Random,
    Replace { from: String, to: String },
    /// Left-pad with zeros to `width` characters
    Format { width: usize },
    Repeat(usize),
    Left(usize),
    Right(usize),
    /// `len` characters from the 1-based `start`
    Mid { start: usize, len: usize },
}

impl Modifier {
    /// Canonical name of the modifier
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Uppercase => "uppercase",
            Modifier::Lowercase => "lowercase",
            Modifier::Propercase => "propercase",
            Modifier::Sentencecase => "sentencecase",
            Modifier::Titlecase => "titlecase",
            Modifier::Randomcase => "randomcase",
            Modifier::Obscure => "obscure",
            Modifier::Reverse => "reverse",
            Modifier::Bracket | Modifier::BracketWith(_) => "bracket",
            Modifier::Piglatin => "piglatin",
            Modifier::Scramble => "scramble",
            Modifier::Num2Words => "num2words",
            Modifier::Article => "article",
            Modifier::Quote => "quote",
            Modifier::Hide => "hide",
            Modifier::Swap => "swap",
            Modifier::RomanNumeral => "romannumeral",
            Modifier::Trim => "trim",
            Modifier::Stutter => "stutter",
            Modifier::Random => "random",
            Modifier::Replace { .. } => "replace",
            Modifier::Format { .. } => "format",
            Modifier::Repeat(_) => "repeat",
            Modifier::Left(_) => "left",
            Modifier::Right(_) => "right",
            Modifier::Mid { .. } => "mid",
        }
    }

    /// Look a modifier up by name and check its arguments
    ///
    /// Returns `None` when the name is unknown and `Some(Err(reason))` when
    /// the name is known but the arguments don't fit.
    pub fn lookup(name: &str, args: &[String]) -> Option<Result<Modifier, String>> {
        let lower = name.to_ascii_lowercase();
        let simple = match lower.as_str() {
            "uppercase" | "ucase" => Modifier::Uppercase,
            "lowercase" | "lcase" => Modifier::Lowercase,
            "propercase" => Modifier::Propercase,
            "sentencecase" => Modifier::Sentencecase,
            "titlecase" => Modifier::Titlecase,
            "randomcase" => Modifier::Randomcase,
            "obscure" => Modifier::Obscure,
            "reverse" => Modifier::Reverse,
            "piglatin" => Modifier::Piglatin,
            "scramble" => Modifier::Scramble,
            "num2words" | "num2word" => Modifier::Num2Words,
            "article" | "a" => Modifier::Article,
            "quote" => Modifier::Quote,
            "hide" => Modifier::Hide,
            "swap" => Modifier::Swap,
            "romannumeral" => Modifier::RomanNumeral,
            "trim" => Modifier::Trim,
            "stutter" => Modifier::Stutter,
            "random" => Modifier::Random,
            "bracket" | "repeat" | "left" | "right" | "mid" | "replace" | "format" => {
                return Some(Modifier::with_args(&lower, args));
            }
            _ => return None,
        };

        if args.is_empty() {
            Some(Ok(simple))
        } else {
            Some(Err(format!("{} takes no arguments", simple.name())))
        }
    }

    fn with_args(name: &str, args: &[String]) -> Result<Modifier, String> {
        match (name, args) {
            ("bracket", []) => Ok(Modifier::Bracket),
            ("bracket", [set]) => bracket_pairs(set).map(Modifier::BracketWith),
            ("repeat", []) => Ok(Modifier::Repeat(1)),
            ("repeat", [n]) => count(n).map(Modifier::Repeat),
            ("left", [n]) => count(n).map(Modifier::Left),
            ("right", [n]) => count(n).map(Modifier::Right),
            ("mid", []) => Ok(Modifier::Mid { start: 1, len: 1 }),
            ("mid", [start]) => Ok(Modifier::Mid {
                start: position(start)?,
                len: 1,
            }),
            ("mid", [start, len]) => Ok(Modifier::Mid {
                start: position(start)?,
                len: count(len)?,
            }),
            ("replace", [from]) | ("replace", [from, _]) => {
                let from = unquote(from);
                if from.is_empty() {
                    return Err("replace needs text to look for".to_string());
                }
                let to = args.get(1).map_or("", |to| unquote(to));
                Ok(Modifier::Replace {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            ("format", [mask]) => {
                if mask.is_empty() || !mask.bytes().all(|b| b == b'0') {
                    return Err(format!("format mask `{}` must be made of zeros", mask));
                }
                if mask.len() > MAX_MODIFIER_COUNT {
                    return Err(format!("format is limited to {} digits", MAX_MODIFIER_COUNT));
                }
                Ok(Modifier::Format { width: mask.len() })
            }
            ("bracket", _) => Err("bracket takes at most one list of pairs".to_string()),
            ("repeat", _) => Err("repeat takes at most one count".to_string()),
            ("mid", _) => Err("mid takes a start and a length".to_string()),
            ("replace", _) => Err("replace takes the text to find and its replacement".to_string()),
            ("format", _) => Err("format takes exactly one mask".to_string()),
            (name, _) => Err(format!("{} takes exactly one length", name)),
        }
    }

    /// Whether applying this modifier draws from the random source
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            Modifier::Randomcase
                | Modifier::Scramble
                | Modifier::Stutter
                | Modifier::Random
                | Modifier::BracketWith(_)
        )
    }
}

/// A non-negative count no larger than [`MAX_MODIFIER_COUNT`]
fn count(arg: &str) -> Result<usize, String> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("`{}` is not a non-negative integer", arg));
    }
    match arg.parse::<usize>() {
        Ok(n) if n <= MAX_MODIFIER_COUNT => Ok(n),
        _ => Err(format!("`{}` is above the limit of {}", arg, MAX_MODIFIER_COUNT)),
    }
}

/// A 1-based character position
fn position(arg: &str) -> Result<usize, String> {
    match count(arg)? {
        0 => Err("positions start at 1".to_string()),
        n => Ok(n),
    }
}

fn unquote(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(arg)
}

/// Parse `< > ( )` into open/close pairs
fn bracket_pairs(set: &str) -> Result<Vec<(String, String)>, String> {
    let marks: Vec<&str> = unquote(set).split_whitespace().collect();
    if marks.is_empty() || marks.len() % 2 != 0 {
        return Err(format!("bracket list `{}` must hold open and close pairs", set));
    }
    Ok(marks
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect())
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Repeat(n) | Modifier::Left(n) | Modifier::Right(n) => {
                write!(f, "{}({})", self.name(), n)
            }
            Modifier::Mid { start, len } => write!(f, "mid({},{})", start, len),
            Modifier::Format { width } => write!(f, "format({})", "0".repeat(*width)),
            Modifier::Replace { from, to } => write!(f, "replace({},{})", from, to),
            Modifier::BracketWith(pairs) => {
                let marks: Vec<String> = pairs
                    .iter()
                    .map(|(open, close)| format!("{} {}", open, close))
                    .collect();
                write!(f, "bracket({})", marks.join(" "))
            }
            _ => f.write_str(self.name()),
        }
    }
}
