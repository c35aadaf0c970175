//! Recursive-descent parser turning tokens into a [`Pattern`].
//!
//! Grammar:
//!
//! ```text
//! pattern   = ( literal | group ) *
//! group     = '{' alt ( '|' alt ) * '}' qualifier ?
//! alt       = ( IDENT args ? | '$' BACKREF ) qualifier ? modifier * | QUOTED
//! args      = '(' ( ARG ( ',' ARG ) * ) ? ')'
//! modifier  = '+' IDENT args ? qualifier ?
//! qualifier = '[' INT ']'
//! ```
//!
//! A qualifier right after a modifier belongs to that modifier. A node's own
//! qualifier goes after its name or after the closing brace. Quoted
//! alternatives are plain text and take neither.
//!
//! Outside braces every token except `{` and `}` is plain text.

use regex::Regex;
use std::sync::LazyLock;

use crate::lexer::{Token, TokenKind};
use crate::pattern::{
    Backreference, KeyboardRow, Modifier, ModifierStep, Node, Pattern, PhoneticAlphabet,
    Placeholder, PlaceholderKind, Qualifier, SelectionGroup,
};
use crate::utils::{SyntaxError, snippet};

/// Longest keyboard walk or digit pattern a placeholder may ask for
pub const MAX_SEQUENCE_LENGTH: usize = 256;

static BACKREF_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]*([0-9]+)$").expect("valid backreference regex"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").expect("valid identifier regex"));

/// Parser over the tokens of a single pattern
pub struct Parser<'a> {
    /// Pattern text, used for error snippets
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Binding indices handed out so far
    bindings: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            bindings: 0,
        }
    }

    /// Parse the whole token stream
    pub fn parse(mut self) -> Result<Pattern, SyntaxError> {
        let mut nodes = Vec::new();
        let mut literal = String::new();

        while let Some(token) = self.next() {
            match token.kind {
                TokenKind::OpenBrace => {
                    if !literal.is_empty() {
                        nodes.push(Node::Literal(std::mem::take(&mut literal)));
                    }
                    let node = self.parse_group(token.position)?;
                    nodes.push(node);
                }
                TokenKind::CloseBrace => return Err(self.unbalanced(token.position)),
                other => literal.push_str(&other.literal()),
            }
        }

        if !literal.is_empty() {
            nodes.push(Node::Literal(literal));
        }

        Ok(Pattern::new(self.source, nodes, self.bindings))
    }

    /// Parse a group after its opening brace
    fn parse_group(&mut self, open: usize) -> Result<Node, SyntaxError> {
        let mut alternatives = Vec::new();

        loop {
            alternatives.push(self.parse_alternative(open)?);
            self.skip_blank();
            match self.next() {
                Some(Token {
                    kind: TokenKind::Pipe,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::CloseBrace,
                    ..
                }) => break,
                Some(token) => return Err(self.unexpected(&token)),
                None => return Err(self.unbalanced(open)),
            }
        }

        let outer = match self.peek_kind() {
            Some(TokenKind::OpenBracket) => Some(self.parse_qualifier()?),
            _ => None,
        };

        if alternatives.len() > 1 {
            self.bindings += 1;
            return Ok(Node::Selection(SelectionGroup {
                alternatives,
                qualifier: outer.map(|(q, _)| q),
                binding: Some(self.bindings),
            }));
        }

        let mut node = alternatives.remove(0);
        if let Node::Literal(text) = &node {
            return Err(SyntaxError::UnknownPlaceholder {
                name: format!("\"{}\"", text),
                position: open + 1,
            });
        }
        if let Some((qualifier, position)) = outer {
            let slot = match &mut node {
                Node::Placeholder(p) => &mut p.qualifier,
                Node::Backreference(b) => &mut b.qualifier,
                Node::Selection(g) => &mut g.qualifier,
                Node::Literal(_) => unreachable!("lone quoted literals are rejected"),
            };
            if slot.is_some() {
                return Err(SyntaxError::InvalidQualifier {
                    text: "duplicate qualifier".to_string(),
                    position,
                });
            }
            *slot = Some(qualifier);
        }

        if let Node::Placeholder(p) = &mut node {
            self.bindings += 1;
            p.binding = Some(self.bindings);
        }
        Ok(node)
    }

    /// Parse one `|`-separated alternative inside a group
    fn parse_alternative(&mut self, open: usize) -> Result<Node, SyntaxError> {
        self.skip_blank();
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.unbalanced(open)),
        };

        match token.kind {
            TokenKind::Pipe | TokenKind::CloseBrace => Err(SyntaxError::EmptyAlternative {
                position: token.position,
            }),
            TokenKind::Dollar => {
                self.pos += 1;
                self.parse_backreference(token.position)
            }
            TokenKind::Text(text) => {
                self.pos += 1;
                let trimmed = text.trim_start();
                if let Some(body) = trimmed.strip_prefix('"') {
                    let literal = self.parse_quoted(body, token.position)?;
                    return Ok(Node::Literal(literal));
                }
                self.parse_placeholder(text.trim(), token.position)
            }
            _ => Err(self.unexpected(&token)),
        }
    }

    fn parse_placeholder(&mut self, name: &str, position: usize) -> Result<Node, SyntaxError> {
        if !IDENTIFIER.is_match(name) {
            return Err(SyntaxError::UnknownPlaceholder {
                name: name.to_string(),
                position,
            });
        }

        let args = match self.peek_kind() {
            Some(TokenKind::OpenParen) => Some(self.parse_args()?),
            _ => None,
        };
        let kind = self.build_kind(name, args, position)?;
        let qualifier = self.parse_inner_qualifier()?;
        let modifiers = self.parse_modifiers()?;

        Ok(Node::Placeholder(Placeholder {
            kind,
            modifiers,
            qualifier,
            binding: None,
        }))
    }

    fn parse_backreference(&mut self, dollar: usize) -> Result<Node, SyntaxError> {
        let (name, position) = match self.next() {
            Some(Token {
                kind: TokenKind::Text(text),
                position,
            }) => (text.trim().to_string(), position),
            Some(token) => return Err(self.unexpected(&token)),
            None => return Err(self.unbalanced(dollar)),
        };

        let index = BACKREF_NAME
            .captures(&name)
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .ok_or_else(|| SyntaxError::UnexpectedToken {
                found: format!("${}", name),
                position,
                snippet: snippet(self.source, dollar),
            })?;

        if index == 0 || index > self.bindings {
            return Err(SyntaxError::UndefinedBackreferenceTarget {
                name,
                index,
                position: dollar,
            });
        }

        let qualifier = self.parse_inner_qualifier()?;
        let modifiers = self.parse_modifiers()?;
        Ok(Node::Backreference(Backreference {
            index,
            modifiers,
            qualifier,
        }))
    }

    /// Parse the rest of a quoted literal whose opening quote was consumed
    fn parse_quoted(&mut self, first: &str, position: usize) -> Result<String, SyntaxError> {
        let mut body = first.to_string();
        loop {
            if let Some(end) = body.find('"') {
                let rest = body[end + 1..].trim();
                if !rest.is_empty() {
                    return Err(SyntaxError::UnexpectedToken {
                        found: rest.to_string(),
                        position,
                        snippet: snippet(self.source, position),
                    });
                }
                body.truncate(end);
                return Ok(body);
            }

            match self.peek_kind() {
                Some(TokenKind::Text(text)) => {
                    body.push_str(&text);
                    self.pos += 1;
                }
                Some(TokenKind::Escaped(c)) => {
                    body.push(c);
                    self.pos += 1;
                }
                _ => {
                    return Err(SyntaxError::UnexpectedToken {
                        found: "unterminated quoted literal".to_string(),
                        position,
                        snippet: snippet(self.source, position),
                    });
                }
            }
        }
    }

    /// Parse a parenthesized, comma-separated argument list
    fn parse_args(&mut self) -> Result<Vec<String>, SyntaxError> {
        let open = match self.next() {
            Some(token) => token.position,
            None => return Err(self.unbalanced(self.source.len())),
        };

        let mut content = String::new();
        loop {
            match self.next() {
                Some(Token {
                    kind: TokenKind::CloseParen,
                    ..
                }) => break,
                Some(Token {
                    kind: TokenKind::Text(text),
                    ..
                }) => content.push_str(&text),
                Some(Token {
                    kind: TokenKind::Escaped(c),
                    ..
                }) => content.push(c),
                Some(Token {
                    kind: TokenKind::CloseBrace,
                    ..
                })
                | None => {
                    return Err(SyntaxError::InvalidArguments {
                        reason: "unterminated argument list".to_string(),
                        position: open,
                    });
                }
                Some(token) => return Err(self.unexpected(&token)),
            }
        }

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(content.split(',').map(|arg| arg.trim().to_string()).collect())
    }

    /// Zero or more `+modifier[N]` suffixes in written order
    fn parse_modifiers(&mut self) -> Result<Vec<ModifierStep>, SyntaxError> {
        let mut modifiers = Vec::new();

        loop {
            self.skip_blank();
            let plus = match self.peek() {
                Some(Token {
                    kind: TokenKind::Plus,
                    position,
                }) => *position,
                _ => break,
            };
            self.pos += 1;

            let (name, position) = match self.peek_kind() {
                Some(TokenKind::Text(text)) => {
                    self.pos += 1;
                    (text.trim().to_string(), plus + 1)
                }
                _ => (String::new(), plus),
            };

            let args = match self.peek_kind() {
                Some(TokenKind::OpenParen) => self.parse_args()?,
                _ => Vec::new(),
            };

            let modifier = match Modifier::lookup(&name, &args) {
                Some(Ok(modifier)) => modifier,
                Some(Err(reason)) => return Err(SyntaxError::InvalidArguments { reason, position }),
                None => return Err(SyntaxError::UnknownModifier { name, position }),
            };
            let qualifier = self.parse_inner_qualifier()?;
            modifiers.push(ModifierStep {
                modifier,
                qualifier,
            });
        }

        Ok(modifiers)
    }

    fn parse_inner_qualifier(&mut self) -> Result<Option<Qualifier>, SyntaxError> {
        self.skip_blank();
        match self.peek_kind() {
            Some(TokenKind::OpenBracket) => Ok(Some(self.parse_qualifier()?.0)),
            _ => Ok(None),
        }
    }

    /// Parse `[N]`, returning the qualifier and the position of `[`
    fn parse_qualifier(&mut self) -> Result<(Qualifier, usize), SyntaxError> {
        let open = match self.next() {
            Some(token) => token.position,
            None => return Err(self.unbalanced(self.source.len())),
        };

        let mut text = String::new();
        loop {
            match self.next() {
                Some(Token {
                    kind: TokenKind::CloseBracket,
                    ..
                }) => break,
                Some(Token {
                    kind: TokenKind::Text(t),
                    ..
                }) => text.push_str(&t),
                Some(token) => {
                    text.push_str(&token.kind.literal());
                    return Err(SyntaxError::InvalidQualifier {
                        text,
                        position: open,
                    });
                }
                None => {
                    return Err(SyntaxError::InvalidQualifier {
                        text,
                        position: open,
                    });
                }
            }
        }

        let trimmed = text.trim();
        let qualifier = (!trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()))
            .then(|| trimmed.parse::<u8>().ok())
            .flatten()
            .and_then(Qualifier::new);

        match qualifier {
            Some(q) => Ok((q, open)),
            None => Err(SyntaxError::InvalidQualifier {
                text: trimmed.to_string(),
                position: open,
            }),
        }
    }

    /// Resolve a placeholder name and its arguments to a kind
    fn build_kind(
        &self,
        name: &str,
        args: Option<Vec<String>>,
        position: usize,
    ) -> Result<PlaceholderKind, SyntaxError> {
        let args = args.unwrap_or_default();
        let invalid = |reason: String| SyntaxError::InvalidArguments { reason, position };

        let kind = match name.to_ascii_lowercase().as_str() {
            "word" => match args.as_slice() {
                [] => PlaceholderKind::Word { category: None },
                [category] if IDENTIFIER.is_match(category) || is_numbered(category) => {
                    PlaceholderKind::Word {
                        category: Some(category.to_ascii_lowercase()),
                    }
                }
                _ => return Err(invalid("word takes one wordlist name".to_string())),
            },
            "number" => match args.as_slice() {
                [] => PlaceholderKind::Number { min: 0, max: 9 },
                [max] => PlaceholderKind::Number {
                    min: 0,
                    max: parse_int(max, position)?,
                },
                [min, max] => {
                    let (min, max) = (parse_int(min, position)?, parse_int(max, position)?);
                    if min > max {
                        return Err(invalid(format!("range {}..{} has min above max", min, max)));
                    }
                    PlaceholderKind::Number { min, max }
                }
                _ => return Err(invalid("number takes at most two bounds".to_string())),
            },
            "sequence" => match args.as_slice() {
                [length] => {
                    let length = parse_count(length, position)?;
                    if length == 0 || length > MAX_SEQUENCE_LENGTH {
                        return Err(invalid(format!(
                            "sequence length must be between 1 and {}",
                            MAX_SEQUENCE_LENGTH
                        )));
                    }
                    PlaceholderKind::Sequence { length }
                }
                _ => return Err(invalid("sequence takes exactly one length".to_string())),
            },
            "numberpattern" => match args.as_slice() {
                [] => PlaceholderKind::NumberPattern { length: 3 },
                [length] => {
                    let length = parse_count(length, position)?;
                    if length == 0 || length > MAX_SEQUENCE_LENGTH {
                        return Err(invalid(format!(
                            "numberpattern length must be between 1 and {}",
                            MAX_SEQUENCE_LENGTH
                        )));
                    }
                    PlaceholderKind::NumberPattern { length }
                }
                _ => return Err(invalid("numberpattern takes at most one length".to_string())),
            },
            "ordinal" => match args.as_slice() {
                [] => PlaceholderKind::Ordinal { number: None },
                [number] => PlaceholderKind::Ordinal {
                    number: Some(parse_int(number, position)?),
                },
                _ => return Err(invalid("ordinal takes at most one number".to_string())),
            },
            "phonetic" => {
                let (text, style) = match args.as_slice() {
                    [] => ("", None),
                    [text] => (text.as_str(), None),
                    [text, style] => (text.as_str(), Some(style.as_str())),
                    _ => return Err(invalid("phonetic takes text and a style".to_string())),
                };
                let alphabet = match style {
                    None | Some("1") => PhoneticAlphabet::Nato,
                    Some("2") => PhoneticAlphabet::Radio,
                    Some(other) => {
                        return Err(invalid(format!("phonetic style `{}` is not 1 or 2", other)));
                    }
                };
                if !text.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(invalid(format!("phonetic text `{}` must be letters", text)));
                }
                PlaceholderKind::Phonetic {
                    text: (!text.is_empty()).then(|| text.to_string()),
                    alphabet,
                }
            }
            "asc" => match args.as_slice() {
                [] => PlaceholderKind::Asc { character: None },
                [text] if text.chars().count() == 1 => PlaceholderKind::Asc {
                    character: text.chars().next(),
                },
                _ => return Err(invalid("asc takes a single character".to_string())),
            },
            "chr" => match args.as_slice() {
                [code] => {
                    let code = parse_int(code, position)?;
                    match u8::try_from(code) {
                        Ok(code) if (32..=126).contains(&code) => PlaceholderKind::Chr { code },
                        _ => return Err(invalid(format!("chr code {} is not printable", code))),
                    }
                }
                _ => return Err(invalid("chr takes exactly one character code".to_string())),
            },
            simple => {
                let kind = match simple {
                    "symbol" => PlaceholderKind::Symbol,
                    "letter" => PlaceholderKind::Letter,
                    "vowel" => PlaceholderKind::Vowel,
                    "consonant" => PlaceholderKind::Consonant,
                    "pronounceable" => PlaceholderKind::Pronounceable,
                    "space" | "sp" => PlaceholderKind::Space,
                    "keyboard" => PlaceholderKind::Keyboard,
                    "endpunctuation" => PlaceholderKind::EndPunctuation,
                    "sentencepunctuation" => PlaceholderKind::SentencePunctuation,
                    "smiley" => PlaceholderKind::Smiley,
                    "lefthand" => PlaceholderKind::LeftHand,
                    "righthand" => PlaceholderKind::RightHand,
                    "numbercode" => PlaceholderKind::NumberCode,
                    "longmonth" => PlaceholderKind::LongMonth,
                    "shortmonth" => PlaceholderKind::ShortMonth,
                    "longday" => PlaceholderKind::LongDay,
                    "shortday" => PlaceholderKind::ShortDay,
                    "numrow" | "numrowfull" | "row1" | "row1full" | "row2" | "row2full"
                    | "row3" | "row3full" => {
                        let row = match &simple[..simple.len().min(4)] {
                            "numr" => KeyboardRow::Number,
                            "row1" => KeyboardRow::Top,
                            "row2" => KeyboardRow::Home,
                            _ => KeyboardRow::Bottom,
                        };
                        PlaceholderKind::Row {
                            row,
                            full: simple.ends_with("full"),
                        }
                    }
                    _ => {
                        return Err(SyntaxError::UnknownPlaceholder {
                            name: name.to_string(),
                            position,
                        });
                    }
                };
                if !args.is_empty() {
                    return Err(invalid(format!("{} takes no arguments", kind.name())));
                }
                kind
            }
        };

        Ok(kind)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind.clone())
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Skip text tokens made only of whitespace
    fn skip_blank(&mut self) {
        while let Some(Token {
            kind: TokenKind::Text(text),
            ..
        }) = self.peek()
        {
            if !text.trim().is_empty() {
                break;
            }
            self.pos += 1;
        }
    }

    fn unbalanced(&self, position: usize) -> SyntaxError {
        SyntaxError::UnbalancedBraces {
            position,
            snippet: snippet(self.source, position),
        }
    }

    fn unexpected(&self, token: &Token) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            found: token.kind.literal(),
            position: token.position,
            snippet: snippet(self.source, token.position),
        }
    }
}

/// Wordlist names like `4-letter` start with a digit
fn is_numbered(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn parse_int(arg: &str, position: usize) -> Result<i64, SyntaxError> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SyntaxError::InvalidArguments {
            reason: format!("`{}` is not a non-negative integer", arg),
            position,
        });
    }
    arg.parse::<i64>()
        .map_err(|_| SyntaxError::InvalidArguments {
            reason: format!("`{}` is out of range", arg),
            position,
        })
}

fn parse_count(arg: &str, position: usize) -> Result<usize, SyntaxError> {
    let value = parse_int(arg, position)?;
    usize::try_from(value).map_err(|_| SyntaxError::InvalidArguments {
        reason: format!("`{}` is out of range", arg),
        position,
    })
}
