//! Splits pattern text into tokens.
//!
//! The lexer knows nothing about nesting: it only separates literal runs,
//! escape pairs and the structural characters `{ } ( ) | [ ] + $`. Deciding
//! what a structural character means in context is the parser's job.

use crate::utils::LexError;

/// Characters that may follow a backslash to lose their special meaning
pub const ESCAPABLE: &[char] = &['\\', '{', '}', '+', '[', ']', '(', ')', '|', '$'];

/// The kind of a lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of ordinary characters
    Text(String),
    /// A character produced by an escape pair such as `\{`
    Escaped(char),
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Pipe,
    OpenBracket,
    CloseBracket,
    Plus,
    Dollar,
}

impl TokenKind {
    fn structural(c: char) -> Option<TokenKind> {
        let kind = match c {
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '|' => TokenKind::Pipe,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '+' => TokenKind::Plus,
            '$' => TokenKind::Dollar,
            _ => return None,
        };
        Some(kind)
    }

    /// The text this token stands for when it is read as a literal
    pub fn literal(&self) -> String {
        match self {
            TokenKind::Text(text) => text.clone(),
            TokenKind::Escaped(c) => c.to_string(),
            TokenKind::OpenBrace => "{".to_string(),
            TokenKind::CloseBrace => "}".to_string(),
            TokenKind::OpenParen => "(".to_string(),
            TokenKind::CloseParen => ")".to_string(),
            TokenKind::Pipe => "|".to_string(),
            TokenKind::OpenBracket => "[".to_string(),
            TokenKind::CloseBracket => "]".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Dollar => "$".to_string(),
        }
    }
}

/// A token together with the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, position: usize) -> Self {
        Token { kind, position }
    }
}

/// Convert pattern text into an ordered sequence of tokens
///
/// A backslash followed by one of [`ESCAPABLE`] collapses into a single
/// [`TokenKind::Escaped`] character. A backslash followed by anything else is
/// kept as a literal backslash. A backslash at the very end of the text is an
/// error.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut run = String::new();
    let mut run_start = 0;

    while let Some((pos, c)) = chars.next() {
        if c == '\\' {
            flush_run(&mut tokens, &mut run, run_start);
            match chars.peek() {
                None => return Err(LexError::UnterminatedEscape { position: pos }),
                Some(&(_, next)) if ESCAPABLE.contains(&next) => {
                    chars.next();
                    tokens.push(Token::new(TokenKind::Escaped(next), pos));
                }
                Some(_) => tokens.push(Token::new(TokenKind::Escaped('\\'), pos)),
            }
            continue;
        }

        if let Some(kind) = TokenKind::structural(c) {
            flush_run(&mut tokens, &mut run, run_start);
            tokens.push(Token::new(kind, pos));
            continue;
        }

        if run.is_empty() {
            run_start = pos;
        }
        run.push(c);
    }

    flush_run(&mut tokens, &mut run, run_start);
    Ok(tokens)
}

fn flush_run(tokens: &mut Vec<Token>, run: &mut String, start: usize) {
    if !run.is_empty() {
        tokens.push(Token::new(TokenKind::Text(std::mem::take(run)), start));
    }
}
