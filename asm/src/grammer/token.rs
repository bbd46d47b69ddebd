use std::fmt;

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub pos: Pos<'a>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, pos: Pos<'a>) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Single character tokens
    Plus,    // '+'
    Minus,   // '-'
    Star,    // '*'
    Slash,   // '/'
    Equal,   // '='
    Atmark,  // '@'
    Dollar,  // '$'
    Percent, // '%'
    Colon,   // ':'
    Comma,   // ','
    Period,  // '.'
    LParen,  // '('
    RParen,  // ')'
    LAngle,  // '<'
    RAngle,  // '>'

    // Keywords
    KwPackage, // "package"

    // Directive: ".func", ".data", ...
    Directive(String),

    // Identifier
    Ident(String),

    // Literals
    Number(String, i64),
    Text(String),
    Char(String),

    // Special
    Comment(String),
    Error(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            Plus => write!(f, "`+`"),
            Minus => write!(f, "`-`"),
            Star => write!(f, "`*`"),
            Slash => write!(f, "`/`"),
            Equal => write!(f, "`=`"),
            Atmark => write!(f, "`@`"),
            Dollar => write!(f, "`$`"),
            Percent => write!(f, "`%`"),
            Colon => write!(f, "`:`"),
            Comma => write!(f, "`,`"),
            Period => write!(f, "`.`"),
            LParen => write!(f, "`(`"),
            RParen => write!(f, "`)`"),
            LAngle => write!(f, "`<`"),
            RAngle => write!(f, "`>`"),
            KwPackage => write!(f, "`package`"),
            Directive(name) => write!(f, "`.{}`", name),
            Ident(name) => write!(f, "`{}`", name),
            Number(lexeme, _) => write!(f, "`{}`", lexeme),
            Text(s) => write!(f, "`\"{}\"`", s),
            Char(s) => write!(f, "`'{}'`", s),
            Comment(_) => write!(f, "comment"),
            Error(s) => write!(f, "invalid token `{}`", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pos<'a> {
    pub file: &'a str,
    pub line: usize,
    pub col: usize,
}
