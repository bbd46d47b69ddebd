use crate::grammer::ast::Loc;
use crate::grammer::token::{Token, TokenKind};
use crate::msg::Msg;
use std::fmt;
use thiserror::Error;

// Token information without lifetime
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub file: String,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}:{}",
            self.kind,
            self.file,
            self.line + 1,
            self.col + 1
        )
    }
}

impl<'a> From<&Token<'a>> for TokenInfo {
    fn from(token: &Token<'a>) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            file: token.pos.file.to_string(),
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Parse errors
    #[error("Unexpected end of file")]
    UnexpectedEOF,

    #[error("Unexpected token: {0}")]
    UnexpectedToken(TokenInfo),

    #[error("Unknown directive: {0}")]
    UnknownDirective(TokenInfo),

    // Assemble errors
    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String, Option<Loc>),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("Invalid opcode for `{0}`")]
    UnknownOpcode(String, Option<Loc>),

    #[error("Invalid size `{0}`: operand width must be 8, 16 or 32 bits")]
    InvalidEncodingWidth(String),

    #[error("Empty character literal")]
    EmptyCharLiteral,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in constant expression")]
    ArithmeticOverflow,

    #[error("Negative offset size: {0}")]
    NegativeOffset(i64),

    // Package errors
    #[error("Byte #{0} out of range: {1} does not fit in 0..=255")]
    SerializationRange(usize, i64),

    #[error("Not a package: missing magic header")]
    BadMagic,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Attach the position of the name that failed to resolve, if not known yet
    pub fn at(self, loc: Loc) -> Self {
        match self {
            Error::UndefinedLabel(name, None) => Error::UndefinedLabel(name, Some(loc)),
            Error::UnknownOpcode(name, None) => Error::UnknownOpcode(name, Some(loc)),
            err => err,
        }
    }

    pub fn loc(&self) -> Option<Loc> {
        match self {
            Error::UndefinedLabel(_, loc) | Error::UnknownOpcode(_, loc) => *loc,
            Error::UnexpectedToken(info) | Error::UnknownDirective(info) => Some(Loc {
                line: info.line,
                col: info.col,
            }),
            _ => None,
        }
    }

    /// Print error with the file it was raised for, pointing at the source line when known
    pub fn print_diag(&self, file: &str, source: &str) {
        let msg = Msg::Error(self.to_string());
        match self.loc() {
            Some(loc) => {
                let raw = source.lines().nth(loc.line).unwrap_or_default();
                msg.print_at(file, loc, raw);
            }
            None => msg.print(file),
        }
    }
}
