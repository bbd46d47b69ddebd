use super::token::{Token, TokenKind};
use crate::error::Error;

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    idx: usize,
}

impl<'a> Parser<'a> {
    pub fn new<I: IntoIterator<Item = Token<'a>>>(tokens: I) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|token| !matches!(token.kind, TokenKind::Comment(_)))
            .collect();
        Parser { tokens, idx: 0 }
    }
}

impl<'a> Parser<'a> {
    /// Peek : Watch next token without consuming it
    pub fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.idx)
    }

    /// Peek n tokens ahead (0 = next)
    pub fn peek_nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.idx + n)
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.idx).cloned();
        if token.is_some() {
            self.idx += 1;
        }
        token
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        self.peek().is_some_and(|token| cond(token))
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token<'a>> {
        if self.check_if(cond) {
            self.next()
        } else {
            None
        }
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Result<Token<'a>, Error> {
        let token = self.peek().ok_or(Error::UnexpectedEOF)?;
        if !cond(token) {
            return Err(Error::UnexpectedToken(token.into()));
        }
        self.next().ok_or(Error::UnexpectedEOF)
    }

    /// First token after a run of `(`, i.e. what a parenthesized form starts with
    pub fn peek_unwrapped(&self) -> Option<&Token<'a>> {
        let mut n = 0;
        while let Some(token) = self.peek_nth(n) {
            if token.kind != TokenKind::LParen {
                return Some(token);
            }
            n += 1;
        }
        None
    }

    /// Error for whatever comes next
    pub fn unexpected(&self) -> Error {
        match self.peek() {
            Some(token) => Error::UnexpectedToken(token.into()),
            None => Error::UnexpectedEOF,
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}
