use super::token::{Pos, Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct Lexer<'a> {
    file: &'a str,
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, code: &'a str) -> Self {
        Self { file, code }
    }

    pub fn parse(self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        for (line_idx, line) in self.code.lines().enumerate() {
            let lexer = LineLexer::new(line, self.file, line_idx);
            tokens.extend(lexer.parse());
        }
        tokens
    }
}

pub struct LineLexer<'a> {
    line: &'a str,
    iter: Peekable<CharIndices<'a>>,
    file: &'a str,
    line_idx: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str, file: &'a str, line_idx: usize) -> Self {
        Self {
            line,
            iter: line.char_indices().peekable(),
            file,
            line_idx,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
    /// Character right before byte offset `idx` on this line
    fn prev_char(&self, idx: usize) -> Option<char> {
        self.line[..idx].chars().last()
    }
}

// ----------------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = Pos {
                file: self.file,
                line: self.line_idx,
                col: idx,
            };

            // 1. Comment: runs to the end of line
            if ch0 == '#' {
                self.consume();
                while self.iter.next_if(|(_, c)| c.is_whitespace()).is_some() {}
                let comment = self.iter.by_ref().map(|(_, ch)| ch).collect::<String>();
                tokens.push(Token::new(TokenKind::Comment(comment), pos));
                break;
            }

            // 2. Directive: ".func", but not "add.u8" or "<a.b>"
            if ch0 == '.' {
                let glued = self
                    .prev_char(idx)
                    .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric());
                let named = self
                    .peek_nth(1)
                    .is_some_and(|(_, c)| c == '_' || c.is_ascii_alphabetic());
                if named && !glued {
                    self.consume(); // consume '.'
                    tokens.push(Token::new(TokenKind::Directive(self.parse_name()), pos));
                    continue;
                }
            }

            // 3. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 4. Number literal
            if ch0.is_ascii_digit() {
                tokens.push(Token::new(self.parse_number(), pos));
                continue;
            }

            // 5. Char literal: 'A' (at most one character)
            if ch0 == '\'' {
                let kind = match self.parse_quoted('\'', TokenKind::Char) {
                    TokenKind::Char(ch) if ch.chars().count() > 1 => {
                        TokenKind::Error(format!("'{ch}'"))
                    }
                    kind => kind,
                };
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 6. String literal: "ABC"
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_quoted('"', TokenKind::Text), pos));
                continue;
            }

            // 7. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let name = self.parse_name();
                let kind = match keyword(&name) {
                    Some(kind) => kind,
                    None => TokenKind::Ident(name),
                };
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // Error
            self.consume();
            tokens.push(Token::new(TokenKind::Error(format!("{ch0}")), pos));
        }
        tokens
    }

    fn parse_name(&mut self) -> String {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| matches!(ch, '_' | '0'..='9' | 'a'..='z' | 'A'..='Z'))
        {
            lexeme.push(ch);
        }
        lexeme
    }

    // No escapes: everything up to the closing quote is taken as is
    fn parse_quoted(&mut self, quote: char, kind: fn(String) -> TokenKind) -> TokenKind {
        self.consume(); // consume opening quote
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.consume() {
            if ch == quote {
                return kind(lexeme);
            }
            lexeme.push(ch);
        }
        TokenKind::Error(format!("{quote}{lexeme}"))
    }

    fn parse_number(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| matches!(ch, '_' | '0'..='9' | 'a'..='z' | 'A'..='Z'))
        {
            lexeme.push(ch);
        }
        let digits = lexeme.replace('_', "");
        let value = match digits.strip_prefix("0x").or(digits.strip_prefix("0X")) {
            // Hex literals are unsigned
            Some(hex) => u64::from_str_radix(hex, 16)
                .ok()
                .and_then(|v| i64::try_from(v).ok()),
            None => digits.parse::<i64>().ok(),
        };
        match value {
            Some(num) => TokenKind::Number(lexeme, num),
            None => TokenKind::Error(lexeme),
        }
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '=' => Some(TokenKind::Equal),
        '@' => Some(TokenKind::Atmark),
        '$' => Some(TokenKind::Dollar),
        '%' => Some(TokenKind::Percent),
        ':' => Some(TokenKind::Colon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "package" => Some(TokenKind::KwPackage),
        _ => None,
    }
}
