use super::ast::{BinaryOp, Binary, Body, Chunk, Expr, Field, Inst, Loc, Module, Operand, Sigil, Stmt, UnaryOp};
use super::parsercore::Parser;
use super::token::TokenKind::{self, *};
use crate::error::Error;
use crate::{check, expect, optional};
use arch::size::Size;

impl<'a> Parser<'a> {
    pub fn parse(mut self) -> Result<Module, Error> {
        let module = self.parse_module()?;
        match self.peek() {
            Some(token) => Err(Error::UnexpectedToken(token.into())),
            None => Ok(module),
        }
    }
}

// ----------------------------------------------------------------------------
// Lookahead
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// Where the next token starts
    fn loc(&self) -> Loc {
        self.peek().map(|token| Loc::from(&token.pos)).unwrap_or_default()
    }

    fn next_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind.clone())
    }

    fn is_directive(&self, n: usize, name: &str) -> bool {
        matches!(self.peek_nth(n), Some(token) if token.kind == Directive(name.to_string()))
    }

    fn expect_directive(&mut self, name: &str) -> Result<(), Error> {
        self.expect_tobe(|token| matches!(&token.kind, Directive(d) if d == name))?;
        Ok(())
    }

    /// labeldecl = "(" labeldecl ")" | "$" ident
    fn starts_labeldecl(&self) -> bool {
        matches!(self.peek_unwrapped(), Some(token) if token.kind == Dollar)
    }

    /// `(` opens a statement or an instruction rather than a value
    fn starts_form(&self) -> bool {
        matches!(
            self.peek_unwrapped().map(|token| &token.kind),
            Some(Directive(_) | Ident(_) | Percent | Dollar | RParen) | None
        )
    }

    fn starts_expr(&self) -> bool {
        match self.peek().map(|token| &token.kind) {
            Some(LParen) => !self.starts_form(),
            Some(Number(_, _) | Char(_) | Equal | Atmark | RAngle | Plus | Minus) => true,
            _ => false,
        }
    }

    fn starts_operand(&self) -> bool {
        check!(self, LAngle) || self.starts_expr()
    }
}

// ----------------------------------------------------------------------------
// Structure
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// module = "(" module ")" | binary
    fn parse_module(&mut self) -> Result<Module, Error> {
        if check!(self, LParen) {
            expect!(self, LParen)?;
            let module = self.parse_module()?;
            expect!(self, RParen)?;
            return Ok(module);
        }
        Ok(Module(self.parse_binary()?))
    }

    /// binary = "package" [ data ] [ "(" body ")" ]
    fn parse_binary(&mut self) -> Result<Binary, Error> {
        expect!(self, KwPackage)?;
        let data = if check!(self, LParen) && self.is_directive(1, "data") {
            Some(self.parse_data()?)
        } else {
            None
        };
        let body = optional!(self, LParen, {
            let body = self.parse_body()?;
            expect!(self, RParen)?;
            body
        });
        Ok(Binary {
            data,
            body: body.unwrap_or_default(),
        })
    }

    /// data = "(" ".data" [ "," ] expr [ "," ] { expr [ "," ] } ")"
    fn parse_data(&mut self) -> Result<Vec<Expr>, Error> {
        expect!(self, LParen)?;
        self.expect_directive("data")?;
        optional!(self, Comma);
        let mut values = vec![];
        loop {
            values.push(self.parse_expr()?);
            optional!(self, Comma);
            if check!(self, RParen) {
                break;
            }
        }
        expect!(self, RParen)?;
        Ok(values)
    }

    /// body = { stmt }
    fn parse_body(&mut self) -> Result<Body, Error> {
        let mut stmts = vec![];
        while !check!(self, RParen) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Body(stmts))
    }

    /// stmt = "(" stmt ")" | extern | asciz | byte | offset | func
    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        match self.next_kind() {
            Some(LParen) => {
                expect!(self, LParen)?;
                let stmt = self.parse_stmt()?;
                expect!(self, RParen)?;
                Ok(stmt)
            }
            Some(Directive(name)) => match name.as_str() {
                "extern" => self.parse_extern(),
                "asciz" => self.parse_asciz(),
                "byte" => self.parse_byte(),
                "offset" => self.parse_offset(),
                "func" => self.parse_func(),
                _ => match self.peek() {
                    Some(token) => Err(Error::UnknownDirective(token.into())),
                    None => Err(Error::UnexpectedEOF),
                },
            },
            _ => Err(self.unexpected()),
        }
    }
}

// ----------------------------------------------------------------------------
// Directives
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// extern = ".extern" item { item }
    /// item   = expr | labeldecl | "(" { item } ")"
    fn parse_extern(&mut self) -> Result<Stmt, Error> {
        self.expect_directive("extern")?;
        let mut items = vec![];
        self.parse_extern_item(&mut items)?;
        while self.starts_labeldecl() || check!(self, LParen) && !self.starts_form() || self.starts_expr() {
            self.parse_extern_item(&mut items)?;
        }
        Ok(Stmt::Extern(items))
    }

    fn parse_extern_item(&mut self, items: &mut Vec<(Expr, Vec<String>)>) -> Result<(), Error> {
        // A label binds to the value right before it
        if self.starts_labeldecl() {
            let err = self.unexpected();
            let label = self.parse_labeldecl()?;
            match items.last_mut() {
                Some((_, labels)) => labels.push(label),
                None => return Err(err),
            }
            return Ok(());
        }
        // Groups are flattened
        if check!(self, LParen) {
            expect!(self, LParen)?;
            while !check!(self, RParen) {
                self.parse_extern_item(items)?;
            }
            expect!(self, RParen)?;
            return Ok(());
        }
        items.push((self.parse_expr()?, vec![]));
        Ok(())
    }

    /// asciz = ".asciz" "(" ( string | expr ) { string | expr } ")" [ labeldecl ]
    fn parse_asciz(&mut self) -> Result<Stmt, Error> {
        self.expect_directive("asciz")?;
        expect!(self, LParen)?;
        let mut chunks = vec![];
        loop {
            match self.next_kind() {
                Some(Text(text)) => {
                    self.next();
                    chunks.push(Chunk::Text(text));
                }
                _ => chunks.push(Chunk::Expr(self.parse_expr()?)),
            }
            if check!(self, RParen) {
                break;
            }
        }
        expect!(self, RParen)?;
        let label = self.parse_labeldecl_opt()?;
        Ok(Stmt::Asciz(chunks, label))
    }

    /// byte = ".byte" expr [ labeldecl ]
    fn parse_byte(&mut self) -> Result<Stmt, Error> {
        self.expect_directive("byte")?;
        let value = self.parse_expr()?;
        let label = self.parse_labeldecl_opt()?;
        Ok(Stmt::Byte(value, label))
    }

    /// offset = ".offset" expr [ labeldecl ]
    fn parse_offset(&mut self) -> Result<Stmt, Error> {
        self.expect_directive("offset")?;
        let size = self.parse_expr()?;
        let label = self.parse_labeldecl_opt()?;
        Ok(Stmt::Offset(size, label))
    }

    /// func = ".func" "(" expr [ labeldecl ] ")" "(" { inst } ".end" ")"
    fn parse_func(&mut self) -> Result<Stmt, Error> {
        self.expect_directive("func")?;
        expect!(self, LParen)?;
        let id = self.parse_expr()?;
        let label = self.parse_labeldecl_opt()?;
        expect!(self, RParen)?;
        expect!(self, LParen)?;
        let mut insts = vec![];
        while !self.is_directive(0, "end") {
            insts.push(self.parse_inst()?);
        }
        self.expect_directive("end")?;
        expect!(self, RParen)?;
        Ok(Stmt::Func(id, label, insts))
    }

    /// labeldecl = "(" labeldecl ")" | "$" ident
    fn parse_labeldecl(&mut self) -> Result<String, Error> {
        if check!(self, LParen) {
            expect!(self, LParen)?;
            let label = self.parse_labeldecl()?;
            expect!(self, RParen)?;
            return Ok(label);
        }
        expect!(self, Dollar)?;
        self.parse_ident()
    }

    fn parse_labeldecl_opt(&mut self) -> Result<Option<String>, Error> {
        if self.starts_labeldecl() {
            Ok(Some(self.parse_labeldecl()?))
        } else {
            Ok(None)
        }
    }
}

// ----------------------------------------------------------------------------
// Instructions
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// inst = "(" inst ")" | ident "." ident { operand } | ident { operand }
    ///      | "%" expr ":" | labeldecl ":"
    fn parse_inst(&mut self) -> Result<Inst, Error> {
        match self.next_kind() {
            Some(LParen) => {
                expect!(self, LParen)?;
                let inst = self.parse_inst()?;
                expect!(self, RParen)?;
                Ok(inst)
            }
            Some(Percent) => {
                expect!(self, Percent)?;
                let target = self.parse_expr()?;
                expect!(self, Colon)?;
                Ok(Inst::AnonLabel(target))
            }
            Some(Dollar) => {
                let label = self.parse_labeldecl()?;
                expect!(self, Colon)?;
                Ok(Inst::JmpLabel(label))
            }
            Some(Ident(_)) => {
                let loc = self.loc();
                let name = self.parse_ident()?;
                let typed = check!(self, Period)
                    && matches!(self.peek_nth(1), Some(token) if matches!(token.kind, Ident(_)));
                if typed {
                    expect!(self, Period)?;
                    let second = self.parse_ident()?;
                    let (mnemonic, size) = typed_order(name, second);
                    let operands = self.parse_operands()?;
                    Ok(Inst::Typed(mnemonic, size, operands, loc))
                } else {
                    let operands = self.parse_operands()?;
                    Ok(Inst::Typeless(name, operands, loc))
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_operands(&mut self) -> Result<Vec<Operand>, Error> {
        let mut operands = vec![];
        while self.starts_operand() {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    /// operand = "(" operand ")" | expr | "<" field "." field ">"
    fn parse_operand(&mut self) -> Result<Operand, Error> {
        let wrapped_extref = matches!(self.peek_unwrapped(), Some(token) if token.kind == LAngle);
        if check!(self, LParen) && wrapped_extref {
            expect!(self, LParen)?;
            let operand = self.parse_operand()?;
            expect!(self, RParen)?;
            return Ok(operand);
        }
        if check!(self, LAngle) {
            expect!(self, LAngle)?;
            let head = self.parse_field()?;
            expect!(self, Period)?;
            let tail = self.parse_field()?;
            expect!(self, RAngle)?;
            return Ok(Operand::ExtRef(head, tail));
        }
        Ok(Operand::Imm(self.parse_expr()?))
    }

    /// field = ident | expr
    fn parse_field(&mut self) -> Result<Field, Error> {
        if check!(self, Ident(_)) {
            let loc = self.loc();
            return Ok(Field::Ident(self.parse_ident()?, loc));
        }
        Ok(Field::Expr(self.parse_expr()?))
    }
}

/// `mnemonic.size`, also accepting `size.mnemonic`
fn typed_order(first: String, second: String) -> (String, String) {
    let is_size = |s: &str| s.parse::<Size>().is_ok();
    if is_size(&first) && !is_size(&second) {
        (second, first)
    } else {
        (first, second)
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// expr = term { ( "+" | "-" ) term }
    pub fn parse_expr(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.next_kind() {
                Some(Plus) => BinaryOp::Add,
                Some(Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.next();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    /// term = factor { ( "*" | "/" ) factor }
    fn parse_term(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.next_kind() {
                Some(Star) => BinaryOp::Mul,
                Some(Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.next();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    /// factor = ( "+" | "-" ) factor | "(" expr ")" | num-lit | sigil ident | char-lit
    fn parse_factor(&mut self) -> Result<Expr, Error> {
        match self.next_kind() {
            // Unary plus: "+" factor
            Some(Plus) => {
                expect!(self, Plus)?;
                let expr = self.parse_factor()?;
                Ok(Expr::Unary(UnaryOp::Pos, Box::new(expr)))
            }
            // Unary minus: "-" factor
            Some(Minus) => {
                expect!(self, Minus)?;
                let expr = self.parse_factor()?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(expr)))
            }
            // Parenthesized expression: "(" expr ")"
            Some(LParen) => {
                expect!(self, LParen)?;
                let inner = self.parse_expr()?;
                expect!(self, RParen)?;
                Ok(inner)
            }
            Some(Number(_, val)) => {
                self.next();
                Ok(Expr::Number(val))
            }
            Some(Char(ch)) => {
                self.next();
                Ok(Expr::Char(ch))
            }
            // Reference: ( "=" | "@" | ">" ) ident
            Some(Equal | Atmark | RAngle) => {
                let sigil = match self.next().map(|token| token.kind) {
                    Some(Equal) => Sigil::Equal,
                    Some(Atmark) => Sigil::Atmark,
                    _ => Sigil::RAngle,
                };
                let loc = self.loc();
                Ok(Expr::Ref(sigil, self.parse_ident()?, loc))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// ident = ( "A".."Z" | "a".."z" | "_" ) { "0".."9" | "A".."Z" | "a".."z" | "_" }
    fn parse_ident(&mut self) -> Result<String, Error> {
        match self.next_kind() {
            Some(Ident(name)) => {
                self.next();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }
}
