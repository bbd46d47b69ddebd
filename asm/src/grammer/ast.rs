use super::token::Pos;
use std::fmt;

/// Line and column of a name in its source file (0-origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    pub line: usize,
    pub col: usize,
}

impl<'a> From<&Pos<'a>> for Loc {
    fn from(pos: &Pos<'a>) -> Self {
        Loc {
            line: pos.line,
            col: pos.col,
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

#[derive(Debug, Clone)]
pub struct Module(pub Binary); // "(" module ")" | binary

#[derive(Debug, Clone)]
pub struct Binary {
    pub data: Option<Vec<Expr>>, // "(" ".data" expr { expr } ")"
    pub body: Body,              // "(" body ")"
}

#[derive(Debug, Clone, Default)]
pub struct Body(pub Vec<Stmt>); // { stmt }

#[derive(Debug, Clone)]
pub enum Stmt {
    Extern(Vec<(Expr, Vec<String>)>),   // ".extern" expr [ labeldecl ] { ... }, each value with the labels after it
    Asciz(Vec<Chunk>, Option<String>),   // ".asciz" "(" { string | expr } ")" [ labeldecl ]
    Byte(Expr, Option<String>),          // ".byte" expr [ labeldecl ]
    Offset(Expr, Option<String>),        // ".offset" expr [ labeldecl ]
    Func(Expr, Option<String>, Vec<Inst>), // ".func" "(" expr [ labeldecl ] ")" "(" { inst } ".end" ")"
}

#[derive(Debug, Clone)]
pub enum Chunk {
    Text(String), // string-lit
    Expr(Expr),   // expr
}

#[derive(Debug, Clone)]
pub enum Inst {
    Typed(String, String, Vec<Operand>, Loc), // mnemonic "." size { operand }
    Typeless(String, Vec<Operand>, Loc),      // mnemonic { operand }
    AnonLabel(Expr),                     // "%" expr ":"
    JmpLabel(String),                    // labeldecl ":"
}

#[derive(Debug, Clone)]
pub enum Operand {
    Imm(Expr),            // expr
    ExtRef(Field, Field), // "<" field "." field ">"
}

#[derive(Debug, Clone)]
pub enum Field {
    Ident(String, Loc), // ident
    Expr(Expr),    // expr
}

#[derive(Debug, Clone)]
pub enum Expr {
    Binary(BinaryOp, Box<Expr>, Box<Expr>), // expr (binop) expr
    Unary(UnaryOp, Box<Expr>),              // ( "+" | "-" ) factor
    Number(i64),                            // num-lit
    Char(String),                           // char-lit
    Ref(Sigil, String, Loc),                // ( "=" | "@" | ">" ) ident
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Pos, // "+"
    Neg, // "-"
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Mul, // "*"
    Div, // "/"
}

/// Reference prefix. All three resolve the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sigil {
    Equal,  // "="
    Atmark, // "@"
    RAngle, // ">"
}
