use super::labels::Labels;
use crate::error::Error;
use crate::grammer::ast::{BinaryOp, Expr, UnaryOp};

/// Compile-time value of an arithmetic expression.
///
/// `/` truncates toward zero. References resolve against the labels bound so
/// far; the sigil makes no difference.
pub fn eval(expr: &Expr, labels: &Labels) -> Result<i64, Error> {
    match expr {
        Expr::Number(num) => Ok(*num),
        Expr::Char(ch) => ch
            .chars()
            .next()
            .map(|c| c as i64)
            .ok_or(Error::EmptyCharLiteral),
        Expr::Ref(_, name, loc) => labels.get(name).map_err(|err| err.at(*loc)),
        Expr::Unary(UnaryOp::Pos, operand) => eval(operand, labels),
        Expr::Unary(UnaryOp::Neg, operand) => eval(operand, labels)?
            .checked_neg()
            .ok_or(Error::ArithmeticOverflow),
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(lhs, labels)?;
            let rhs = eval(rhs, labels)?;
            let val = match op {
                BinaryOp::Add => lhs.checked_add(rhs),
                BinaryOp::Sub => lhs.checked_sub(rhs),
                BinaryOp::Mul => lhs.checked_mul(rhs),
                BinaryOp::Div if rhs == 0 => return Err(Error::DivisionByZero),
                BinaryOp::Div => lhs.checked_div(rhs),
            };
            val.ok_or(Error::ArithmeticOverflow)
        }
    }
}
