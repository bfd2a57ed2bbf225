//! Fixed-shape expression evaluator.
//!
//! The grammar is a closed set of shapes keyed by token count and the position
//! of `=`:
//!
//! | tokens | shape            |
//! |--------|------------------|
//! | 1      | `A`              |
//! | 3      | `A op B`         |
//! | 3      | `VAR = B`        |
//! | 5      | `VAR = B op C`   |
//!
//! Any other token count is rejected. There is no precedence, no grouping and
//! no chaining.

use super::classifier::{ASSIGN, Operator, TokenKind, classify, is_identifier};
use super::{EvalError, Value, VariableStore};

/// `lhs op rhs` with both operands already checked to be literals or identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arithmetic<'a> {
    pub lhs: &'a str,
    pub op: Operator,
    pub rhs: &'a str,
}

/// A recognized line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    Operand(&'a str),
    Arithmetic(Arithmetic<'a>),
    Assign { target: &'a str, source: &'a str },
    AssignArithmetic { target: &'a str, expr: Arithmetic<'a> },
}

impl<'a> Shape<'a> {
    /// Match a token sequence against the supported shapes.
    ///
    /// # Errors
    /// Returns the first lexical/shape problem found in the tokens.
    pub fn recognize(tokens: &[&'a str]) -> Result<Self, EvalError> {
        match *tokens {
            [token] => Ok(Self::Operand(token)),
            [target, ASSIGN, source] => Ok(Self::Assign {
                target: assignment_target(target)?,
                source: operand(source)?,
            }),
            [lhs, op, rhs] => Arithmetic::recognize(lhs, op, rhs).map(Self::Arithmetic),
            [target, ASSIGN, lhs, op, rhs] => Ok(Self::AssignArithmetic {
                target: assignment_target(target)?,
                expr: Arithmetic::recognize(lhs, op, rhs)?,
            }),
            [first, _, _, _, _] => Err(EvalError::MissingAssignment(first.to_owned())),
            _ => Err(EvalError::TokenCount(tokens.len())),
        }
    }
}

impl<'a> Arithmetic<'a> {
    fn recognize(lhs: &'a str, op: &'a str, rhs: &'a str) -> Result<Self, EvalError> {
        let op = Operator::parse(op).ok_or_else(|| EvalError::UnknownOperator(op.to_owned()))?;
        Ok(Self {
            lhs: operand(lhs)?,
            op,
            rhs: operand(rhs)?,
        })
    }

    /// Resolve both operands and combine them. Never touches the store for writing.
    ///
    /// # Errors
    /// Fails on unassigned identifiers, invalid literals and division by zero.
    pub fn eval(&self, store: &VariableStore) -> Result<Value, EvalError> {
        let lhs = resolve(self.lhs, store)?;
        let rhs = resolve(self.rhs, store)?;
        apply(self.op, lhs, rhs)
    }
}

/// Evaluate one tokenized line against the store.
///
/// Assignments write the store only after the right-hand side fully succeeded,
/// so a failed line never leaves a partial update behind.
///
/// # Errors
/// Returns an [`EvalError`] for every line that cannot be evaluated.
pub fn evaluate(tokens: &[&str], store: &VariableStore) -> Result<Value, EvalError> {
    match Shape::recognize(tokens)? {
        Shape::Operand(token) => resolve(token, store),
        Shape::Arithmetic(expr) => expr.eval(store),
        Shape::Assign { target, source } => {
            let value = resolve(source, store)?;
            store.set(target, value);
            Ok(value)
        }
        Shape::AssignArithmetic { target, expr } => {
            let value = expr.eval(store)?;
            store.set(target, value);
            Ok(value)
        }
    }
}

fn assignment_target(token: &str) -> Result<&str, EvalError> {
    if is_identifier(token) {
        Ok(token)
    } else {
        Err(EvalError::InvalidTarget(token.to_owned()))
    }
}

fn operand(token: &str) -> Result<&str, EvalError> {
    match classify(token) {
        TokenKind::IntegerLiteral | TokenKind::Identifier => Ok(token),
        TokenKind::Operator | TokenKind::Malformed => {
            Err(EvalError::MalformedOperand(token.to_owned()))
        }
    }
}

fn resolve(token: &str, store: &VariableStore) -> Result<Value, EvalError> {
    match classify(token) {
        TokenKind::IntegerLiteral => token
            .parse()
            .map_err(|_| EvalError::InvalidLiteral(token.to_owned())),
        TokenKind::Identifier => store
            .get(token)
            .ok_or_else(|| EvalError::UnknownIdentifier(token.to_owned())),
        TokenKind::Operator | TokenKind::Malformed => {
            Err(EvalError::MalformedOperand(token.to_owned()))
        }
    }
}

fn apply(op: Operator, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match op {
        Operator::Add => Ok(lhs.wrapping_add(rhs)),
        Operator::Sub => Ok(lhs.wrapping_sub(rhs)),
        Operator::Mul => Ok(lhs.wrapping_mul(rhs)),
        Operator::Div if rhs == 0 => Err(EvalError::DivisionByZero),
        Operator::Div => Ok(lhs.wrapping_div(rhs)),
    }
}
