//! Token classification.
//!
//! Tokens are classified where they are used, never stored pre-classified.

/// The assignment symbol. Not an [`Operator`]; shape matching handles it.
pub const ASSIGN: &str = "=";

/// What an operand-position token looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    IntegerLiteral,
    Identifier,
    Operator,
    Malformed,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Parse an operator token; `=` and everything else yields `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Optional single leading `-`, then ASCII digits only.
///
/// A lone `-` passes this check and is rejected later when parsed.
#[must_use]
pub fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !token.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Non-empty and ASCII letters only.
#[must_use]
pub fn is_identifier(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphabetic())
}

#[must_use]
pub fn is_operator(token: &str) -> bool {
    Operator::parse(token).is_some()
}

/// Classify a token in operand position.
///
/// The integer check runs first, so `-` is an `IntegerLiteral` here.
#[must_use]
pub fn classify(token: &str) -> TokenKind {
    if is_integer(token) {
        TokenKind::IntegerLiteral
    } else if is_identifier(token) {
        TokenKind::Identifier
    } else if is_operator(token) {
        TokenKind::Operator
    } else {
        TokenKind::Malformed
    }
}
