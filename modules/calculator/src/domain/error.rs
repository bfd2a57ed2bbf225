/// Reasons a single expression line is rejected.
///
/// Every variant is local to one line: the session answers `Error` and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("expected 1, 3 or 5 tokens, got {0}")]
    TokenCount(usize),

    #[error("'{0}' is neither an integer literal nor an identifier")]
    MalformedOperand(String),

    #[error("invalid integer literal '{0}'")]
    InvalidLiteral(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("assignment target must be an identifier, got '{0}'")]
    InvalidTarget(String),

    #[error("expected '=' after '{0}'")]
    MissingAssignment(String),

    #[error("identifier '{0}' has not been assigned")]
    UnknownIdentifier(String),

    #[error("division by zero")]
    DivisionByZero,
}
