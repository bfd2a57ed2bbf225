//! Domain service for calculator
//!
//! Entry point used by the connection handler: one request line in, one outcome out.

use std::sync::Arc;

use tracing::debug;

use super::evaluator::evaluate;
use super::tokenizer::tokenize;
use super::{EvalError, Value, VariableStore};

/// Evaluates request lines against the process-wide variable store.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone, Default)]
pub struct Service {
    store: Arc<VariableStore>,
}

impl Service {
    /// Create a service over an explicitly constructed store.
    #[must_use]
    pub fn new(store: Arc<VariableStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<VariableStore> {
        &self.store
    }

    /// Tokenize and evaluate one request line.
    ///
    /// # Errors
    /// Returns an [`EvalError`] when the line does not evaluate; the store is left untouched.
    pub fn evaluate(&self, line: &str) -> Result<Value, EvalError> {
        let tokens = tokenize(line);
        let outcome = evaluate(&tokens, &self.store);
        match &outcome {
            Ok(value) => debug!(line = line.trim_end(), value, "expression evaluated"),
            Err(error) => debug!(line = line.trim_end(), %error, "expression rejected"),
        }
        outcome
    }
}
