//! Domain layer for calculator module
//!
//! Tokenizer, token classifier, shared variable store and the fixed-shape
//! evaluator, plus the `Service` facade used by the connection handler.

pub mod classifier;
pub mod error;
pub mod evaluator;
pub mod service;
pub mod store;
pub mod tokenizer;

pub use error::EvalError;
pub use service::Service;
pub use store::VariableStore;

/// Integer type every expression evaluates to. Arithmetic wraps on overflow.
pub type Value = i32;
