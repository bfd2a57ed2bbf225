//! Calculator Module
//!
//! A line-oriented TCP calculator. Each connection sends one expression per
//! line and gets back either the integer result or `Error`.
//!
//! ## Architecture
//!
//! - `domain/` - tokenizer, classifier, shared variable store and the fixed-shape evaluator
//! - `api/tcp/` - per-connection protocol loop and the accept loop
//! - `module.rs` - configuration loading and wiring of the above

pub mod api;
pub mod config;
pub mod domain;
mod module;


pub use config::CalculatorConfig;
pub use domain::{EvalError, Service, Value, VariableStore};
pub use module::{CalculatorModule, MODULE_NAME};
