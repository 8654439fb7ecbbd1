//! Cross-module tests for the engine
//!
//! Tests are organized by topic:
//! - `end_to_end` - Full analyses from profile input to report
//! - `rmd` - Divisor table, start ages and withdrawal plans
//! - `simulation` - Determinism and shape of the survival forecast
//! - `states` - The built-in state table against the tax calculator

mod rmd;
mod states;
