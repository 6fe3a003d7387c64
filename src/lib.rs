//! zcalc: a keyboard-driven calculator engine.
//!
//! The [`calculator`] module holds the engine: an input state machine fed with
//! key events, an implicit-multiplication normalizer, a grammar-restricted
//! evaluator and a fixed-width result formatter. [`config`] and [`keys`] are
//! the thin layers the terminal front end uses around it.

pub mod calculator;
pub mod config;
pub mod error;
pub mod keys;

pub use calculator::{CalcMode, Calculator, DisplayState, InputEvent};
pub use error::{CalcError, CalcResult};
