//! Calculator engine.
//!
//! This module provides functionality to:
//! - Turn key presses into an expression (`state`)
//! - Insert implicit multiplication around parentheses (`normalize`)
//! - Evaluate expressions with a grammar-restricted parser (`evaluation`)
//! - Format results for a fixed-width display (`format`)
//! - Copy results to the clipboard

mod clipboard;
mod evaluation;
mod format;
mod mode;
mod normalize;
mod state;
mod token;

pub use clipboard::copy_to_clipboard;
pub use evaluation::{Evaluation, Number, evaluate, evaluate_expression};
pub use format::{DISPLAY_BUDGET, format_result};
pub use mode::CalcMode;
pub use normalize::normalize;
pub use state::{Calculator, DisplayState, ERROR_SENTINEL, Phase};
pub use token::{InputEvent, LogBase, MathConstant, Operator, Token};
