//! Tokens and input events understood by the calculator.

use std::fmt;

/// A binary operator that can be committed to the operation buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    ShiftLeft,
    ShiftRight,
}

impl Operator {
    /// The operator as it appears in an evaluable expression.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        }
    }

    /// The operator as it is shown to the user.
    pub fn display_symbol(self) -> &'static str {
        match self {
            Self::Pow => "^",
            other => other.symbol(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A committed element of the operation buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A finished operand, kept as the text that was typed.
    Number(String),
    Operator(Operator),
}

impl Token {
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// Text of the token inside an evaluable expression.
    pub fn as_expression(&self) -> &str {
        match self {
            Self::Number(text) => text,
            Self::Operator(op) => op.symbol(),
        }
    }
}

/// Base of a logarithm key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogBase {
    Ten,
    /// `ln`, the key's default when no base is given.
    #[default]
    Natural,
}

/// Special number keys of the scientific layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathConstant {
    Pi,
    E,
}

impl MathConstant {
    /// Decimal text inserted into the current number.
    pub fn text(self) -> String {
        match self {
            Self::Pi => std::f64::consts::PI.to_string(),
            Self::E => std::f64::consts::E.to_string(),
        }
    }
}

/// One user action, as delivered by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Digit(char),
    Constant(MathConstant),
    Operator(Operator),
    Equals,
    Backspace,
    ClearAll,
    Percent,
    Invert,
    Exponentiate,
    Square,
    Logarithm(LogBase),
}
