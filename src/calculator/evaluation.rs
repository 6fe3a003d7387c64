//! Expression evaluation.
//!
//! A small recursive-descent parser over a fixed arithmetic grammar. Anything
//! outside the grammar is rejected during lexing, so evaluating user input can
//! never do more than arithmetic.
//!
//! ```text
//! expr    := shift
//! shift   := sum (("<<" | ">>") sum)*
//! sum     := term (("+" | "-") term)*
//! term    := unary (("*" | "/") unary)*
//! unary   := "-" unary | power
//! power   := primary ("**" unary)?
//! primary := NUMBER | "(" expr ")"
//! ```

use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use tracing::debug;

use super::format::format_result;
use super::normalize::normalize;
use crate::error::{CalcError, CalcResult};

/// Deepest nesting of parentheses, unary minus and exponents the parser accepts.
const MAX_NESTING: usize = 256;

/// A numeric value: integers stay exact until an operation needs a float.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    fn finite(self) -> CalcResult<Self> {
        match self {
            Self::Float(f) if !f.is_finite() => Err(CalcError::domain("result is not a finite number")),
            other => Ok(other),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Result of evaluating a whole expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The expression after implicit multiplication was inserted.
    pub expression: String,
    /// The numeric value.
    pub value: Number,
    /// Formatted for the display budget.
    pub display_result: String,
}

/// Normalize, evaluate and format an expression in one step.
pub fn evaluate_expression(input: &str) -> CalcResult<Evaluation> {
    let expression = normalize(input.trim());
    let value = evaluate(&expression)?;

    Ok(Evaluation {
        display_result: format_result(value),
        expression,
        value,
    })
}

/// Evaluate an already normalized expression.
pub fn evaluate(expression: &str) -> CalcResult<Number> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::syntax("empty expression"));
    }

    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        depth: 0,
    };
    let value = parser.parse_expr()?;

    if let Some(extra) = parser.tokens.next() {
        return Err(CalcError::syntax(format!("unexpected '{extra}'")));
    }

    debug!(expression, %value, "evaluated");
    value.finite()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Lexeme {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    ShiftLeft,
    ShiftRight,
    Open,
    Close,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Power => f.write_str("**"),
            Self::ShiftLeft => f.write_str("<<"),
            Self::ShiftRight => f.write_str(">>"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> CalcResult<Vec<Lexeme>> {
    let mut out = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let lexeme = match c {
            c if c.is_whitespace() => continue,
            '+' => Lexeme::Plus,
            '-' => Lexeme::Minus,
            '/' => Lexeme::Slash,
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            '*' => {
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    Lexeme::Power
                } else {
                    Lexeme::Star
                }
            }
            '<' | '>' => {
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(CalcError::syntax(format!("unexpected '{c}'")));
                }
                if c == '<' {
                    Lexeme::ShiftLeft
                } else {
                    Lexeme::ShiftRight
                }
            }
            '0'..='9' | '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, d)) = chars.next_if(|&(_, d)| d.is_ascii_digit() || d == '.') {
                    end = i + d.len_utf8();
                }
                Lexeme::Num(parse_number(&input[start..end])?)
            }
            other => return Err(CalcError::syntax(format!("unexpected character '{other}'"))),
        };
        out.push(lexeme);
    }

    Ok(out)
}

fn parse_number(literal: &str) -> CalcResult<Number> {
    let invalid = || CalcError::syntax(format!("invalid number '{literal}'"));

    if literal.matches('.').count() > 1 || literal == "." {
        return Err(invalid());
    }

    if !literal.contains('.')
        && let Ok(i) = literal.parse::<i64>()
    {
        return Ok(Number::Int(i));
    }

    literal.parse::<f64>().map(Number::Float).map_err(|_| invalid())
}

struct Parser {
    tokens: Peekable<IntoIter<Lexeme>>,
    depth: usize,
}

impl Parser {
    /// Run one recursive step, failing instead of exhausting the stack.
    fn nested(&mut self, step: fn(&mut Self) -> CalcResult<Number>) -> CalcResult<Number> {
        if self.depth >= MAX_NESTING {
            return Err(CalcError::syntax("expression nested too deeply"));
        }
        self.depth += 1;
        let result = step(self);
        self.depth -= 1;
        result
    }

    fn parse_expr(&mut self) -> CalcResult<Number> {
        self.parse_shift()
    }

    fn parse_shift(&mut self) -> CalcResult<Number> {
        let mut lhs = self.parse_sum()?;

        while let Some(op @ (Lexeme::ShiftLeft | Lexeme::ShiftRight)) = self.tokens.peek().copied() {
            self.tokens.next();
            let rhs = self.parse_sum()?;
            lhs = shift(lhs, rhs, op == Lexeme::ShiftLeft)?;
        }

        Ok(lhs)
    }

    fn parse_sum(&mut self) -> CalcResult<Number> {
        let mut lhs = self.parse_term()?;

        while let Some(op @ (Lexeme::Plus | Lexeme::Minus)) = self.tokens.peek().copied() {
            self.tokens.next();
            let rhs = self.parse_term()?;
            lhs = if op == Lexeme::Plus {
                arith(lhs, rhs, i64::checked_add, |a, b| a + b)
            } else {
                arith(lhs, rhs, i64::checked_sub, |a, b| a - b)
            };
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> CalcResult<Number> {
        let mut lhs = self.parse_unary()?;

        while let Some(op @ (Lexeme::Star | Lexeme::Slash)) = self.tokens.peek().copied() {
            self.tokens.next();
            let rhs = self.parse_unary()?;
            lhs = if op == Lexeme::Star {
                arith(lhs, rhs, i64::checked_mul, |a, b| a * b)
            } else {
                divide(lhs, rhs)?
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> CalcResult<Number> {
        if self.tokens.next_if_eq(&Lexeme::Minus).is_some() {
            return Ok(match self.nested(Self::parse_unary)? {
                Number::Int(i) => i.checked_neg().map_or(Number::Float(-(i as f64)), Number::Int),
                Number::Float(f) => Number::Float(-f),
            });
        }

        self.parse_power()
    }

    fn parse_power(&mut self) -> CalcResult<Number> {
        let base = self.parse_primary()?;

        if self.tokens.next_if_eq(&Lexeme::Power).is_some() {
            // The exponent goes through `unary`, which makes `**` right-associative.
            let exponent = self.nested(Self::parse_unary)?;
            return power(base, exponent);
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> CalcResult<Number> {
        match self.tokens.next() {
            Some(Lexeme::Num(n)) => Ok(n),
            Some(Lexeme::Open) => {
                let inner = self.nested(Self::parse_expr)?;
                match self.tokens.next() {
                    Some(Lexeme::Close) => Ok(inner),
                    Some(other) => Err(CalcError::syntax(format!("expected ')' but got '{other}'"))),
                    None => Err(CalcError::syntax("unbalanced parentheses")),
                }
            }
            Some(other) => Err(CalcError::syntax(format!("unexpected '{other}'"))),
            None => Err(CalcError::syntax("missing operand")),
        }
    }
}

fn arith(
    lhs: Number,
    rhs: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Number {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => int_op(a, b)
            .map(Number::Int)
            .unwrap_or_else(|| Number::Float(float_op(a as f64, b as f64))),
        _ => Number::Float(float_op(lhs.as_f64(), rhs.as_f64())),
    }
}

fn divide(lhs: Number, rhs: Number) -> CalcResult<Number> {
    if rhs.is_zero() {
        return Err(CalcError::domain("division by zero"));
    }
    Ok(Number::Float(lhs.as_f64() / rhs.as_f64()))
}

fn power(base: Number, exponent: Number) -> CalcResult<Number> {
    if base.is_zero() && exponent.as_f64() < 0.0 {
        return Err(CalcError::domain("zero raised to a negative power"));
    }

    if let (Number::Int(b), Number::Int(e)) = (base, exponent)
        && e >= 0
    {
        let exact = u32::try_from(e).ok().and_then(|e| b.checked_pow(e));
        return Ok(exact.map_or_else(|| Number::Float((b as f64).powf(e as f64)), Number::Int));
    }

    let (b, e) = (base.as_f64(), exponent.as_f64());
    if b < 0.0 && e.fract() != 0.0 {
        return Err(CalcError::domain("fractional power of a negative number"));
    }
    Ok(Number::Float(b.powf(e)))
}

fn shift(value: Number, amount: Number, left: bool) -> CalcResult<Number> {
    let (Number::Int(v), Number::Int(n)) = (value, amount) else {
        return Err(CalcError::domain("bit shifts need whole numbers"));
    };
    if n < 0 {
        return Err(CalcError::domain("negative shift count"));
    }

    if left {
        if v == 0 {
            return Ok(Number::Int(0));
        }
        // Shifting must not lose significant bits.
        if n >= 63 || (v << n) >> n != v {
            return Err(CalcError::domain("shift overflows"));
        }
        Ok(Number::Int(v << n))
    } else {
        let shifted = if n >= 63 { if v < 0 { -1 } else { 0 } } else { v >> n };
        Ok(Number::Int(shifted))
    }
}
