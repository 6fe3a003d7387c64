//! Key names typed at the terminal, mapped to calculator input events.
//!
//! A line such as `12+8=` or `9 log` is split into keys: multi-character
//! operators, words, and single characters. Whitespace only separates keys.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::calculator::{InputEvent, LogBase, MathConstant, Operator};

lazy_static! {
    /// One key: a two-character operator, a word, or any other single character.
    static ref KEY: Regex = Regex::new(r"\*\*|<<|>>|[A-Za-z]+|\S").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

/// Split a line into input events.
pub fn parse_keys(line: &str) -> Result<Vec<InputEvent>, UnknownKey> {
    KEY.find_iter(line)
        .map(|m| parse_key(m.as_str()).ok_or_else(|| UnknownKey(m.as_str().to_string())))
        .collect()
}

/// Map a single key name to its event.
pub fn parse_key(key: &str) -> Option<InputEvent> {
    let event = match key.to_ascii_lowercase().as_str() {
        k if k.len() == 1 && k.chars().all(|c| c.is_ascii_digit() || "().".contains(c)) => {
            InputEvent::Digit(k.chars().next()?)
        }
        "+" => InputEvent::Operator(Operator::Add),
        "-" => InputEvent::Operator(Operator::Sub),
        "*" | "x" => InputEvent::Operator(Operator::Mul),
        "/" => InputEvent::Operator(Operator::Div),
        "**" | "pow" => InputEvent::Operator(Operator::Pow),
        "<<" => InputEvent::Operator(Operator::ShiftLeft),
        ">>" => InputEvent::Operator(Operator::ShiftRight),
        "=" | "enter" | "return" => InputEvent::Equals,
        "bs" | "backspace" => InputEvent::Backspace,
        "ac" | "c" | "clear" | "esc" | "escape" => InputEvent::ClearAll,
        "%" => InputEvent::Percent,
        "~" | "±" | "neg" => InputEvent::Invert,
        "^" | "exp" => InputEvent::Exponentiate,
        "sq" | "square" => InputEvent::Square,
        "log" => InputEvent::Logarithm(LogBase::Ten),
        "ln" => InputEvent::Logarithm(LogBase::Natural),
        "pi" | "π" => InputEvent::Constant(MathConstant::Pi),
        "e" => InputEvent::Constant(MathConstant::E),
        _ => return None,
    };
    Some(event)
}
