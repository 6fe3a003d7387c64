//! Calculator modes and the keys each mode exposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::token::{InputEvent, Operator};

/// Operating mode of the calculator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcMode {
    #[default]
    Standard,
    Programming,
    Scientific,
}

impl CalcMode {
    pub const ALL: [CalcMode; 3] = [Self::Standard, Self::Programming, Self::Scientific];

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Programming => "Programming",
            Self::Scientific => "Scientific",
        }
    }

    /// Whether this mode has a key for the given event.
    ///
    /// The grammar is the same in every mode; modes only add keys.
    pub fn allows(self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Operator(Operator::ShiftLeft | Operator::ShiftRight) => {
                self == Self::Programming
            }
            InputEvent::Operator(Operator::Pow)
            | InputEvent::Constant(_)
            | InputEvent::Exponentiate
            | InputEvent::Square
            | InputEvent::Logarithm(_) => self == Self::Scientific,
            _ => true,
        }
    }
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalcMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown calculator mode '{}'", s.trim()))
    }
}
