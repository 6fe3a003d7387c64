//! The input state machine.
//!
//! Turns key presses into an operation buffer of committed tokens plus the
//! number currently being typed, and keeps the two display strings in sync.

use serde::Serialize;
use tracing::debug;

use super::evaluation::{Number, evaluate};
use super::format::{format_result, parse_display};
use super::mode::CalcMode;
use super::normalize::normalize;
use super::token::{InputEvent, LogBase, MathConstant, Operator, Token};
use crate::error::{CalcError, CalcResult};

/// Shown in place of the input when an evaluation fails.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Written into the current number by the exponent key.
const POWER_MARKER: &str = "**";

/// Where the calculator is in building an expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing typed since start or the last clear.
    #[default]
    AwaitingFirstOperand,
    /// A number is being typed.
    TypingOperand,
    /// An operator was just committed and no digit has followed.
    AwaitingNextOperand,
    /// The input shows the result of the last evaluation.
    ShowingResult,
}

/// The two strings the presentation layer shows after every event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Current operand or result.
    pub input: String,
    /// Committed expression so far, or the last evaluated expression.
    pub operation: String,
    /// Whether `input` holds the error sentinel.
    pub error: bool,
}

/// A calculator session.
#[derive(Clone, Debug)]
pub struct Calculator {
    mode: CalcMode,
    phase: Phase,
    /// The number being typed. Empty means the default "0".
    fragment: String,
    buffer: Vec<Token>,
    /// Operand committed by the last operator, restored when that operator is undone.
    undo: Option<String>,
    display: DisplayState,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalcMode::default())
    }
}

impl Calculator {
    pub fn new(mode: CalcMode) -> Self {
        Self {
            mode,
            phase: Phase::default(),
            fragment: String::new(),
            buffer: Vec::new(),
            undo: None,
            display: DisplayState {
                input: "0".to_string(),
                ..DisplayState::default()
            },
        }
    }

    pub fn mode(&self) -> CalcMode {
        self.mode
    }

    /// Switch modes. The expression being built is kept.
    pub fn set_mode(&mut self, mode: CalcMode) {
        debug!(from = %self.mode, to = %mode, "switching mode");
        self.mode = mode;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The number being typed, or `"0"` when nothing has been typed.
    pub fn current_number(&self) -> &str {
        if self.fragment.is_empty() {
            "0"
        } else {
            &self.fragment
        }
    }

    /// Tokens committed so far, excluding the number being typed.
    pub fn buffer(&self) -> &[Token] {
        &self.buffer
    }

    pub fn undo_snapshot(&self) -> Option<&str> {
        self.undo.as_deref()
    }

    /// Apply one input event.
    ///
    /// `InputRejected` means the key had nothing to act on and nothing
    /// changed. Syntax and domain errors leave the error sentinel on the
    /// display until the next backspace or clear.
    pub fn handle(&mut self, event: InputEvent) -> CalcResult<()> {
        if !self.mode.allows(&event) {
            debug!(?event, mode = %self.mode, "key not available in this mode");
            return Err(CalcError::InputRejected("key not available in this mode"));
        }

        let result = match event {
            InputEvent::Digit(c) => self.press_digit(c),
            InputEvent::Constant(constant) => self.press_constant(constant),
            InputEvent::Operator(op) => self.press_operator(op),
            InputEvent::Equals => self.press_equals(),
            InputEvent::Backspace => self.clear_last(),
            InputEvent::ClearAll => {
                self.clear_all();
                Ok(())
            }
            InputEvent::Percent => self.percentage(),
            InputEvent::Invert => self.invert_sign(),
            InputEvent::Exponentiate => self.exponentiate(),
            InputEvent::Square => self.square(),
            InputEvent::Logarithm(base) => self.logarithm(base),
        };

        if let Err(err) = &result {
            debug!(?event, %err, "input not applied");
        }
        result
    }

    pub fn press_digit(&mut self, c: char) -> CalcResult<()> {
        match c {
            '0'..='9' | '(' | ')' => {}
            '.' if current_run(&self.fragment).contains('.') => {
                return Err(CalcError::InputRejected("number already has a decimal point"));
            }
            '.' => {}
            _ => return Err(CalcError::InputRejected("not a digit key")),
        }

        self.fragment.push(c);
        self.phase = Phase::TypingOperand;
        self.refresh_input();
        Ok(())
    }

    pub fn press_constant(&mut self, constant: MathConstant) -> CalcResult<()> {
        if self.phase == Phase::ShowingResult {
            self.fragment.clear();
        } else if self
            .fragment
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(CalcError::InputRejected("a constant must start a new number"));
        }

        self.fragment.push_str(&constant.text());
        self.phase = Phase::TypingOperand;
        self.refresh_input();
        Ok(())
    }

    pub fn press_operator(&mut self, op: Operator) -> CalcResult<()> {
        // Consecutive operators: repeat is ignored, a different one replaces the pending one.
        if self.phase == Phase::AwaitingNextOperand
            && let Some(Token::Operator(pending)) = self.buffer.last_mut()
        {
            if *pending == op {
                return Err(CalcError::InputRejected("operator already pending"));
            }
            *pending = op;
            self.refresh_operation();
            return Ok(());
        }

        if self.fragment.is_empty() {
            return Err(CalcError::InputRejected("no operand for the operator"));
        }
        if self.fragment.ends_with(POWER_MARKER) {
            return Err(CalcError::InputRejected("exponent is missing"));
        }

        let operand = std::mem::take(&mut self.fragment);
        self.buffer.push(Token::Number(operand.clone()));
        self.buffer.push(Token::Operator(op));
        self.undo = Some(operand);
        self.phase = Phase::AwaitingNextOperand;

        self.refresh_input();
        self.refresh_operation();
        Ok(())
    }

    /// Evaluate the buffer plus the current number.
    ///
    /// On failure nothing committed changes, so the user can fix the input.
    pub fn press_equals(&mut self) -> CalcResult<()> {
        if self.fragment.is_empty() {
            return Err(CalcError::InputRejected("nothing to evaluate"));
        }

        let mut tokens = self.buffer.clone();
        tokens.push(Token::Number(self.fragment.clone()));
        let expression = normalize(&compact_expression(&tokens));

        let value = match evaluate(&expression) {
            Ok(value) => value,
            Err(err) => return self.fail(err),
        };

        self.display.operation = spaced_expression(&tokens);
        self.fragment = format_result(value);
        self.buffer.clear();
        self.undo = None;
        self.phase = Phase::ShowingResult;
        self.refresh_input();
        Ok(())
    }

    /// Backspace: remove the last typed character, or undo the last operator.
    pub fn clear_last(&mut self) -> CalcResult<()> {
        if self.display.error {
            self.refresh_input();
            return Ok(());
        }

        if self.phase == Phase::ShowingResult {
            return Err(CalcError::InputRejected("nothing to erase in a result"));
        }

        if !self.fragment.is_empty() {
            self.erase_char();
            return Ok(());
        }

        self.undo_operator()
    }

    /// Reset to an empty expression showing "0".
    pub fn clear_all(&mut self) {
        self.fragment.clear();
        self.buffer.clear();
        self.undo = None;
        self.phase = Phase::AwaitingFirstOperand;
        self.display.operation.clear();
        self.refresh_input();
    }

    /// Divide the current number by 100.
    pub fn percentage(&mut self) -> CalcResult<()> {
        let value = parse_display(self.require_number()?)
            .ok_or(CalcError::InputRejected("current number is not a plain value"))?;

        self.fragment = format_result(Number::Float(value / 100.0));
        self.refresh_input();
        Ok(())
    }

    /// Flip the sign of the current number.
    pub fn invert_sign(&mut self) -> CalcResult<()> {
        self.require_number()?;

        match self.fragment.strip_prefix('-') {
            Some(rest) => self.fragment = rest.to_string(),
            None => self.fragment.insert(0, '-'),
        }
        self.refresh_input();
        Ok(())
    }

    /// Start an exponent: the digits typed next raise the current number.
    pub fn exponentiate(&mut self) -> CalcResult<()> {
        if self.require_number()?.ends_with(POWER_MARKER) {
            return Err(CalcError::InputRejected("exponent already started"));
        }

        self.fragment.push_str(POWER_MARKER);
        self.phase = Phase::TypingOperand;
        self.refresh_input();
        Ok(())
    }

    /// Multiply the current number by itself and evaluate right away.
    pub fn square(&mut self) -> CalcResult<()> {
        let original = self.require_number()?.to_string();
        if original.ends_with(POWER_MARKER) {
            return Err(CalcError::InputRejected("exponent is missing"));
        }

        self.fragment = format!("{original}*{original}");
        let result = self.press_equals();
        if result.is_err() {
            self.fragment = original;
        }
        result
    }

    /// Replace the current number with its logarithm.
    pub fn logarithm(&mut self, base: LogBase) -> CalcResult<()> {
        let Some(value) = parse_display(self.require_number()?) else {
            return self.fail(CalcError::syntax("logarithm needs a plain number"));
        };
        if value <= 0.0 {
            return self.fail(CalcError::domain("logarithm of a non-positive number"));
        }

        let result = match base {
            LogBase::Ten => value.log10(),
            LogBase::Natural => value.ln(),
        };
        self.fragment = format_result(Number::Float(result));
        self.refresh_input();
        Ok(())
    }

    fn require_number(&self) -> CalcResult<&str> {
        if self.fragment.is_empty() {
            Err(CalcError::InputRejected("no current number"))
        } else {
            Ok(&self.fragment)
        }
    }

    fn erase_char(&mut self) {
        if self.fragment.ends_with(POWER_MARKER) {
            self.fragment.truncate(self.fragment.len() - POWER_MARKER.len());
        } else {
            self.fragment.pop();
        }

        // A lone sign is no number.
        if self.fragment == "-" {
            self.fragment.clear();
        }
        if self.fragment.is_empty() {
            self.phase = self.idle_phase();
        }
        self.refresh_input();
    }

    fn undo_operator(&mut self) -> CalcResult<()> {
        if !self.buffer.last().is_some_and(Token::is_operator) {
            return Err(CalcError::InputRejected("nothing to erase"));
        }
        self.buffer.pop();

        // Take the operand back out of the buffer so it is committed once, not twice.
        let committed = match self.buffer.last() {
            Some(Token::Number(_)) => self.buffer.pop().map(|t| t.as_expression().to_string()),
            _ => None,
        };
        self.fragment = self.undo.take().or(committed).unwrap_or_default();
        self.phase = if self.fragment.is_empty() {
            self.idle_phase()
        } else {
            Phase::TypingOperand
        };

        self.refresh_input();
        self.refresh_operation();
        Ok(())
    }

    /// Phase for an empty current number.
    fn idle_phase(&self) -> Phase {
        if self.buffer.is_empty() {
            Phase::AwaitingFirstOperand
        } else {
            Phase::AwaitingNextOperand
        }
    }

    fn fail(&mut self, err: CalcError) -> CalcResult<()> {
        self.display.input = ERROR_SENTINEL.to_string();
        self.display.error = true;
        Err(err)
    }

    fn refresh_input(&mut self) {
        self.display.error = false;
        self.display.input = if !self.fragment.is_empty() {
            self.fragment.replace(POWER_MARKER, "^")
        } else if self.phase == Phase::AwaitingNextOperand {
            String::new()
        } else {
            "0".to_string()
        };
    }

    fn refresh_operation(&mut self) {
        self.display.operation = spaced_expression(&self.buffer);
    }
}

/// The trailing run of digits and decimal points.
fn current_run(fragment: &str) -> &str {
    let start = fragment
        .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map_or(0, |i| i + 1);
    &fragment[start..]
}

/// Tokens joined for evaluation.
fn compact_expression(tokens: &[Token]) -> String {
    tokens.iter().map(Token::as_expression).collect()
}

/// Tokens joined for display, with implicit multiplication made visible.
fn spaced_expression(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Number(text) => normalize(text).replace(POWER_MARKER, "^"),
            Token::Operator(op) => op.display_symbol().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(calc: &mut Calculator, digits: &str) {
        for c in digits.chars() {
            calc.press_digit(c).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let calc = Calculator::default();
        assert_eq!(calc.phase(), Phase::AwaitingFirstOperand);
        assert_eq!(calc.display().input, "0");
        assert_eq!(calc.display().operation, "");
        assert_eq!(calc.current_number(), "0");
    }

    #[test]
    fn test_display_tracks_digits() {
        let mut calc = Calculator::default();
        let mut typed = String::new();
        for c in "3141.59".chars() {
            calc.press_digit(c).unwrap();
            typed.push(c);
            assert_eq!(calc.display().input, typed);
        }
        assert_eq!(calc.phase(), Phase::TypingOperand);
    }

    #[test]
    fn test_second_decimal_point_rejected() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "1.5");
        assert_eq!(
            calc.press_digit('.'),
            Err(CalcError::InputRejected("number already has a decimal point"))
        );
        calc.exponentiate().unwrap();
        type_digits(&mut calc, "0.5");
        assert_eq!(calc.current_number(), "1.5**0.5");
    }

    #[test]
    fn test_backspace_undoes_digits() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "9876");
        for _ in 0..4 {
            calc.clear_last().unwrap();
        }
        assert_eq!(calc.current_number(), "0");
        assert_eq!(calc.display().input, "0");
        assert_eq!(calc.phase(), Phase::AwaitingFirstOperand);
    }

    #[test]
    fn test_backspace_lone_sign_resets() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "5");
        calc.invert_sign().unwrap();
        calc.clear_last().unwrap();
        assert_eq!(calc.current_number(), "0");
        assert_eq!(calc.display().input, "0");
    }

    #[test]
    fn test_operator_commits_number() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "12");
        calc.press_operator(Operator::Add).unwrap();

        assert_eq!(
            calc.buffer(),
            &[Token::Number("12".into()), Token::Operator(Operator::Add)]
        );
        assert_eq!(calc.undo_snapshot(), Some("12"));
        assert_eq!(calc.display().input, "");
        assert_eq!(calc.display().operation, "12 +");
        assert_eq!(calc.phase(), Phase::AwaitingNextOperand);
    }

    #[test]
    fn test_operator_without_operand_ignored() {
        let mut calc = Calculator::default();
        assert!(matches!(
            calc.press_operator(Operator::Mul),
            Err(CalcError::InputRejected(_))
        ));
        assert!(calc.buffer().is_empty());
    }

    #[test]
    fn test_duplicate_operator_rejected() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "4");
        calc.press_operator(Operator::Add).unwrap();
        assert!(calc.press_operator(Operator::Add).is_err());
        assert_eq!(calc.buffer().len(), 2);
        assert_eq!(calc.buffer().last(), Some(&Token::Operator(Operator::Add)));
    }

    #[test]
    fn test_operator_replacement() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "4");
        calc.press_operator(Operator::Add).unwrap();
        calc.press_operator(Operator::Mul).unwrap();
        assert_eq!(
            calc.buffer(),
            &[Token::Number("4".into()), Token::Operator(Operator::Mul)]
        );
        assert_eq!(calc.display().operation, "4 *");
    }

    #[test]
    fn test_backspace_undoes_operator() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "7");
        calc.press_operator(Operator::Sub).unwrap();
        type_digits(&mut calc, "12");
        calc.press_operator(Operator::Div).unwrap();

        calc.clear_last().unwrap();
        assert_eq!(calc.current_number(), "12");
        assert_eq!(calc.display().input, "12");
        assert_eq!(calc.display().operation, "7 -");
        assert_eq!(calc.undo_snapshot(), None);
        assert_eq!(calc.phase(), Phase::TypingOperand);

        // The restored operand is committed exactly once.
        type_digits(&mut calc, "3");
        calc.press_operator(Operator::Add).unwrap();
        assert_eq!(calc.display().operation, "7 - 123 +");
    }

    #[test]
    fn test_backspace_walks_back_through_operators() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "7");
        calc.press_operator(Operator::Sub).unwrap();
        type_digits(&mut calc, "1");
        calc.press_operator(Operator::Add).unwrap();

        calc.clear_last().unwrap(); // "+" undone, "1" restored
        calc.clear_last().unwrap(); // "1" erased
        assert_eq!(calc.phase(), Phase::AwaitingNextOperand);
        calc.clear_last().unwrap(); // "-" undone, "7" restored
        assert_eq!(calc.current_number(), "7");
        assert!(calc.buffer().is_empty());
        assert_eq!(calc.display().operation, "");
    }

    #[test]
    fn test_backspace_with_nothing_is_ignored() {
        let mut calc = Calculator::default();
        assert!(matches!(calc.clear_last(), Err(CalcError::InputRejected(_))));
    }

    #[test]
    fn test_equals_end_to_end() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "12");
        calc.press_operator(Operator::Add).unwrap();
        type_digits(&mut calc, "8");
        calc.press_equals().unwrap();

        assert_eq!(calc.display().input, "20");
        assert_eq!(calc.display().operation, "12 + 8");
        assert_eq!(calc.phase(), Phase::ShowingResult);
        assert!(calc.buffer().is_empty());
        assert_eq!(calc.undo_snapshot(), None);
    }

    #[test]
    fn test_equals_shows_implicit_multiplication() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "2(3)");
        calc.press_equals().unwrap();
        assert_eq!(calc.display().input, "6");
        assert_eq!(calc.display().operation, "2*(3)");
    }

    #[test]
    fn test_backspace_after_result_ignored() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "3");
        calc.press_equals().unwrap();
        assert!(calc.clear_last().is_err());
        assert_eq!(calc.display().input, "3");
    }

    #[test]
    fn test_result_continues_as_operand() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "5");
        calc.press_operator(Operator::Mul).unwrap();
        type_digits(&mut calc, "3");
        calc.press_equals().unwrap();
        calc.press_operator(Operator::Sub).unwrap();
        type_digits(&mut calc, "5");
        calc.press_equals().unwrap();
        assert_eq!(calc.display().input, "10");
        assert_eq!(calc.display().operation, "15 - 5");
    }

    #[test]
    fn test_division_by_zero_keeps_state() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "5");
        calc.press_operator(Operator::Div).unwrap();
        type_digits(&mut calc, "0");

        let before = calc.buffer().to_vec();
        assert!(matches!(calc.press_equals(), Err(CalcError::Domain(_))));
        assert_eq!(calc.display().input, ERROR_SENTINEL);
        assert!(calc.display().error);
        assert_eq!(calc.buffer(), before.as_slice());
        assert_eq!(calc.current_number(), "0");

        // Backspace dismisses the error, then edits as usual.
        calc.clear_last().unwrap();
        assert_eq!(calc.display().input, "0");
        assert!(!calc.display().error);
        calc.clear_last().unwrap();
        type_digits(&mut calc, "2");
        calc.press_equals().unwrap();
        assert_eq!(calc.display().input, "2.5");
    }

    #[test]
    fn test_syntax_error_recovered_by_clear() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "(2");
        assert!(matches!(calc.press_equals(), Err(CalcError::Syntax(_))));
        assert_eq!(calc.display().input, ERROR_SENTINEL);
        calc.clear_all();
        assert_eq!(calc.display().input, "0");
        assert!(!calc.display().error);
    }

    #[test]
    fn test_percentage() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "50");
        calc.percentage().unwrap();
        assert_eq!(calc.current_number(), "0.5");
        assert_eq!(calc.display().input, "0.5");
        assert!(calc.buffer().is_empty());
    }

    #[test]
    fn test_percentage_requires_number() {
        let mut calc = Calculator::default();
        assert!(matches!(calc.percentage(), Err(CalcError::InputRejected(_))));
    }

    #[test]
    fn test_invert_is_involutive() {
        for typed in ["7", "0.25", "-3", "(4)", "12.5"] {
            let mut calc = Calculator::default();
            type_digits(&mut calc, typed.trim_start_matches('-'));
            if typed.starts_with('-') {
                calc.invert_sign().unwrap();
            }
            let before = calc.current_number().to_string();
            calc.invert_sign().unwrap();
            assert_ne!(calc.current_number(), before);
            calc.invert_sign().unwrap();
            assert_eq!(calc.current_number(), before);
        }
    }

    #[test]
    fn test_exponentiate() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "2");
        calc.exponentiate().unwrap();
        assert_eq!(calc.display().input, "2^");
        assert!(calc.exponentiate().is_err());
        type_digits(&mut calc, "10");
        assert_eq!(calc.display().input, "2^10");
        calc.press_equals().unwrap();
        assert_eq!(calc.display().input, "1024");
        assert_eq!(calc.display().operation, "2^10");
    }

    #[test]
    fn test_backspace_removes_exponent_marker() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "2");
        calc.exponentiate().unwrap();
        calc.clear_last().unwrap();
        assert_eq!(calc.current_number(), "2");
    }

    #[test]
    fn test_square() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "2");
        calc.press_operator(Operator::Add).unwrap();
        type_digits(&mut calc, "3");
        calc.invert_sign().unwrap();
        calc.square().unwrap();
        assert_eq!(calc.display().input, "11");
        assert_eq!(calc.display().operation, "2 + -3*-3");
    }

    #[test]
    fn test_square_failure_restores_number() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "(2");
        assert!(calc.square().is_err());
        assert_eq!(calc.current_number(), "(2");
    }

    #[test]
    fn test_logarithms() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "9");
        calc.logarithm(LogBase::Ten).unwrap();
        assert_eq!(calc.display().input, "0.954242509");

        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "1");
        calc.logarithm(LogBase::Natural).unwrap();
        assert_eq!(calc.current_number(), "0");

        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "100");
        calc.logarithm(LogBase::Ten).unwrap();
        assert_eq!(calc.current_number(), "2");
    }

    #[test]
    fn test_logarithm_domain_error() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "0");
        assert!(matches!(
            calc.logarithm(LogBase::Ten),
            Err(CalcError::Domain(_))
        ));
        assert_eq!(calc.display().input, ERROR_SENTINEL);
        assert_eq!(calc.current_number(), "0");
    }

    #[test]
    fn test_logarithm_of_expression_is_syntax_error() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "2");
        calc.exponentiate().unwrap();
        type_digits(&mut calc, "3");
        assert!(matches!(
            calc.logarithm(LogBase::Natural),
            Err(CalcError::Syntax(_))
        ));
    }

    #[test]
    fn test_constants() {
        let mut calc = Calculator::new(CalcMode::Scientific);
        type_digits(&mut calc, "2(");
        calc.press_constant(MathConstant::Pi).unwrap();
        type_digits(&mut calc, ")");
        calc.press_equals().unwrap();
        assert_eq!(calc.display().input, "6.28318531");

        assert!(calc.press_constant(MathConstant::E).is_ok());
        assert!(calc.current_number().starts_with("2.718"));
        assert!(calc.press_constant(MathConstant::E).is_err());
    }

    #[test]
    fn test_mode_gating() {
        let mut calc = Calculator::new(CalcMode::Standard);
        calc.handle(InputEvent::Digit('4')).unwrap();
        assert!(calc.handle(InputEvent::Square).is_err());
        assert_eq!(calc.current_number(), "4");

        calc.set_mode(CalcMode::Scientific);
        calc.handle(InputEvent::Square).unwrap();
        assert_eq!(calc.display().input, "16");
    }

    #[test]
    fn test_shift_operators_in_programming_mode() {
        let mut calc = Calculator::new(CalcMode::Programming);
        calc.handle(InputEvent::Digit('1')).unwrap();
        calc.handle(InputEvent::Operator(Operator::ShiftLeft)).unwrap();
        calc.handle(InputEvent::Digit('4')).unwrap();
        calc.handle(InputEvent::Equals).unwrap();
        assert_eq!(calc.display().input, "16");
        assert_eq!(calc.display().operation, "1 << 4");
    }

    #[test]
    fn test_clear_all() {
        let mut calc = Calculator::default();
        type_digits(&mut calc, "12");
        calc.press_operator(Operator::Add).unwrap();
        type_digits(&mut calc, "3");
        calc.clear_all();
        assert_eq!(calc.display().input, "0");
        assert_eq!(calc.display().operation, "");
        assert!(calc.buffer().is_empty());
        assert_eq!(calc.undo_snapshot(), None);
        assert_eq!(calc.phase(), Phase::AwaitingFirstOperand);
    }
}
