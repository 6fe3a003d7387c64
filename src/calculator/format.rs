//! Result formatting for the fixed-width display.

use super::evaluation::Number;

/// Maximum number of characters a fractional result may occupy.
pub const DISPLAY_BUDGET: usize = 9;

/// Format a result so it fits the display.
///
/// Whole floats are shown without a fractional part. Other floats keep
/// their shortest rendering if it fits, otherwise the fractional precision is
/// cut to what is left of the budget after the integer part.
///
/// Integers are returned as-is, however wide they are.
pub fn format_result(value: Number) -> String {
    match value {
        Number::Int(i) => i.to_string(),
        Number::Float(f) if f.fract() == 0.0 => format_whole(f),
        Number::Float(f) => {
            let shortest = f.to_string();
            if shortest.len() <= DISPLAY_BUDGET {
                return shortest;
            }
            let precision = DISPLAY_BUDGET.saturating_sub(integer_width(f));
            format!("{f:.precision$}")
        }
    }
}

/// Parse user-facing text back into a float, for keys that act on the current number.
pub fn parse_display(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn format_whole(f: f64) -> String {
    // Avoid printing "-0".
    if f == 0.0 {
        return "0".to_string();
    }
    format!("{f:.0}")
}

/// Width of the integer part: the sign plus its significant digits.
///
/// A lone leading zero (`0.95...`) takes no width, so small fractions get the
/// whole budget.
fn integer_width(f: f64) -> usize {
    let sign = usize::from(f.is_sign_negative());
    let whole = f.abs().trunc();
    let digits = if whole == 0.0 {
        0
    } else {
        format!("{whole:.0}").len()
    };
    sign + digits
}
