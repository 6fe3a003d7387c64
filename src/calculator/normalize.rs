//! Implicit multiplication around parentheses.
//!
//! `2(3)` is read as `2*(3)`, `(3)(4)` as `(3)*(4)` and `(2)3` as `(2)*3`.

/// Characters that can end an operand.
fn ends_operand(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ')'
}

/// Characters that can start an operand.
fn starts_operand(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '('
}

/// Insert `*` wherever a parenthesis touches an operand without an operator.
///
/// Whitespace between the two is skipped, so `2 (3)` reads as `2 *(3)`.
///
/// Runs one pass for opening and one for closing parentheses. Each pass
/// builds a fresh string, so insertions from the first pass are already in
/// place when the second pass looks at its neighbours. The result is a fixed
/// point: normalizing it again changes nothing.
pub fn normalize(expression: &str) -> String {
    let opened = insert_before_open(expression);
    insert_after_close(&opened)
}

fn insert_before_open(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() + 4);
    let mut prev: Option<char> = None;

    for c in expression.chars() {
        if c == '(' && prev.is_some_and(ends_operand) {
            out.push('*');
        }
        out.push(c);
        if !c.is_whitespace() {
            prev = Some(c);
        }
    }

    out
}

fn insert_after_close(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() + 4);
    let mut chars = expression.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c == ')'
            && chars
                .clone()
                .find(|next| !next.is_whitespace())
                .is_some_and(starts_operand)
        {
            out.push('*');
        }
    }

    out
}
