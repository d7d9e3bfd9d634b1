use std::io::{self, BufRead, Write};

use crate::month::TargetMonth;

/// Empty input or `y` (any case) means yes.
pub fn accepts(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y")
}

/// Asks whether to go ahead with `month` and reads one line of the answer.
pub fn confirm<R: BufRead, W: Write>(
    month: &TargetMonth,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "Make invoices for {}? (Y/n): ", month.compact())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(accepts(&answer))
}
