//! Operator dialogue for the retry path.

use std::io::{self, BufRead, Write};

/// Ask the operator whether to redo the exchange after a mismatch.
///
/// Returns the replacement identifier to resend, or None to stop.
/// Anything other than an explicit `y` declines, and an empty
/// identifier is treated as a decline as well.
pub fn prompt_retry() -> io::Result<Option<String>> {
    let stdin = io::stdin();

    print!("Continue? [y/n] ");
    io::stdout().flush()?;
    let mut choice = String::new();
    stdin.lock().read_line(&mut choice)?;
    if !choice.trim().eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    print!("Resubmit identifier: ");
    io::stdout().flush()?;
    let mut identifier = String::new();
    stdin.lock().read_line(&mut identifier)?;
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }
    Ok(Some(identifier.to_string()))
}
