use std::io::{self, BufRead, Write};

use crate::output::{CYAN, GRAY, RESET};

/// Ask for a line of input. Returns the trimmed answer, or `default` when the
/// answer is empty.
pub fn input(question: &str, default: Option<&str>) -> io::Result<String> {
    match default {
        Some(d) => print!("{CYAN}?{RESET} {} {GRAY}[{}]{RESET} ", question, d),
        None => print!("{CYAN}?{RESET} {} ", question),
    }
    io::stdout().flush()?;

    let answer = read_answer(&mut io::stdin().lock())?;
    Ok(match (answer.is_empty(), default) {
        (true, Some(d)) => d.to_string(),
        _ => answer,
    })
}

/// Ask for a password. The terminal's echo is left as is.
pub fn password(question: &str) -> io::Result<String> {
    print!("{CYAN}?{RESET} {} ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_answer(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_answer_trims() {
        let mut reader = Cursor::new("  dev@projectflow.com \n");
        assert_eq!(read_answer(&mut reader).unwrap(), "dev@projectflow.com");
    }

    #[test]
    fn test_read_answer_at_eof_is_empty() {
        let mut reader = Cursor::new("");
        assert_eq!(read_answer(&mut reader).unwrap(), "");
    }
}
