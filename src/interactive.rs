//! Line-oriented prompts for values not given on the command line

use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use crate::error::{Result, TextProcessorError};

/// Print `question` and read one trimmed line.
pub fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> Result<String> {
    write!(writer, "{}", question)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(TextProcessorError::Input {
            message: "input closed before an answer was given".to_string(),
        });
    }
    Ok(line.trim().to_string())
}

/// Ask until the answer parses as an integer inside `range`.
pub fn prompt_in_range<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    range: RangeInclusive<u8>,
) -> Result<u8> {
    loop {
        let answer = prompt_line(reader, writer, question)?;
        match answer.parse::<i64>() {
            Ok(n) if n >= i64::from(*range.start()) && n <= i64::from(*range.end()) => {
                return Ok(n as u8);
            }
            Ok(_) => writeln!(
                writer,
                "Please enter a number between {} and {}.",
                range.start(),
                range.end()
            )?,
            Err(_) => writeln!(writer, "Invalid input. Please enter a number.")?,
        }
    }
}
