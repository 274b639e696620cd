//! Morse code rhythms: a dot is one onset, a dash an onset held for two
//! steps, a space one rest.

use crate::error::{ParseError, Result};
use crate::types::{LiteralFormat, Origin, Pattern};

const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

/// International Morse code for one letter or digit
pub fn morse_for(c: char) -> Option<&'static str> {
    let upper = c.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|(k, _)| *k == upper)
        .map(|&(_, code)| code)
}

/// True when `text` is made only of dots, dashes and spaces and has at
/// least one dot or dash
pub fn is_raw_morse(text: &str) -> bool {
    text.chars().all(|c| matches!(c, '.' | '-' | ' '))
        && text.chars().any(|c| matches!(c, '.' | '-'))
}

/// Translate text to dot/dash notation. Letters are joined with no gap;
/// a space in the text stays a space (one rest).
pub fn text_to_morse(text: &str) -> Result<String> {
    let mut code = String::new();
    for c in text.chars() {
        if c == ' ' {
            code.push(' ');
            continue;
        }
        let symbol = morse_for(c).ok_or_else(|| ParseError::unrecognized(text))?;
        code.push_str(symbol);
    }
    Ok(code)
}

/// Pattern for raw dot/dash notation
pub fn decode_morse(code: &str) -> Result<Pattern> {
    let mut steps = Vec::with_capacity(code.len() * 2);
    for c in code.trim().chars() {
        match c {
            '.' => steps.push(true),
            '-' => steps.extend([true, false]),
            ' ' => steps.push(false),
            _ => return Err(ParseError::unrecognized(code)),
        }
    }
    Pattern::new(
        steps,
        Origin::Literal {
            format: LiteralFormat::Morse,
        },
    )
    .map_err(|_| ParseError::EmptyInput)
}

/// `M:TEXT`
pub fn morse_text(text: &str) -> Result<Pattern> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    decode_morse(&text_to_morse(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sos() {
        assert_eq!(text_to_morse("SOS").unwrap(), "...---...");
        let p = morse_text("sos").unwrap();
        assert_eq!(p.to_binary_string(), "111101010111");
    }

    #[test]
    fn test_raw_morse() {
        assert!(is_raw_morse(".- -"));
        assert!(!is_raw_morse("   "));
        assert!(!is_raw_morse(".x"));
        assert_eq!(decode_morse(".- .").unwrap().to_binary_string(), "11001");
    }

    #[test]
    fn test_digits_and_unknown() {
        assert_eq!(morse_for('7'), Some("--..."));
        assert!(matches!(
            morse_text("A?").unwrap_err(),
            ParseError::UnrecognizedFormat(_)
        ));
    }
}
