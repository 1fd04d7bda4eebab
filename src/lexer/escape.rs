//! Escape-sequence decoding for string literals (spec §4.2.8).

/// Decodes the escape sequences inside a string literal's interior (the
/// bytes between the opening and closing quote, quotes already stripped).
/// Returns the decoded value, or an error fragment naming what went wrong.
pub fn decode_string_escapes(interior: &str) -> Result<String, String> {
    let mut out = String::with_capacity(interior.len());
    let mut chars = interior.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            return Err("embedded raw newline in string literal".to_string());
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escape) = chars.next() else {
            return Err("unterminated string literal".to_string());
        };

        match escape {
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'e' => out.push('\u{1B}'),
            'x' => {
                let hex: String = take_n(&mut chars, 2);
                if hex.len() != 2 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!("invalid hex escape: \\x{hex}"));
                }
                let value = u8::from_str_radix(&hex, 16).unwrap();
                out.push(value as char);
            }
            'u' => {
                let hex: String = take_n(&mut chars, 4);
                if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!("invalid unicode escape: \\u{hex}"));
                }
                let value = u32::from_str_radix(&hex, 16).unwrap();
                match char::from_u32(value) {
                    Some(ch) => out.push(ch),
                    None => return Err(format!("invalid unicode escape: \\u{hex}")),
                }
            }
            'U' => {
                let hex: String = take_n(&mut chars, 8);
                if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!("invalid unicode escape: \\U{hex}"));
                }
                let value = u32::from_str_radix(&hex, 16).unwrap();
                match char::from_u32(value) {
                    Some(ch) => out.push(ch),
                    None => return Err(format!("invalid unicode escape: \\U{hex}")),
                }
            }
            '0'..='7' => {
                let mut digits = String::new();
                digits.push(escape);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(c) if ('0'..='7').contains(c) => {
                            digits.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let value = u32::from_str_radix(&digits, 8).unwrap();
                if value > 0xFF {
                    return Err(format!("invalid octal escape: \\{digits}"));
                }
                out.push(value as u8 as char);
            }
            other => return Err(format!("unknown escape sequence: \\{other}")),
        }
    }

    Ok(out)
}

fn take_n(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, n: usize) -> String {
    let mut s = String::with_capacity(n);
    for _ in 0..n {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                s.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_escapes() {
        assert_eq!(
            decode_string_escapes(r#"\n\r\t\\\""#).unwrap(),
            "\n\r\t\\\""
        );
    }

    #[test]
    fn decodes_hex_escape() {
        assert_eq!(decode_string_escapes(r"\x41").unwrap(), "A");
    }

    #[test]
    fn decodes_unicode_escapes() {
        assert_eq!(decode_string_escapes(r"A").unwrap(), "A");
        assert_eq!(decode_string_escapes(r"\U00000041").unwrap(), "A");
    }

    #[test]
    fn decodes_octal_escape() {
        assert_eq!(decode_string_escapes(r"\101").unwrap(), "A");
    }

    #[test]
    fn rejects_unknown_escape() {
        assert!(decode_string_escapes(r"\q").is_err());
    }

    #[test]
    fn rejects_raw_newline() {
        assert!(decode_string_escapes("line one\nline two").is_err());
    }

    #[test]
    fn rejects_octal_over_0xff() {
        assert!(decode_string_escapes(r"\777").is_err());
    }
}
