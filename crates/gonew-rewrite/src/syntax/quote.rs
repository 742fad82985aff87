//! Go string literal quoting and unquoting

/// Decode a Go string literal (interpreted `"..."` or raw `` `...` ``)
///
/// Returns `None` for anything that is not a well-formed string literal,
/// including escapes that decode to invalid UTF-8.
pub fn unquote(literal: &str) -> Option<String> {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 || bytes[0] != bytes[bytes.len() - 1] {
        return None;
    }
    let inner = &literal[1..literal.len() - 1];

    match bytes[0] {
        b'`' => {
            if inner.contains('`') {
                return None;
            }
            // Carriage returns are discarded from raw literals
            Some(inner.replace('\r', ""))
        }
        b'"' => unquote_interpreted(inner),
        _ => None,
    }
}

fn unquote_interpreted(inner: &str) -> Option<String> {
    if !inner.contains('\\') {
        if inner.contains('"') || inner.contains('\n') {
            return None;
        }
        return Some(inner.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = chars.next()?;
                match escaped {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    '0'..='7' => {
                        let mut value = escaped.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        out.push(u8::try_from(value).ok()?);
                    }
                    'x' => {
                        let value = read_hex(&mut chars, 2)?;
                        out.push(u8::try_from(value).ok()?);
                    }
                    'u' => push_char(&mut out, char::from_u32(read_hex(&mut chars, 4)?)?),
                    'U' => push_char(&mut out, char::from_u32(read_hex(&mut chars, 8)?)?),
                    _ => return None,
                }
            }
            c => push_char(&mut out, c),
        }
    }

    String::from_utf8(out).ok()
}

fn read_hex(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        value = value.checked_mul(16)? + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Quote `s` as an interpreted Go string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => {
                if (c as u32) < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                } else {
                    out.push_str(&format!("\\U{:08x}", c as u32));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
