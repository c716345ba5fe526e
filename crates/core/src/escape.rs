//! String literal decoding shared by the extractor and the DOT parser.

use crate::error::{Location, RenderDotError, Result};

/// Which escaping convention a literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// JavaScript string and template literals. Malformed `\x`/`\u` escapes
    /// and a dangling backslash are errors; escapes JavaScript would not
    /// recognize are kept as-is so DOT sequences such as `\N` survive.
    Script,
    /// DOT quoted strings. `\"`, `\\` and `\n` are decoded; any other
    /// backslash sequence (`\l`, `\r` label justification, ...) is kept as-is.
    Dot,
}

/// Decodes the body of a quoted literal (without its delimiters).
///
/// `base` is the byte offset of `raw` within the enclosing text and is only
/// used to report where an invalid escape sits.
pub fn unescape(raw: &str, mode: EscapeMode, base: usize) -> Result<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some((_, next)) = chars.next() else {
            if mode == EscapeMode::Dot {
                out.push('\\');
                break;
            }
            return Err(RenderDotError::malformed(
                Location::Offset(base + pos),
                "dangling backslash at end of string",
            ));
        };

        match (mode, next) {
            (_, '"') => out.push('"'),
            (_, '\\') => out.push('\\'),
            (_, 'n') => out.push('\n'),
            (_, '\n') => {}
            (_, '\r') => {
                if chars.peek().is_some_and(|(_, c)| *c == '\n') {
                    chars.next();
                }
            }
            (EscapeMode::Dot, other) => {
                out.push('\\');
                out.push(other);
            }
            (EscapeMode::Script, '\'') => out.push('\''),
            (EscapeMode::Script, '`') => out.push('`'),
            (EscapeMode::Script, '/') => out.push('/'),
            (EscapeMode::Script, 'r') => out.push('\r'),
            (EscapeMode::Script, 't') => out.push('\t'),
            (EscapeMode::Script, 'b') => out.push('\u{0008}'),
            (EscapeMode::Script, 'f') => out.push('\u{000C}'),
            (EscapeMode::Script, 'v') => out.push('\u{000B}'),
            (EscapeMode::Script, '0') => out.push('\0'),
            (EscapeMode::Script, 'x') => {
                let code = take_hex(&mut chars, 2).ok_or_else(|| invalid_escape(base + pos, "\\x"))?;
                out.push(char::from_u32(code).ok_or_else(|| invalid_escape(base + pos, "\\x"))?);
            }
            (EscapeMode::Script, 'u') => out.push(decode_unicode(&mut chars, base + pos)?),
            (EscapeMode::Script, other) => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn invalid_escape(offset: usize, sequence: &str) -> RenderDotError {
    RenderDotError::malformed(Location::Offset(offset), format!("invalid escape sequence {}", sequence))
}

fn take_hex(chars: &mut Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    Some(value)
}

/// Decodes the part of a `\u` escape after the `u`: `HHHH`, `{H...}`, or a
/// UTF-16 surrogate pair written as two consecutive `\uHHHH` escapes.
fn decode_unicode(chars: &mut Chars<'_>, offset: usize) -> Result<char> {
    if chars.peek().is_some_and(|(_, c)| *c == '{') {
        chars.next();
        let mut value = 0u32;
        let mut digits = 0;
        loop {
            match chars.next() {
                Some((_, '}')) if digits > 0 => break,
                Some((_, c)) if digits < 6 => {
                    value = value * 16 + c.to_digit(16).ok_or_else(|| invalid_escape(offset, "\\u{...}"))?;
                    digits += 1;
                }
                _ => return Err(invalid_escape(offset, "\\u{...}")),
            }
        }
        return char::from_u32(value).ok_or_else(|| invalid_escape(offset, "\\u{...}"));
    }

    let high = take_hex(chars, 4).ok_or_else(|| invalid_escape(offset, "\\u"))?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high).ok_or_else(|| invalid_escape(offset, "\\u"));
    }

    match (chars.next(), chars.next()) {
        (Some((_, '\\')), Some((_, 'u'))) => {
            let low = take_hex(chars, 4).ok_or_else(|| invalid_escape(offset, "\\u"))?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(invalid_escape(offset, "\\u (unpaired surrogate)"));
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(code).ok_or_else(|| invalid_escape(offset, "\\u"))
        }
        _ => Err(invalid_escape(offset, "\\u (unpaired surrogate)")),
    }
}
