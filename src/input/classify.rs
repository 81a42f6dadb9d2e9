use super::token::{
    ControlKey, EscapeKey, InputError, Scan, Token, CSI_INTRODUCER, ESC, KNOWN_SEQUENCES,
};

/// Classify the token at the front of `buf`.
///
/// Never consumes a partial escape sequence: while the buffer could still
/// grow into a known sequence the answer is `NeedMore`. Once no known
/// sequence can match the bytes, the escape is unrecoverable.
pub fn classify(buf: &[u8]) -> Result<Scan, InputError> {
    let Some(&first) = buf.first() else {
        return Ok(Scan::NeedMore);
    };
    if first == ESC {
        return classify_escape(buf);
    }
    let token = if let Some(key) = ControlKey::from_byte(first) {
        Token::Control(key)
    } else if first == b'\r' || first == b'\n' {
        Token::LineEnd(first)
    } else {
        Token::Char(first)
    };
    Ok(Scan::Token { token, len: 1 })
}

fn classify_escape(buf: &[u8]) -> Result<Scan, InputError> {
    match buf.get(1) {
        None => return Ok(Scan::NeedMore),
        Some(&byte) if byte != CSI_INTRODUCER => {
            return Ok(Scan::Token {
                token: Token::Escape(EscapeKey::Bare),
                len: 1,
            })
        }
        Some(_) => {}
    }

    let mut partial = false;
    for &key in KNOWN_SEQUENCES {
        let seq = key.bytes();
        if buf.starts_with(seq) {
            return Ok(Scan::Token {
                token: Token::Escape(key),
                len: seq.len(),
            });
        }
        if seq.starts_with(buf) {
            partial = true;
        }
    }
    if partial {
        return Ok(Scan::NeedMore);
    }
    let longest = KNOWN_SEQUENCES
        .iter()
        .map(|key| key.bytes().len())
        .max()
        .unwrap_or(0);
    let end = buf.len().min(longest);
    Err(InputError::UnknownEscape(buf[..end].to_vec()))
}
