use std::borrow::Cow;

/// Rewrite `?` placeholders into PostgreSQL's numbered `$N` form.
///
/// Bare `?` markers are numbered left to right; an explicit `?N` keeps its number.
/// Placeholders inside quoted strings, quoted identifiers, comments and dollar-quoted
/// blocks are left alone. Returns a borrowed `Cow` when nothing changes.
#[must_use]
pub fn translate_placeholders(sql: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut next_ordinal = 1usize;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut replacement: Option<(String, usize)> = None;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backticked,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                }
                b'$' => {
                    if let Some((tag, close)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        // copy the opening tag verbatim
                        if let Some(buf) = out.as_mut() {
                            buf.push_str(&sql[idx..=close]);
                        }
                        idx = close + 1;
                        continue;
                    }
                }
                b'?' => {
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        replacement = Some((format!("${digits}"), digits_end));
                    } else {
                        replacement = Some((format!("${next_ordinal}"), idx + 1));
                        next_ordinal += 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        push_bytes(&mut out, sql, idx, idx + 2);
                        idx += 2;
                        continue;
                    }
                    state = State::Normal;
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    state = State::Normal;
                }
            }
            State::Backticked => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    push_bytes(&mut out, sql, idx, idx + 2);
                    idx += 2;
                    continue;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    push_bytes(&mut out, sql, idx, idx + 2);
                    idx += 2;
                    continue;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let end = idx + tag.len() + 2;
                    push_bytes(&mut out, sql, idx, end);
                    idx = end;
                    state = State::Normal;
                    continue;
                }
            }
        }

        if let Some((text, resume)) = replacement {
            out.get_or_insert_with(|| sql[..idx].to_string())
                .push_str(&text);
            idx = resume;
        } else {
            let ch_len = utf8_len(b);
            push_bytes(&mut out, sql, idx, idx + ch_len);
            idx += ch_len;
        }
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(sql),
    }
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn push_bytes(out: &mut Option<String>, sql: &str, start: usize, end: usize) {
    if let Some(buf) = out.as_mut() {
        buf.push_str(&sql[start..end.min(sql.len())]);
    }
}

// Multi-byte characters never contain ASCII bytes, so stepping by lead byte is safe.
fn utf8_len(lead: u8) -> usize {
    match lead {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}

/// Returns the tag and the index of the closing `$` of an opening `$tag$`.
fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    // `$1` is a positional parameter, not a tag
    if bytes.get(idx).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len() && &bytes[idx + 1..end] == tag.as_bytes() && bytes[end] == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_bare_placeholders() {
        let sql = "UPDATE users SET name = ?, age = ? WHERE id = ?";
        let res = translate_placeholders(sql);
        assert_eq!(res, "UPDATE users SET name = $1, age = $2 WHERE id = $3");
    }

    #[test]
    fn keeps_explicit_numbers() {
        let res = translate_placeholders("select * from t where a = ?2 and b = ?1");
        assert_eq!(res, "select * from t where a = $2 and b = $1");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', 'it''s ?' -- ?\n/* ? /* ? */ */ from t where a = ?";
        let res = translate_placeholders(sql);
        assert_eq!(
            res,
            "select '?', 'it''s ?' -- ?\n/* ? /* ? */ */ from t where a = $1"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select ? from t $foo$ where a = ?";
        let res = translate_placeholders(sql);
        assert_eq!(res, "$foo$ select ? from t $foo$ where a = $1");
    }

    #[test]
    fn preserves_multibyte_text() {
        let sql = "select 'héllo' as gr\u{fc}n where a = ?";
        assert_eq!(
            translate_placeholders(sql),
            "select 'héllo' as gr\u{fc}n where a = $1"
        );
    }

    #[test]
    fn question_mark_operator_is_numbered_too() {
        let res = translate_placeholders("select * from t where tags ? 'k' and id = ?");
        assert_eq!(res, "select * from t where tags $1 'k' and id = $2");
        let res = translate_placeholders("select * from t where jsonb_exists(tags, 'k') and id = ?");
        assert_eq!(res, "select * from t where jsonb_exists(tags, 'k') and id = $1");
    }

    #[test]
    fn borrows_when_unchanged() {
        let sql = "select * from t where a = '?'";
        let res = translate_placeholders(sql);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }
}
